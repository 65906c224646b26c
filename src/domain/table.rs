use crate::utils::error::{EtlError, Result};

/// 欄位名稱來源：檔案自帶表頭，或依位置命名（工具輸出沒有表頭）
#[derive(Debug, Clone, Copy)]
pub enum HeaderMode {
    Present,
    Positional(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub name: &'static str,
    pub delimiter: u8,
    pub quoting: bool,
    pub headers: HeaderMode,
    pub required: &'static [&'static str],
}

pub const REFERENCE_LAYOUT: TableLayout = TableLayout {
    name: "reference",
    delimiter: b',',
    quoting: true,
    headers: HeaderMode::Positional(&["family", "domain"]),
    required: &["family"],
};

/// InterProScan TSV
pub const DOMAIN_SCAN_LAYOUT: TableLayout = TableLayout {
    name: "domain_scan",
    delimiter: b'\t',
    quoting: false,
    headers: HeaderMode::Positional(&[
        "qseqid",
        "md5",
        "len",
        "db",
        "domain",
        "description",
        "start",
        "end",
        "evalue",
        "type",
        "date",
        "ipr",
        "ipr_description",
        "x1",
        "x2",
    ]),
    required: &["qseqid", "domain", "description", "start", "end", "evalue"],
};

/// DIAMOND blastp outfmt 6
pub const HOMOLOGY_LAYOUT: TableLayout = TableLayout {
    name: "homology",
    delimiter: b'\t',
    quoting: false,
    headers: HeaderMode::Positional(&[
        "qseqid",
        "qlen",
        "sseqid",
        "slen",
        "salltitles",
        "pident",
        "length",
        "mismatch",
        "gapopen",
        "qstart",
        "qend",
        "sstart",
        "send",
        "qcovhsp",
        "evalue",
        "bitscore",
    ]),
    required: &["qseqid", "salltitles", "pident", "qcovhsp", "evalue"],
};

/// DeepTFactor prediction_result.txt
pub const PREDICTION_LAYOUT: TableLayout = TableLayout {
    name: "predictions",
    delimiter: b'\t',
    quoting: false,
    headers: HeaderMode::Present,
    required: &["sequence_ID", "prediction", "score"],
};

/// 已解析但尚未正規化的表格
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn parse(data: &[u8], layout: &TableLayout) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(layout.delimiter)
            .quoting(layout.quoting)
            .has_headers(matches!(layout.headers, HeaderMode::Present))
            .flexible(true)
            .from_reader(data);

        let mut columns: Vec<String> = match layout.headers {
            HeaderMode::Present => reader.headers()?.iter().map(|h| h.trim().to_string()).collect(),
            HeaderMode::Positional(names) => names.iter().map(|n| n.to_string()).collect(),
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        // 沒有表頭時，以最寬的一列判斷實際存在的欄位；較窄的列留給正規化階段略過
        if let (HeaderMode::Positional(_), Some(widest)) =
            (layout.headers, rows.iter().map(Vec::len).max())
        {
            columns.truncate(widest);
        }

        tracing::debug!(
            "Parsed table '{}' ({} columns, {} rows)",
            layout.name,
            columns.len(),
            rows.len()
        );

        Ok(Self {
            name: layout.name.to_string(),
            columns,
            rows,
        })
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| EtlError::MissingColumnError {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn require(&self, columns: &[&str]) -> Result<Vec<usize>> {
        columns.iter().map(|c| self.column_index(c)).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 取出儲存格；空白或不存在視為沒有資料
pub fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// extract 階段讀入的四個表格
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub reference: RawTable,
    pub homology: RawTable,
    pub domain_scan: RawTable,
    pub predictions: RawTable,
}
