use crate::core::reconciler::dedup_by_identifier;
use crate::domain::model::{ClassifiedSequence, HomologyCall, OutputTable};
use crate::utils::error::{EtlError, Result};

pub const OUTPUT_COLUMNS: [&str; 12] = [
    "qseqid",
    "prediction",
    "score",
    "salltitles",
    "pident",
    "qcovhsp",
    "evalue",
    "domain",
    "description",
    "start",
    "end",
    "family_keys",
];

pub const DEFAULT_MISSING_MARKER: &str = "NA";

#[derive(Debug, Clone)]
pub struct OutputFormatter {
    missing_marker: String,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MISSING_MARKER)
    }
}

impl OutputFormatter {
    pub fn new(missing_marker: impl Into<String>) -> Self {
        Self {
            missing_marker: missing_marker.into(),
        }
    }

    pub fn format(&self, rows: &[ClassifiedSequence]) -> OutputTable {
        let rows = dedup_by_identifier(rows.to_vec());
        OutputTable {
            headers: OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows.iter().map(|row| self.result_row(row)).collect(),
        }
    }

    /// homology 命中且有 family 的序列，加上 ML 是否支持
    pub fn format_homology_calls(&self, calls: &[HomologyCall]) -> OutputTable {
        let mut headers: Vec<String> = OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect();
        headers.push("ml_supported".to_string());

        let rows = calls
            .iter()
            .map(|call| {
                let mut row = self.result_row(&call.sequence);
                row.push(render_flag(call.ml_supported));
                row
            })
            .collect();

        OutputTable { headers, rows }
    }

    pub fn format_prediction_only(&self, rows: &[ClassifiedSequence]) -> OutputTable {
        OutputTable {
            headers: vec!["qseqid".to_string(), "prediction".to_string(), "score".to_string()],
            rows: rows
                .iter()
                .map(|row| {
                    vec![
                        row.sequence_id.clone(),
                        self.value(row.prediction.map(render_flag)),
                        self.value(row.score.as_ref().map(|s| s.text.clone())),
                    ]
                })
                .collect(),
        }
    }

    fn result_row(&self, row: &ClassifiedSequence) -> Vec<String> {
        vec![
            row.sequence_id.clone(),
            self.value(row.prediction.map(render_flag)),
            self.value(row.score.as_ref().map(|s| s.text.clone())),
            self.value(row.title.clone()),
            self.value(row.percent_identity.clone()),
            self.value(row.query_coverage.clone()),
            self.value(row.evalue.clone()),
            self.value(row.domain.clone()),
            self.value(row.description.clone()),
            self.value(row.start.clone()),
            self.value(row.end.clone()),
            self.value(row.family.clone()),
        ]
    }

    fn value(&self, value: Option<String>) -> String {
        value.unwrap_or_else(|| self.missing_marker.clone())
    }
}

fn render_flag(flag: bool) -> String {
    let label = if flag { "True" } else { "False" };
    label.to_string()
}

/// 寫成逗號分隔的 CSV（含表頭）
pub fn to_csv(table: &OutputTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NumericCell;

    fn classified(id: &str) -> ClassifiedSequence {
        ClassifiedSequence {
            sequence_id: id.to_string(),
            prediction: Some(true),
            score: Some(NumericCell::new("0.97")),
            title: Some("Homeobox protein OTX2".to_string()),
            percent_identity: Some("91.2".to_string()),
            query_coverage: Some("100".to_string()),
            evalue: Some("2.1e-80".to_string()),
            domain: Some("PF00046; PF03529".to_string()),
            description: Some("Homeodomain; Otx1 transcription factor".to_string()),
            start: Some("38".to_string()),
            end: Some("95".to_string()),
            family: Some("TF_Otx".to_string()),
        }
    }

    #[test]
    fn test_format_fixed_columns() {
        let table = OutputFormatter::default().format(&[classified("seq1")]);

        assert_eq!(table.headers, OUTPUT_COLUMNS.to_vec());
        assert_eq!(
            table.rows[0],
            vec![
                "seq1",
                "True",
                "0.97",
                "Homeobox protein OTX2",
                "91.2",
                "100",
                "2.1e-80",
                "PF00046; PF03529",
                "Homeodomain; Otx1 transcription factor",
                "38",
                "95",
                "TF_Otx"
            ]
        );
    }

    #[test]
    fn test_missing_values_use_marker_and_empty_stays_empty() {
        let row = ClassifiedSequence {
            sequence_id: "seq2".to_string(),
            domain: Some(String::new()),
            ..Default::default()
        };
        let table = OutputFormatter::new("NA").format(&[row]);

        assert_eq!(table.rows[0][1], "NA");
        assert_eq!(table.rows[0][7], "");
        assert_eq!(table.rows[0][11], "NA");
    }

    #[test]
    fn test_numeric_text_written_as_read() {
        let row = ClassifiedSequence {
            score: Some(NumericCell::new("1.0")),
            percent_identity: Some("100.0".to_string()),
            query_coverage: Some("80.0".to_string()),
            ..classified("s1")
        };
        let unparsed = ClassifiedSequence {
            score: Some(NumericCell::new("n/a")),
            ..classified("s2")
        };

        let table = OutputFormatter::default().format(&[row, unparsed]);
        assert_eq!(&table.rows[0][2..6], &["1.0", "Homeobox protein OTX2", "100.0", "80.0"]);
        assert_eq!(table.rows[1][2], "n/a");

        let prediction_only = OutputFormatter::default().format_prediction_only(&[classified("s3")]);
        assert_eq!(prediction_only.rows[0], vec!["s3", "True", "0.97"]);
    }

    #[test]
    fn test_format_deduplicates() {
        let table = OutputFormatter::default().format(&[classified("seq1"), classified("seq1")]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_to_csv_quotes_separators() {
        let table = OutputTable {
            headers: vec!["qseqid".to_string(), "salltitles".to_string()],
            rows: vec![vec!["seq1".to_string(), "Zinc finger, C2H2 type".to_string()]],
        };

        let csv = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert_eq!(csv, "qseqid,salltitles\nseq1,\"Zinc finger, C2H2 type\"\n");
    }
}
