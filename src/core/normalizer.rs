use crate::domain::model::{
    DomainHit, HomologyHit, NormalizedSources, NumericCell, SequenceDomainProfile, SourceCounts,
    TfPrediction,
};
use crate::domain::table::{
    cell, RawInputs, RawTable, DOMAIN_SCAN_LAYOUT, HOMOLOGY_LAYOUT, PREDICTION_LAYOUT,
};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::str::FromStr;

/// 單一來源正規化結果
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub records: BTreeMap<String, T>,
    pub dropped: usize,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            dropped: 0,
        }
    }
}

/// 先檢查三個來源的欄位，全部通過才開始正規化
pub fn normalize_all(inputs: &RawInputs) -> Result<NormalizedSources> {
    inputs.homology.require(HOMOLOGY_LAYOUT.required)?;
    inputs.domain_scan.require(DOMAIN_SCAN_LAYOUT.required)?;
    inputs.predictions.require(PREDICTION_LAYOUT.required)?;

    let homology = normalize_homology(&inputs.homology)?;
    let domain_scan = normalize_domain_scan(&inputs.domain_scan)?;
    let predictions = normalize_predictions(&inputs.predictions)?;

    let dropped_rows = SourceCounts {
        homology: homology.dropped,
        domain_scan: domain_scan.dropped,
        predictions: predictions.dropped,
    };
    if dropped_rows.total() > 0 {
        tracing::warn!(
            "⚠️ Dropped malformed rows - homology: {}, domain scan: {}, predictions: {}",
            dropped_rows.homology,
            dropped_rows.domain_scan,
            dropped_rows.predictions
        );
    }

    Ok(NormalizedSources {
        homology: homology.records,
        domain_profiles: domain_scan.records,
        predictions: predictions.records,
        dropped_rows,
    })
}

pub fn normalize_homology(table: &RawTable) -> Result<Normalized<HomologyHit>> {
    let idx = table.require(&["qseqid", "salltitles", "pident", "qcovhsp", "evalue"])?;
    let mut out = Normalized::default();

    for (line, row) in table.rows.iter().enumerate() {
        let Some(id) = row_identifier(table, row, &idx, line) else {
            out.dropped += 1;
            continue;
        };

        if out.records.contains_key(id) {
            // 同一序列只保留第一筆命中
            tracing::debug!("Ignoring additional homology hit for {}", id);
            continue;
        }

        let hit = HomologyHit {
            sequence_id: id.to_string(),
            title: cell(row, idx[1]).map(str::to_string),
            percent_identity: cell(row, idx[2]).map(str::to_string),
            query_coverage: cell(row, idx[3]).map(str::to_string),
            evalue: cell(row, idx[4]).map(str::to_string),
        };
        out.records.insert(id.to_string(), hit);
    }

    tracing::debug!("Normalized {} homology hits", out.records.len());
    Ok(out)
}

pub fn normalize_domain_scan(table: &RawTable) -> Result<Normalized<SequenceDomainProfile>> {
    let idx = table.require(&["qseqid", "domain", "description", "start", "end", "evalue"])?;
    let mut out: Normalized<SequenceDomainProfile> = Normalized::default();

    for (line, row) in table.rows.iter().enumerate() {
        let Some(id) = row_identifier(table, row, &idx, line) else {
            out.dropped += 1;
            continue;
        };

        let hit = DomainHit {
            domain: cell(row, idx[1]).map(str::to_string),
            description: cell(row, idx[2]).map(str::to_string),
            start: parse_number(table, row, idx[3], "start", id),
            end: parse_number(table, row, idx[4], "end", id),
            evalue: cell(row, idx[5]).map(str::to_string),
        };

        out.records
            .entry(id.to_string())
            .or_insert_with(|| SequenceDomainProfile::new(id))
            .push_hit(hit);
    }

    tracing::debug!("Normalized domain hits for {} sequences", out.records.len());
    Ok(out)
}

pub fn normalize_predictions(table: &RawTable) -> Result<Normalized<TfPrediction>> {
    let idx = table.require(&["sequence_ID", "prediction", "score"])?;
    let mut out = Normalized::default();

    for (line, row) in table.rows.iter().enumerate() {
        let Some(id) = row_identifier(table, row, &idx, line) else {
            out.dropped += 1;
            continue;
        };

        if out.records.contains_key(id) {
            tracing::debug!("Ignoring duplicate prediction for {}", id);
            continue;
        }

        let prediction = TfPrediction {
            sequence_id: id.to_string(),
            is_tf: parse_flag(table, row, idx[1], id),
            score: parse_score(table, row, idx[2], id),
        };
        out.records.insert(id.to_string(), prediction);
    }

    tracing::debug!("Normalized {} predictions", out.records.len());
    Ok(out)
}

/// 欄位數不足或沒有序列 ID 的列視為格式錯誤，整列略過
fn row_identifier<'a>(table: &RawTable, row: &'a [String], idx: &[usize], line: usize) -> Option<&'a str> {
    let needed = idx.iter().max().map_or(0, |i| i + 1);
    if row.len() < needed {
        tracing::warn!(
            "⚠️ Dropping row {} of '{}' table: {} columns, expected at least {}",
            line + 1,
            table.name,
            row.len(),
            needed
        );
        return None;
    }

    let id = cell(row, idx[0]);
    if id.is_none() {
        tracing::warn!(
            "⚠️ Dropping row {} of '{}' table: missing sequence identifier",
            line + 1,
            table.name
        );
    }
    id
}

fn parse_number<T: FromStr>(
    table: &RawTable,
    row: &[String],
    index: usize,
    column: &str,
    id: &str,
) -> Option<T> {
    let raw = cell(row, index)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(
                "⚠️ Unparseable {} value '{}' for {} in '{}' table; treating as missing",
                column,
                raw,
                id,
                table.name
            );
            None
        }
    }
}

fn parse_score(table: &RawTable, row: &[String], index: usize, id: &str) -> Option<NumericCell> {
    let score = NumericCell::new(cell(row, index)?);
    if score.value.is_none() {
        tracing::warn!(
            "⚠️ Unparseable score '{}' for {} in '{}' table; it will not pass the confidence filter",
            score.text,
            id,
            table.name
        );
    }
    Some(score)
}

fn parse_flag(table: &RawTable, row: &[String], index: usize, id: &str) -> Option<bool> {
    let raw = cell(row, index)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => {
            tracing::warn!(
                "⚠️ Unrecognized prediction flag '{}' for {} in '{}' table; treating as missing",
                raw,
                id,
                table.name
            );
            None
        }
    }
}
