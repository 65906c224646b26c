use crate::domain::model::{
    ClassifiedSequence, HomologyCall, ReconOutcome, SourceCounts, StageCheckpoint,
    SupplementaryTables,
};
use serde::Serialize;

/// 以 homology 為主的呼叫，以及只有 ML 預測支持的候選
pub fn build_supplementary(merged: &[ClassifiedSequence]) -> SupplementaryTables {
    let mut tables = SupplementaryTables::default();

    for row in merged {
        let ml_supported = row.prediction == Some(true);
        if row.has_homology() && row.family.is_some() {
            tables.homology_calls.push(HomologyCall {
                sequence: row.clone(),
                ml_supported,
            });
        } else if ml_supported {
            tables.prediction_only.push(row.clone());
        }
    }

    tracing::info!(
        "🧬 Homology-supported calls: {}, prediction-only candidates: {}",
        tables.homology_calls.len(),
        tables.prediction_only.len()
    );
    tables
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub engine_version: String,
    pub generated_at: String,
    pub source_records: SourceCounts,
    pub dropped_rows: SourceCounts,
    pub checkpoints: Vec<StageCheckpoint>,
    pub output_rows: usize,
}

impl RunSummary {
    pub fn from_outcome(outcome: &ReconOutcome) -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            source_records: outcome.source_records,
            dropped_rows: outcome.dropped_rows,
            checkpoints: outcome.filtered.checkpoints.clone(),
            output_rows: outcome.filtered.rows.len(),
        }
    }

    pub fn to_json(&self) -> crate::utils::error::Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
