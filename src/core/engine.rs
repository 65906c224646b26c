use crate::core::classifier::DomainSetClassifier;
use crate::core::filter::{FilterPipeline, FilterSettings};
use crate::core::normalizer::normalize_all;
use crate::core::reconciler::merge;
use crate::core::reference::FamilyReference;
use crate::core::report::build_supplementary;
use crate::domain::model::{ReconOutcome, SourceCounts};
use crate::domain::table::RawInputs;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub filter: FilterSettings,
    pub supplementary: bool,
}

/// 整併引擎：參考表 → 正規化 → 合併分類 → 過濾。
///
/// 結構性錯誤（參考表、欄位）在處理任何序列前就回傳。
pub fn run(inputs: &RawInputs, settings: &EngineSettings) -> Result<ReconOutcome> {
    let reference = FamilyReference::from_table(&inputs.reference)?;
    tracing::info!("📚 Loaded {} TF families", reference.len());
    let classifier = DomainSetClassifier::new(reference);
    let filter = FilterPipeline::new(&settings.filter)?;

    let sources = normalize_all(inputs)?;
    let source_records = SourceCounts {
        homology: sources.homology.len(),
        domain_scan: sources.domain_profiles.len(),
        predictions: sources.predictions.len(),
    };
    tracing::info!(
        "📥 Sequences per source - homology: {}, domain scan: {}, predictions: {}",
        source_records.homology,
        source_records.domain_scan,
        source_records.predictions
    );

    let merged = merge(
        &sources.homology,
        &sources.domain_profiles,
        &sources.predictions,
        &classifier,
    );
    let classified = merged.iter().filter(|r| r.family.is_some()).count();
    tracing::info!("🔗 Merged {} sequences ({} with a TF family)", merged.len(), classified);

    let supplementary = settings.supplementary.then(|| build_supplementary(&merged));
    let filtered = filter.apply(merged.clone());

    Ok(ReconOutcome {
        merged,
        filtered,
        supplementary,
        source_records,
        dropped_rows: sources.dropped_rows,
    })
}
