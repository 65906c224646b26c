use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// 一筆 domain-scan 命中（InterProScan 一列）
#[derive(Debug, Clone, PartialEq)]
pub struct DomainHit {
    pub domain: Option<String>,
    pub description: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub evalue: Option<String>,
}

/// 單一序列的所有 domain 命中，`domains` 為分類器使用的集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceDomainProfile {
    pub sequence_id: String,
    pub domains: BTreeSet<String>,
    pub hits: Vec<DomainHit>,
}

impl SequenceDomainProfile {
    pub fn new(sequence_id: impl Into<String>) -> Self {
        Self {
            sequence_id: sequence_id.into(),
            ..Default::default()
        }
    }

    pub fn push_hit(&mut self, hit: DomainHit) {
        if let Some(domain) = &hit.domain {
            self.domains.insert(domain.clone());
        }
        self.hits.push(hit);
    }
}

/// 數值欄位：輸出用原始文字，解析後的值只用於比較
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericCell {
    pub text: String,
    pub value: Option<f64>,
}

impl NumericCell {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = text.parse().ok();
        Self { text, value }
    }
}

/// homology 欄位皆原樣保留，避免浮點格式化改變輸出
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomologyHit {
    pub sequence_id: String,
    pub title: Option<String>,
    pub percent_identity: Option<String>,
    pub query_coverage: Option<String>,
    pub evalue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TfPrediction {
    pub sequence_id: String,
    pub is_tf: Option<bool>,
    pub score: Option<NumericCell>,
}

/// 整併後的單一序列結果；`None` 代表該來源沒有資料
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifiedSequence {
    pub sequence_id: String,
    pub prediction: Option<bool>,
    pub score: Option<NumericCell>,
    pub title: Option<String>,
    pub percent_identity: Option<String>,
    pub query_coverage: Option<String>,
    pub evalue: Option<String>,
    pub domain: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub family: Option<String>,
}

impl ClassifiedSequence {
    pub fn score_value(&self) -> Option<f64> {
        self.score.as_ref().and_then(|s| s.value)
    }

    pub fn has_homology(&self) -> bool {
        self.title.is_some()
            || self.percent_identity.is_some()
            || self.query_coverage.is_some()
            || self.evalue.is_some()
    }
}

/// 正規化後的三個來源
#[derive(Debug, Clone, Default)]
pub struct NormalizedSources {
    pub homology: BTreeMap<String, HomologyHit>,
    pub domain_profiles: BTreeMap<String, SequenceDomainProfile>,
    pub predictions: BTreeMap<String, TfPrediction>,
    pub dropped_rows: SourceCounts,
}

/// 每個來源的計數（被丟棄的列或保留的紀錄）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub homology: usize,
    pub domain_scan: usize,
    pub predictions: usize,
}

impl SourceCounts {
    pub fn total(&self) -> usize {
        self.homology + self.domain_scan + self.predictions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    Merged,
    Confidence,
    LexicalExclusion,
    ClassificationPresence,
}

impl std::fmt::Display for FilterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FilterStage::Merged => "merged",
            FilterStage::Confidence => "confidence score filter",
            FilterStage::LexicalExclusion => "lexical exclusion",
            FilterStage::ClassificationPresence => "family classification filter",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCheckpoint {
    pub stage: FilterStage,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub rows: Vec<ClassifiedSequence>,
    pub checkpoints: Vec<StageCheckpoint>,
}

/// 輸出的表格，已是字串欄位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomologyCall {
    pub sequence: ClassifiedSequence,
    pub ml_supported: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SupplementaryTables {
    pub homology_calls: Vec<HomologyCall>,
    pub prediction_only: Vec<ClassifiedSequence>,
}

/// transform 階段的完整結果
#[derive(Debug, Clone)]
pub struct ReconOutcome {
    pub merged: Vec<ClassifiedSequence>,
    pub filtered: FilterOutcome,
    pub supplementary: Option<SupplementaryTables>,
    pub source_records: SourceCounts,
    pub dropped_rows: SourceCounts,
}
