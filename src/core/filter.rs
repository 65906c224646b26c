use crate::domain::model::{ClassifiedSequence, FilterOutcome, FilterStage, StageCheckpoint};
use crate::utils::error::{EtlError, Result};
use regex::{Regex, RegexBuilder};

pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;
pub const DEFAULT_EXCLUSION_TERM: &str = "transposase";

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSettings {
    pub score_threshold: f64,
    pub exclusion_term: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            exclusion_term: DEFAULT_EXCLUSION_TERM.to_string(),
        }
    }
}

/// 依序套用：信心分數 → 關鍵字排除 → family 分類存在。
///
/// 每一階段都記錄剩餘列數，後一階段只會看到前一階段留下的列。
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    score_threshold: f64,
    exclusion: Regex,
}

impl FilterPipeline {
    pub fn new(settings: &FilterSettings) -> Result<Self> {
        let exclusion = RegexBuilder::new(&regex::escape(&settings.exclusion_term))
            .case_insensitive(true)
            .build()
            .map_err(|e| EtlError::InvalidConfigValueError {
                field: "exclusion_term".to_string(),
                value: settings.exclusion_term.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            score_threshold: settings.score_threshold,
            exclusion,
        })
    }

    pub fn apply(&self, rows: Vec<ClassifiedSequence>) -> FilterOutcome {
        let mut checkpoints = vec![checkpoint(FilterStage::Merged, rows.len())];

        let rows = self.run_stage(rows, FilterStage::Confidence, &mut checkpoints);
        let rows = self.run_stage(rows, FilterStage::LexicalExclusion, &mut checkpoints);
        let rows = self.run_stage(rows, FilterStage::ClassificationPresence, &mut checkpoints);

        FilterOutcome { rows, checkpoints }
    }

    pub fn passes(&self, stage: FilterStage, row: &ClassifiedSequence) -> bool {
        match stage {
            FilterStage::Merged => true,
            // 沒有分數或無法解析都視為未達門檻
            FilterStage::Confidence => row.score_value().is_some_and(|s| s >= self.score_threshold),
            FilterStage::LexicalExclusion => !row
                .description
                .as_deref()
                .is_some_and(|d| self.exclusion.is_match(d)),
            FilterStage::ClassificationPresence => row.family.is_some(),
        }
    }

    fn run_stage(
        &self,
        rows: Vec<ClassifiedSequence>,
        stage: FilterStage,
        checkpoints: &mut Vec<StageCheckpoint>,
    ) -> Vec<ClassifiedSequence> {
        let survivors: Vec<_> = rows.into_iter().filter(|row| self.passes(stage, row)).collect();
        checkpoints.push(checkpoint(stage, survivors.len()));
        survivors
    }
}

fn checkpoint(stage: FilterStage, remaining: usize) -> StageCheckpoint {
    tracing::info!("🔎 After {}: {}", stage, remaining);
    StageCheckpoint { stage, remaining }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NumericCell;

    fn row(id: &str, score: Option<f64>, description: Option<&str>, family: Option<&str>) -> ClassifiedSequence {
        ClassifiedSequence {
            sequence_id: id.to_string(),
            score: score.map(|s| NumericCell::new(s.to_string())),
            description: description.map(str::to_string),
            family: family.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_stages_in_order_with_checkpoints() {
        let pipeline = FilterPipeline::new(&FilterSettings::default()).unwrap();
        let rows = vec![
            row("keep", Some(0.5), Some("Homeodomain"), Some("Homeobox")),
            row("low", Some(0.49), Some("Homeodomain"), Some("Homeobox")),
            row("no_score", None, Some("Homeodomain"), Some("Homeobox")),
            row("transposon", Some(0.99), Some("DDE superfamily; TRANSPOSASE IS4"), Some("bZIP_1")),
            row("unclassified", Some(0.9), None, None),
        ];

        let outcome = pipeline.apply(rows);

        let counts: Vec<(FilterStage, usize)> =
            outcome.checkpoints.iter().map(|c| (c.stage, c.remaining)).collect();
        assert_eq!(
            counts,
            vec![
                (FilterStage::Merged, 5),
                (FilterStage::Confidence, 3),
                (FilterStage::LexicalExclusion, 2),
                (FilterStage::ClassificationPresence, 1),
            ]
        );
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].sequence_id, "keep");
    }

    #[test]
    fn test_unparseable_score_fails_confidence() {
        let pipeline = FilterPipeline::new(&FilterSettings::default()).unwrap();
        let candidate = ClassifiedSequence {
            score: Some(NumericCell::new("n/a")),
            ..row("s", None, None, Some("bHLH"))
        };
        assert!(!pipeline.passes(FilterStage::Confidence, &candidate));
    }

    #[test]
    fn test_missing_description_is_not_excluded() {
        let pipeline = FilterPipeline::new(&FilterSettings::default()).unwrap();
        let candidate = row("s", Some(0.7), None, Some("bHLH"));
        assert!(pipeline.passes(FilterStage::LexicalExclusion, &candidate));
    }

    #[test]
    fn test_exclusion_term_is_literal() {
        let settings = FilterSettings {
            score_threshold: 0.5,
            exclusion_term: "IS4.".to_string(),
        };
        let pipeline = FilterPipeline::new(&settings).unwrap();

        assert!(pipeline.passes(FilterStage::LexicalExclusion, &row("a", None, Some("IS4x"), None)));
        assert!(!pipeline.passes(FilterStage::LexicalExclusion, &row("b", None, Some("is4."), None)));
    }
}
