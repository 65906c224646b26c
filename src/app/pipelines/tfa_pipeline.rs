use crate::core::engine::{self, EngineSettings};
use crate::core::filter::FilterSettings;
use crate::core::formatter::{to_csv, OutputFormatter};
use crate::core::report::RunSummary;
use crate::core::{ConfigProvider, Pipeline, RawInputs, ReconOutcome, Storage};
use crate::domain::table::{
    RawTable, TableLayout, DOMAIN_SCAN_LAYOUT, HOMOLOGY_LAYOUT, PREDICTION_LAYOUT, REFERENCE_LAYOUT,
};
use crate::utils::error::Result;
use std::path::Path;

pub const RESULTS_SUFFIX: &str = "tfa_results.csv";
pub const SUMMARY_SUFFIX: &str = "tfa_summary.json";
pub const HOMOLOGY_CALLS_SUFFIX: &str = "homologytfs.csv";
pub const PREDICTION_ONLY_SUFFIX: &str = "no_homologytfs.csv";

/// 讀取四個表格、執行整併引擎並寫出結果
pub struct TfaPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> TfaPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            filter: FilterSettings {
                score_threshold: self.config.score_threshold(),
                exclusion_term: self.config.exclusion_term().to_string(),
            },
            supplementary: self.config.write_supplementary(),
        }
    }

    /// `<output_dir>/<prefix>.<suffix>`
    pub fn output_file(&self, suffix: &str) -> String {
        Path::new(self.config.output_dir())
            .join(format!("{}.{}", self.config.output_prefix(), suffix))
            .to_string_lossy()
            .into_owned()
    }

    async fn read_table(&self, path: &str, layout: &TableLayout) -> Result<RawTable> {
        tracing::debug!("Reading {} table from {}", layout.name, path);
        let data = self.storage.read_file(path).await?;
        RawTable::parse(&data, layout)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TfaPipeline<S, C> {
    async fn extract(&self) -> Result<RawInputs> {
        Ok(RawInputs {
            reference: self
                .read_table(self.config.reference_path(), &REFERENCE_LAYOUT)
                .await?,
            homology: self
                .read_table(self.config.homology_path(), &HOMOLOGY_LAYOUT)
                .await?,
            domain_scan: self
                .read_table(self.config.domain_scan_path(), &DOMAIN_SCAN_LAYOUT)
                .await?,
            predictions: self
                .read_table(self.config.prediction_path(), &PREDICTION_LAYOUT)
                .await?,
        })
    }

    async fn transform(&self, inputs: RawInputs) -> Result<ReconOutcome> {
        engine::run(&inputs, &self.settings())
    }

    async fn load(&self, outcome: ReconOutcome) -> Result<String> {
        let formatter = OutputFormatter::new(self.config.missing_marker());

        let results_path = self.output_file(RESULTS_SUFFIX);
        let table = formatter.format(&outcome.filtered.rows);
        self.storage.write_file(&results_path, &to_csv(&table)?).await?;
        tracing::debug!("Wrote {} result rows", table.rows.len());

        if let Some(tables) = &outcome.supplementary {
            let calls = formatter.format_homology_calls(&tables.homology_calls);
            self.storage
                .write_file(&self.output_file(HOMOLOGY_CALLS_SUFFIX), &to_csv(&calls)?)
                .await?;

            let prediction_only = formatter.format_prediction_only(&tables.prediction_only);
            self.storage
                .write_file(&self.output_file(PREDICTION_ONLY_SUFFIX), &to_csv(&prediction_only)?)
                .await?;
        }

        let summary = RunSummary::from_outcome(&outcome);
        self.storage
            .write_file(&self.output_file(SUMMARY_SUFFIX), &summary.to_json()?)
            .await?;

        Ok(results_path)
    }
}
