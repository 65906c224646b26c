use crate::domain::model::ReconOutcome;
use crate::domain::table::RawInputs;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn reference_path(&self) -> &str;
    fn homology_path(&self) -> &str;
    fn domain_scan_path(&self) -> &str;
    fn prediction_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn output_prefix(&self) -> &str;
    fn score_threshold(&self) -> f64;
    fn exclusion_term(&self) -> &str;
    fn missing_marker(&self) -> &str;
    fn write_supplementary(&self) -> bool;
}

/// 將 domain 集合對應到 TF family
pub trait FamilyResolver {
    fn classify(&self, detected: &BTreeSet<String>) -> Option<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawInputs>;
    async fn transform(&self, inputs: RawInputs) -> Result<ReconOutcome>;
    async fn load(&self, outcome: ReconOutcome) -> Result<String>;
}
