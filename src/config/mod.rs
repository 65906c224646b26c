pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::filter::{DEFAULT_EXCLUSION_TERM, DEFAULT_SCORE_THRESHOLD};
#[cfg(feature = "cli")]
use crate::core::formatter::DEFAULT_MISSING_MARKER;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_missing_marker, validate_non_empty_string, validate_path, validate_range, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tfa-recon")]
#[command(about = "Reconcile homology, domain-scan and ML predictions into TF family calls")]
pub struct CliConfig {
    /// Family reference table (family,domain per line)
    #[arg(long)]
    pub reference: String,

    /// DIAMOND blastp tabular output
    #[arg(long)]
    pub homology: String,

    /// InterProScan TSV output
    #[arg(long)]
    pub domain_scan: String,

    /// DeepTFactor prediction_result.txt
    #[arg(long)]
    pub predictions: String,

    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Prefix for all output files
    #[arg(long)]
    pub output_prefix: String,

    #[arg(long, default_value_t = DEFAULT_SCORE_THRESHOLD)]
    pub score_threshold: f64,

    #[arg(long, default_value = DEFAULT_EXCLUSION_TERM)]
    pub exclusion_term: String,

    #[arg(long, default_value = DEFAULT_MISSING_MARKER, help = "Token written for fields with no data")]
    pub missing_marker: String,

    #[arg(long, help = "Also write homology-call and prediction-only tables")]
    pub supplementary: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn reference_path(&self) -> &str {
        &self.reference
    }

    fn homology_path(&self) -> &str {
        &self.homology
    }

    fn domain_scan_path(&self) -> &str {
        &self.domain_scan
    }

    fn prediction_path(&self) -> &str {
        &self.predictions
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn output_prefix(&self) -> &str {
        &self.output_prefix
    }

    fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    fn exclusion_term(&self) -> &str {
        &self.exclusion_term
    }

    fn missing_marker(&self) -> &str {
        &self.missing_marker
    }

    fn write_supplementary(&self) -> bool {
        self.supplementary
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("reference", &self.reference)?;
        validate_path("homology", &self.homology)?;
        validate_path("domain_scan", &self.domain_scan)?;
        validate_path("predictions", &self.predictions)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_non_empty_string("output_prefix", &self.output_prefix)?;
        validate_range("score_threshold", self.score_threshold, 0.0, 1.0)?;
        validate_non_empty_string("exclusion_term", &self.exclusion_term)?;
        validate_missing_marker("missing_marker", &self.missing_marker)?;
        Ok(())
    }
}
