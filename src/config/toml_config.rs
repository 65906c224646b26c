use crate::core::filter::{DEFAULT_EXCLUSION_TERM, DEFAULT_SCORE_THRESHOLD};
use crate::core::formatter::DEFAULT_MISSING_MARKER;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_missing_marker, validate_non_empty_string, validate_path, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: Option<RunInfo>,
    pub inputs: InputsConfig,
    pub filters: Option<FiltersConfig>,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub reference: String,
    pub homology: String,
    pub domain_scan: String,
    pub predictions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    pub score_threshold: Option<f64>,
    pub exclusion_term: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: Option<String>,
    pub prefix: String,
    pub missing_marker: Option<String>,
    pub supplementary: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("inputs.reference", &self.inputs.reference)?;
        validate_path("inputs.homology", &self.inputs.homology)?;
        validate_path("inputs.domain_scan", &self.inputs.domain_scan)?;
        validate_path("inputs.predictions", &self.inputs.predictions)?;
        validate_path("output.directory", self.output_dir())?;
        validate_non_empty_string("output.prefix", &self.output.prefix)?;
        validate_range("filters.score_threshold", self.score_threshold(), 0.0, 1.0)?;
        validate_non_empty_string("filters.exclusion_term", self.exclusion_term())?;
        validate_missing_marker("output.missing_marker", self.missing_marker())?;
        Ok(())
    }

    pub fn run_name(&self) -> &str {
        self.run.as_ref().map(|r| r.name.as_str()).unwrap_or(&self.output.prefix)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn set_score_threshold(&mut self, threshold: f64) {
        self.filters
            .get_or_insert(FiltersConfig {
                score_threshold: None,
                exclusion_term: None,
            })
            .score_threshold = Some(threshold);
    }
}

impl ConfigProvider for TomlConfig {
    fn reference_path(&self) -> &str {
        &self.inputs.reference
    }

    fn homology_path(&self) -> &str {
        &self.inputs.homology
    }

    fn domain_scan_path(&self) -> &str {
        &self.inputs.domain_scan
    }

    fn prediction_path(&self) -> &str {
        &self.inputs.predictions
    }

    fn output_dir(&self) -> &str {
        self.output.directory.as_deref().unwrap_or(".")
    }

    fn output_prefix(&self) -> &str {
        &self.output.prefix
    }

    fn score_threshold(&self) -> f64 {
        self.filters
            .as_ref()
            .and_then(|f| f.score_threshold)
            .unwrap_or(DEFAULT_SCORE_THRESHOLD)
    }

    fn exclusion_term(&self) -> &str {
        self.filters
            .as_ref()
            .and_then(|f| f.exclusion_term.as_deref())
            .unwrap_or(DEFAULT_EXCLUSION_TERM)
    }

    fn missing_marker(&self) -> &str {
        self.output
            .missing_marker
            .as_deref()
            .unwrap_or(DEFAULT_MISSING_MARKER)
    }

    fn write_supplementary(&self) -> bool {
        self.output.supplementary.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
