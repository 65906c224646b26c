use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed reference table at row {row}: {reason}")]
    MalformedReferenceError { row: usize, reason: String },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumnError { table: String, column: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Reference,
    Schema,
    Io,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::MalformedReferenceError { .. } => ErrorCategory::Reference,
            EtlError::MissingColumnError { .. } | EtlError::CsvError(_) => ErrorCategory::Schema,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Reference | ErrorCategory::Schema => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    /// 失敗的處理階段名稱
    pub fn stage(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "config",
            ErrorCategory::Reference => "reference",
            ErrorCategory::Schema => "normalize",
            ErrorCategory::Io => "io",
            ErrorCategory::Output => "output",
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MalformedReferenceError { row, .. } => format!(
                "Fix row {} of the family reference table: every row needs a family and a domain",
                row
            ),
            EtlError::MissingColumnError { table, column } => format!(
                "Check that the {} table was produced with the expected output format (column '{}')",
                table, column
            ),
            EtlError::CsvError(_) => {
                "Check the delimiter and quoting of the input tables".to_string()
            }
            EtlError::IoError(_) => {
                "Make sure the input files exist and the output directory is writable".to_string()
            }
            EtlError::SerializationError(_) => "Re-run with --verbose to inspect the run summary".to_string(),
            EtlError::InvalidConfigValueError { field, .. }
            | EtlError::ConfigValidationError { field, .. } => {
                format!("Correct the value of '{}' and try again", field)
            }
            EtlError::ConfigError { .. } => "Review the configuration file".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("Stage '{}' failed: {}", self.stage(), self)
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
