use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unable to POST gene list (status {status}): {body}")]
    SubmissionError { status: u16, body: String },

    #[error("Response is missing field '{field}'")]
    MissingFieldError { field: String },

    #[error("User list {user_list_id} not queryable after {attempts} attempts ({elapsed:?})")]
    NotQueryableError {
        user_list_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("Round-trip mismatch: submitted {expected:?}, retrieved {actual:?}")]
    RoundTripMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Data,
    Configuration,
    Verification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::IoError(_) => ErrorCategory::Io,
            CheckError::ApiError(_)
            | CheckError::SubmissionError { .. }
            | CheckError::NotQueryableError { .. } => ErrorCategory::Network,
            CheckError::SerializationError(_) => ErrorCategory::Data,
            CheckError::ConfigError { .. }
            | CheckError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CheckError::MissingFieldError { .. } | CheckError::RoundTripMismatch { .. } => {
                ErrorCategory::Verification
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Verification => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 斷言類錯誤（回應缺欄位、清單不一致）屬於檢查失敗，而非環境錯誤
    pub fn is_assertion(&self) -> bool {
        self.category() == ErrorCategory::Verification
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CheckError::IoError(_) => "Check that the gene list file exists and is readable",
            CheckError::ApiError(_) => "Check network connectivity and the service base URL",
            CheckError::SerializationError(_) => {
                "The service returned unexpected JSON; confirm the base URL points at Enrichr"
            }
            CheckError::ConfigError { .. } | CheckError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
            CheckError::SubmissionError { .. } => {
                "The service rejected the gene list; verify the list is non-empty and retry later"
            }
            CheckError::NotQueryableError { .. } => {
                "Increase --poll-deadline-ms; the service may be slow to save new lists"
            }
            CheckError::MissingFieldError { .. } | CheckError::RoundTripMismatch { .. } => {
                "The service contract may have changed; inspect the JSON report"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Gene list file not found".to_string()
            }
            CheckError::IoError(e) => format!("Could not read gene list: {}", e),
            CheckError::ApiError(e) if e.is_timeout() => "Enrichr request timed out".to_string(),
            CheckError::ApiError(_) => "Could not reach Enrichr".to_string(),
            CheckError::SubmissionError { status, .. } => {
                format!("Enrichr rejected the gene list (HTTP {})", status)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
