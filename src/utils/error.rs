use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Source error ({source_name}): {message}")]
    SourceError {
        source_name: String,
        message: String,
    },

    #[error("Report processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ReportError::ApiError(_) | ReportError::SourceError { .. } => ErrorCategory::Network,
            ReportError::CsvError(_)
            | ReportError::SerializationError(_)
            | ReportError::ProcessingError { .. } => ErrorCategory::Data,
            ReportError::IoError(_) | ReportError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Timeouts and connection resets are worth a retry.
            ReportError::ApiError(e) if e.is_timeout() || e.is_connect() => ErrorSeverity::Medium,
            ReportError::SourceError { .. } => ErrorSeverity::Medium,
            ReportError::ApiError(_)
            | ReportError::CsvError(_)
            | ReportError::SerializationError(_)
            | ReportError::ProcessingError { .. } => ErrorSeverity::High,
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorSeverity::High,
            ReportError::IoError(_) | ReportError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ReportError::ConfigValidationError { field, .. }
            | ReportError::InvalidConfigValueError { field, .. } => {
                format!("Check the '{}' setting in your configuration", field)
            }
            ReportError::MissingConfigError { field } => {
                format!("Add the '{}' setting to your configuration", field)
            }
            ReportError::ApiError(_) | ReportError::SourceError { .. } => {
                "Verify the analysis endpoint is reachable and the access token is valid"
                    .to_string()
            }
            ReportError::SerializationError(_) => {
                "Make sure the source returns an analysis document with a 'rezults' list"
                    .to_string()
            }
            ReportError::CsvError(_) | ReportError::ProcessingError { .. } => {
                "Re-run with --verbose to see which result could not be processed".to_string()
            }
            ReportError::IoError(_) | ReportError::ZipError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not fetch lab results: {}", self),
            ErrorCategory::Data => format!("Lab results could not be processed: {}", self),
            ErrorCategory::System => format!("Could not write the report: {}", self),
        }
    }

    /// Process exit code used by the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
