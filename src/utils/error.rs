use thiserror::Error;

#[derive(Error, Debug)]
pub enum StadiumError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid argument `{name}`: {value} (must be at least 1)")]
    InvalidArgument { name: String, value: i64 },

    #[error("No stadium records to rank")]
    EmptyInput,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for `{field}`: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration `{field}`")]
    MissingConfigError { field: String },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StadiumError {
    pub fn invalid_argument(name: &str, value: i64) -> Self {
        StadiumError::InvalidArgument {
            name: name.to_string(),
            value,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StadiumError::CsvError(_)
            | StadiumError::SerializationError(_)
            | StadiumError::ValidationError { .. }
            | StadiumError::EmptyInput => ErrorCategory::Input,
            StadiumError::ConfigError { .. }
            | StadiumError::InvalidConfigValueError { .. }
            | StadiumError::MissingConfigError { .. }
            | StadiumError::UnsupportedFormat { .. } => ErrorCategory::Configuration,
            StadiumError::InvalidArgument { .. } => ErrorCategory::Processing,
            StadiumError::IoError(_) | StadiumError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 沒有資料可排名，不算失敗
            StadiumError::EmptyInput => ErrorSeverity::Low,
            StadiumError::ValidationError { .. } | StadiumError::CsvError(_) => {
                ErrorSeverity::Medium
            }
            StadiumError::InvalidArgument { .. }
            | StadiumError::ConfigError { .. }
            | StadiumError::InvalidConfigValueError { .. }
            | StadiumError::MissingConfigError { .. }
            | StadiumError::UnsupportedFormat { .. }
            | StadiumError::SerializationError(_) => ErrorSeverity::High,
            StadiumError::IoError(_) | StadiumError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StadiumError::EmptyInput => "Check that the input file contains at least one stadium row",
            StadiumError::InvalidArgument { .. } => "Use a value of 1 or greater for --top-n and --top-k",
            StadiumError::ValidationError { .. } => {
                "Fix the offending row or rerun with --skip-invalid-rows"
            }
            StadiumError::CsvError(_) => "Make sure the CSV has a header row with rank,stadium,capacity,region,country",
            StadiumError::SerializationError(_) => "Make sure the JSON input is an array of stadium objects",
            StadiumError::ConfigError { .. }
            | StadiumError::InvalidConfigValueError { .. }
            | StadiumError::MissingConfigError { .. } => "Review the configuration file or command line flags",
            StadiumError::UnsupportedFormat { .. } => "Supported formats are csv and json",
            StadiumError::IoError(_) => "Check that the paths exist and are readable/writable",
            StadiumError::ZipError(_) => "Retry without --bundle or check free disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StadiumError::EmptyInput => "No stadiums were found in the input".to_string(),
            StadiumError::InvalidArgument { name, value } => {
                format!("`{}` must be a positive number, got {}", name, value)
            }
            StadiumError::ValidationError { message } => format!("Input row rejected: {}", message),
            StadiumError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StadiumError>;
