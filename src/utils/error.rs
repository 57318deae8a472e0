use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BirthdayError {
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Reference {reference} is earlier than birth {birth}")]
    ReferenceBeforeBirth {
        birth: NaiveDateTime,
        reference: NaiveDateTime,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BirthdayError {
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        BirthdayError::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BirthdayError::InvalidDate { .. } | BirthdayError::ReferenceBeforeBirth { .. } => {
                ErrorCategory::Data
            }
            BirthdayError::ConfigValidationError { .. }
            | BirthdayError::InvalidConfigValueError { .. }
            | BirthdayError::CsvError(_) => ErrorCategory::Configuration,
            BirthdayError::IoError(_) | BirthdayError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BirthdayError::InvalidDate { .. } => {
                "Check the stored birth date: use YYYY-MM-DD (prefix a leap lunar month with 'L', e.g. 2023-L02-15)"
            }
            BirthdayError::ReferenceBeforeBirth { .. } => {
                "Pick a reference date on or after the birth date"
            }
            BirthdayError::IoError(_) => "Make sure the roster file exists and is readable",
            BirthdayError::CsvError(_) => {
                "Check the CSV header: id,name,birth_date,birth_time,is_lunar,gender,category,visible_to"
            }
            BirthdayError::SerializationError(_) => "Report this as a bug",
            BirthdayError::ConfigValidationError { .. }
            | BirthdayError::InvalidConfigValueError { .. } => {
                "Fix the roster configuration and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BirthdayError::InvalidDate { input, .. } => {
                format!("日期無效: {}", input)
            }
            BirthdayError::ReferenceBeforeBirth { .. } => "參考日期早於出生日期".to_string(),
            BirthdayError::IoError(e) => format!("無法讀取檔案: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BirthdayError>;
