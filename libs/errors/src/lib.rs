//! Unified error handling for Quanta tools
//!
//! [`QuantaError`] covers everything outside a single calculation:
//! configuration, files, output encoding and logging setup. Calculation
//! failures are carried as [`CalcError`] and keep their kind.
//! [`ErrorInfo`] is the payload written when errors are reported as data.

use quanta_calc::{CalcError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// ErrorInfo - structured error payload
// ============================================================================

/// Standard error information for JSON/YAML output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// HTTP-style status code
    pub code: u16,
    /// Stable machine-readable error code (`DIVISION_BY_ZERO`)
    pub kind: String,
    /// Error message
    pub message: String,
    /// Detailed error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Per-variable errors for form validation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ErrorInfo {
    /// Create a new ErrorInfo with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            kind: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a field error
    pub fn add_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(error.into());
        self
    }
}

/// Error code for a calculation error kind
pub fn calc_error_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UnknownUnit => "UNKNOWN_UNIT",
        ErrorKind::UnknownFormula => "UNKNOWN_FORMULA",
        ErrorKind::UnknownVariable => "UNKNOWN_VARIABLE",
        ErrorKind::MissingInput => "MISSING_INPUT",
        ErrorKind::InvalidDomain => "INVALID_DOMAIN",
        ErrorKind::DivisionByZero => "DIVISION_BY_ZERO",
        ErrorKind::Expression => "EXPRESSION_ERROR",
        ErrorKind::InvalidFormula => "INVALID_FORMULA",
    }
}

fn calc_status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::UnknownFormula | ErrorKind::UnknownVariable => 404,
        ErrorKind::UnknownUnit | ErrorKind::MissingInput => 400,
        ErrorKind::InvalidDomain | ErrorKind::DivisionByZero => 422,
        ErrorKind::Expression | ErrorKind::InvalidFormula => 500,
    }
}

impl From<&CalcError> for ErrorInfo {
    fn from(err: &CalcError) -> Self {
        let kind = err.kind();
        let mut info = ErrorInfo::new(err.to_string())
            .with_code(calc_status_code(kind))
            .with_kind(calc_error_code(kind));

        match err {
            CalcError::MissingInput {
                missing,
                unexpected,
            } => {
                for field in missing {
                    info = info.add_field_error(field, "required");
                }
                for field in unexpected {
                    info = info.add_field_error(field, "not an input of this calculation");
                }
            },
            CalcError::InvalidDomain { variable, reason }
            | CalcError::DivisionByZero { variable, reason } => {
                info = info.add_field_error(variable, reason);
            },
            CalcError::UnknownUnit { dimension, unit } => {
                info = info.with_details(format!("'{}' is not a {} unit", unit, dimension));
            },
            _ => {},
        }
        info
    }
}

// ============================================================================
// QuantaError - Main error type
// ============================================================================

/// Main error type for Quanta tools
#[derive(Debug, Error)]
pub enum QuantaError {
    // ======================================
    // Configuration Errors
    // ======================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // ======================================
    // Calculation Errors
    // ======================================
    #[error(transparent)]
    Calculation(#[from] CalcError),

    // ======================================
    // Input Errors
    // ======================================
    #[error("Invalid argument: {param}: {reason}")]
    InvalidArgument { param: String, reason: String },

    // ======================================
    // File & I/O Errors
    // ======================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ======================================
    // Runtime Errors
    // ======================================
    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using QuantaError
pub type QuantaResult<T> = Result<T, QuantaError>;

/// Error category enum - used for classification and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    NotFound,
    Calculation,
    Internal,
}

impl QuantaError {
    /// Stable error code (for output and logs)
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::Calculation(e) => calc_error_code(e.kind()),
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Io(_) => "IO_ERROR",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Logging(_) => "LOGGING_ERROR",
            Self::Other(_) => "OTHER_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::InvalidConfig { .. } => ErrorCategory::Configuration,
            Self::Calculation(e) => match e.kind() {
                ErrorKind::UnknownFormula | ErrorKind::UnknownVariable => ErrorCategory::NotFound,
                ErrorKind::UnknownUnit | ErrorKind::MissingInput => ErrorCategory::Validation,
                ErrorKind::InvalidFormula => ErrorCategory::Configuration,
                ErrorKind::InvalidDomain | ErrorKind::DivisionByZero | ErrorKind::Expression => {
                    ErrorCategory::Calculation
                },
            },
            Self::InvalidArgument { .. } => ErrorCategory::Validation,
            Self::FileNotFound(_) => ErrorCategory::NotFound,
            Self::Io(_) | Self::Serialization(_) | Self::Logging(_) | Self::Other(_) => {
                ErrorCategory::Internal
            },
        }
    }

    /// HTTP-style status code for [`ErrorInfo`]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Calculation(e) => calc_status_code(e.kind()),
            _ => match self.category() {
                ErrorCategory::Validation => 400,
                ErrorCategory::NotFound => 404,
                ErrorCategory::Calculation => 422,
                ErrorCategory::Configuration | ErrorCategory::Internal => 500,
            },
        }
    }

    /// Process exit code for command-line tools
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::NotFound => 2,
            ErrorCategory::Configuration => 78,
            ErrorCategory::Calculation | ErrorCategory::Internal => 1,
        }
    }

    /// Get log level
    pub fn log_level(&self) -> tracing::Level {
        match self.category() {
            ErrorCategory::Internal | ErrorCategory::Configuration => tracing::Level::ERROR,
            ErrorCategory::Calculation => tracing::Level::WARN,
            ErrorCategory::Validation | ErrorCategory::NotFound => tracing::Level::INFO,
        }
    }

    /// Convert to ErrorInfo for structured output
    pub fn to_error_info(&self) -> ErrorInfo {
        if let Self::Calculation(e) = self {
            return ErrorInfo::from(e);
        }

        let mut error_info = ErrorInfo::new(self.to_string())
            .with_code(self.status_code())
            .with_kind(self.error_code());

        match self {
            Self::InvalidConfig { field, reason } | Self::InvalidArgument { param: field, reason } => {
                error_info = error_info.add_field_error(field, reason);
            },
            Self::Other(e) => {
                if let Some(cause) = e.chain().nth(1) {
                    error_info = error_info.with_details(cause.to_string());
                }
            },
            _ => {},
        }

        error_info
    }
}

// Conversion traits for common error types
impl From<serde_json::Error> for QuantaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for QuantaError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// Helper macros for creating errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::QuantaError::Configuration($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::QuantaError::Configuration(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! argument_error {
    ($param:expr, $reason:expr) => {
        $crate::QuantaError::InvalidArgument {
            param: $param.to_string(),
            reason: $reason.to_string(),
        }
    };
}
