//! Error types for quanta-calc

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discriminant of [`CalcError`], stable across releases and safe to
/// serialize into API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownUnit,
    UnknownFormula,
    UnknownVariable,
    MissingInput,
    InvalidDomain,
    DivisionByZero,
    Expression,
    InvalidFormula,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownUnit => "unknown_unit",
            Self::UnknownFormula => "unknown_formula",
            Self::UnknownVariable => "unknown_variable",
            Self::MissingInput => "missing_input",
            Self::InvalidDomain => "invalid_domain",
            Self::DivisionByZero => "division_by_zero",
            Self::Expression => "expression",
            Self::InvalidFormula => "invalid_formula",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calculation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Unknown {dimension} unit: '{unit}'")]
    UnknownUnit { dimension: String, unit: String },

    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Formula '{formula}' has no variable '{variable}'")]
    UnknownVariable { formula: String, variable: String },

    #[error("Please enter all required fields: {}", describe_inputs(.missing, .unexpected))]
    MissingInput {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Invalid value for {variable}: {reason}")]
    InvalidDomain { variable: String, reason: String },

    #[error("Division by zero: {reason}")]
    DivisionByZero { variable: String, reason: String },

    #[error("Expression error: {0}")]
    Expression(String),

    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },
}

fn describe_inputs(missing: &[String], unexpected: &[String]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected {}", unexpected.join(", ")));
    }
    if parts.is_empty() {
        "no inputs given".to_string()
    } else {
        parts.join("; ")
    }
}

impl CalcError {
    pub fn unknown_unit(dimension: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::UnknownUnit {
            dimension: dimension.into(),
            unit: unit.into(),
        }
    }

    pub fn unknown_formula(name: impl Into<String>) -> Self {
        Self::UnknownFormula(name.into())
    }

    pub fn unknown_variable(formula: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::UnknownVariable {
            formula: formula.into(),
            variable: variable.into(),
        }
    }

    pub fn missing_input(missing: Vec<String>, unexpected: Vec<String>) -> Self {
        Self::MissingInput {
            missing,
            unexpected,
        }
    }

    pub fn invalid_domain(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            variable: variable.into(),
            reason: reason.into(),
        }
    }

    pub fn division_by_zero(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DivisionByZero {
            variable: variable.into(),
            reason: reason.into(),
        }
    }

    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    pub fn invalid_formula(formula: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormula {
            formula: formula.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownUnit { .. } => ErrorKind::UnknownUnit,
            Self::UnknownFormula(_) => ErrorKind::UnknownFormula,
            Self::UnknownVariable { .. } => ErrorKind::UnknownVariable,
            Self::MissingInput { .. } => ErrorKind::MissingInput,
            Self::InvalidDomain { .. } => ErrorKind::InvalidDomain,
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            Self::Expression(_) => ErrorKind::Expression,
            Self::InvalidFormula { .. } => ErrorKind::InvalidFormula,
        }
    }

    /// Variables the error points at, for field-level error reporting.
    pub fn variables(&self) -> Vec<String> {
        match self {
            Self::MissingInput {
                missing,
                unexpected,
            } => missing.iter().chain(unexpected).cloned().collect(),
            Self::InvalidDomain { variable, .. } | Self::DivisionByZero { variable, .. } => {
                vec![variable.clone()]
            },
            Self::UnknownVariable { variable, .. } => vec![variable.clone()],
            _ => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_message() {
        let err = CalcError::missing_input(vec!["V".into()], vec!["C".into()]);
        assert_eq!(
            err.to_string(),
            "Please enter all required fields: missing V; unexpected C"
        );
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(err.variables(), vec!["V".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::DivisionByZero).unwrap();
        assert_eq!(json, "\"division_by_zero\"");
        assert_eq!(ErrorKind::InvalidDomain.to_string(), "invalid_domain");
    }
}
