//! Quantity - a numeric value paired with a unit symbol

use crate::error::{CalcError, Result};
use crate::units::Dimension;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Parse form input: a numeric string and the unit picked next to it.
    ///
    /// `variable` only feeds error messages.
    pub fn parse(variable: &str, text: &str, unit: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CalcError::missing_input(vec![variable.to_string()], Vec::new()));
        }
        let value = parse_number(variable, text)?;
        Ok(Self::new(value, unit.trim()))
    }

    pub fn to_base(&self, dimension: Dimension) -> Result<f64> {
        dimension.table().to_base(self.value, &self.unit)
    }

    pub fn from_base(dimension: Dimension, value: f64, unit: &str) -> Result<Self> {
        let table = dimension.table();
        let def = table.lookup(unit)?;
        Ok(Self::new(def.from_base(value), def.symbol))
    }
}

fn parse_number(variable: &str, text: &str) -> Result<f64> {
    let value: f64 = text
        .parse()
        .map_err(|_| CalcError::invalid_domain(variable, format!("'{}' is not a number", text)))?;
    if !value.is_finite() {
        return Err(CalcError::invalid_domain(
            variable,
            "value must be a finite number",
        ));
    }
    Ok(value)
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

/// Parses `"<number>"`, `"<number> <unit>"` or `"<number>:<unit>"`.
/// A missing unit is left empty for the caller to default.
impl std::str::FromStr for Quantity {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (number, unit) = match s.split_once(':') {
            Some((number, unit)) => (number, unit),
            None => s.split_once(char::is_whitespace).unwrap_or((s, "")),
        };
        Quantity::parse("value", number, unit)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_trims_input() {
        let q = Quantity::parse("Q", "  25 ", " µC").unwrap();
        assert_eq!(q, Quantity::new(25.0, "µC"));
    }

    #[test]
    fn test_parse_empty_is_missing_input() {
        let err = Quantity::parse("V", "   ", "V").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(err.variables(), vec!["V".to_string()]);
    }

    #[test]
    fn test_parse_rejects_garbage_and_non_finite() {
        for text in ["abc", "NaN", "inf", "-infinity", "1e999"] {
            let err = Quantity::parse("x", text, "m").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDomain, "input {}", text);
        }
    }

    #[test]
    fn test_from_str_forms() {
        assert_eq!("25:µC".parse::<Quantity>().unwrap(), Quantity::new(25.0, "µC"));
        assert_eq!("2.5e-3 m".parse::<Quantity>().unwrap(), Quantity::new(2.5e-3, "m"));
        assert_eq!("-4".parse::<Quantity>().unwrap(), Quantity::new(-4.0, ""));
        assert_eq!("12000 BTU/h".parse::<Quantity>().unwrap().unit, "BTU/h");
    }

    #[test]
    fn test_base_round_trip() {
        let q = Quantity::new(1.5, "kV");
        let base = q.to_base(Dimension::Voltage).unwrap();
        assert_eq!(base, 1500.0);
        let back = Quantity::from_base(Dimension::Voltage, base, "kV").unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn test_temperature_round_trip() {
        let q = Quantity::new(20.0, "°C");
        let base = q.to_base(Dimension::Temperature).unwrap();
        assert!((base - 293.15).abs() < 1e-9);
        let back = Quantity::from_base(Dimension::Temperature, base, "degC").unwrap();
        assert_eq!(back.unit, "°C");
        assert!((back.value - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_base_canonicalizes_alias() {
        let q = Quantity::from_base(Dimension::Capacitance, 2e-6, "uF").unwrap();
        assert_eq!(q.unit, "µF");
        assert!((q.value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(Quantity::new(14.0, "$").to_string(), "14 $");
        assert_eq!(Quantity::new(3.0, "").to_string(), "3");
    }
}
