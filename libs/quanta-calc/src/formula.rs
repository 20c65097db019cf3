//! Formula definitions
//!
//! A formula is data: a set of variables, one solve branch per variable and
//! a list of domain constraints. Built-in formulas are assembled with the
//! builder methods below; custom formulas are deserialized from config.
//!
//! ```rust
//! use quanta_calc::formula::{Category, Constraint, FormulaSpec};
//! use quanta_calc::units::Dimension;
//!
//! let spec = FormulaSpec::new("packing", "Packing Density", Category::Custom)
//!     .variable("rho", "density", Dimension::Density, "g/cm³")
//!     .variable("m", "mass", Dimension::Mass, "kg")
//!     .variable("Vol", "volume", Dimension::Volume, "L")
//!     .solve("rho", "m / Vol", vec![Constraint::denominator("Vol")])
//!     .solve("m", "rho * Vol", vec![])
//!     .solve("Vol", "m / rho", vec![Constraint::denominator("rho")]);
//! assert!(spec.validate().is_ok());
//! ```

use crate::engine::{self, CalcEngine};
use crate::error::{CalcError, Result};
use crate::units::Dimension;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Slack allowed past ±1 before a `unit_range` constraint fails. Ratios
/// inside the slack are clamped by `asin`/`acos`.
pub const UNIT_RANGE_TOLERANCE: f64 = 1e-9;

/// Catalogue grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Finance,
    Physics,
    Math,
    #[default]
    Custom,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Finance,
        Category::Physics,
        Category::Math,
        Category::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Physics => "physics",
            Self::Math => "math",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("Unknown category: '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Identifier used in expressions
    pub symbol: String,
    /// Human-readable name; also accepted as an input key
    pub name: String,
    pub dimension: Dimension,
    /// Default input/output unit
    #[serde(default)]
    pub unit: String,
}

/// Expression computing one variable from all the others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveBranch {
    pub expression: String,
    /// Checked before the expression runs, against the known inputs only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// Secondary output computed once the target is solved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedValue {
    pub symbol: String,
    pub name: String,
    pub dimension: Dimension,
    #[serde(default)]
    pub unit: String,
    pub expression: String,
}

/// Domain rule over expressions of a formula's variables.
///
/// Deserializes from a flat map: `{ rule = "positive", expr = "V0" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Divisor; exactly zero is a division by zero
    Denominator { expr: String },
    Positive { expr: String },
    NonNegative { expr: String },
    NotEqual { left: String, right: String },
    Less { left: String, right: String },
    AtMost { left: String, right: String },
    /// Argument of `asin`/`acos`: |expr| <= 1
    UnitRange { expr: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(flatten)]
    pub rule: Rule,
    /// Replaces the generated violation message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Constraint {
    fn from_rule(rule: Rule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    pub fn denominator(expr: &str) -> Self {
        Self::from_rule(Rule::Denominator { expr: expr.into() })
    }

    pub fn positive(expr: &str) -> Self {
        Self::from_rule(Rule::Positive { expr: expr.into() })
    }

    pub fn non_negative(expr: &str) -> Self {
        Self::from_rule(Rule::NonNegative { expr: expr.into() })
    }

    pub fn not_equal(left: &str, right: &str) -> Self {
        Self::from_rule(Rule::NotEqual {
            left: left.into(),
            right: right.into(),
        })
    }

    pub fn less(left: &str, right: &str) -> Self {
        Self::from_rule(Rule::Less {
            left: left.into(),
            right: right.into(),
        })
    }

    pub fn at_most(left: &str, right: &str) -> Self {
        Self::from_rule(Rule::AtMost {
            left: left.into(),
            right: right.into(),
        })
    }

    pub fn unit_range(expr: &str) -> Self {
        Self::from_rule(Rule::UnitRange { expr: expr.into() })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Expressions the rule evaluates
    pub fn expressions(&self) -> Vec<&str> {
        match &self.rule {
            Rule::Denominator { expr }
            | Rule::Positive { expr }
            | Rule::NonNegative { expr }
            | Rule::UnitRange { expr } => vec![expr.as_str()],
            Rule::NotEqual { left, right }
            | Rule::Less { left, right }
            | Rule::AtMost { left, right } => vec![left.as_str(), right.as_str()],
        }
    }

    /// Identifiers referenced by any of the rule's expressions
    pub fn identifiers(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for expr in self.expressions() {
            for name in engine::identifiers(expr)? {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    /// Evaluate the rule against base-unit values.
    ///
    /// `subject` is the variable reported in the error.
    pub fn check(
        &self,
        engine: &CalcEngine,
        values: &HashMap<String, f64>,
        subject: &str,
    ) -> Result<()> {
        let eval = |expr: &str| engine.evaluate_simple(expr, values);
        let violation = match &self.rule {
            Rule::Denominator { expr } => {
                if eval(expr)? == 0.0 {
                    let reason = self
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("{} must not be zero", expr));
                    return Err(CalcError::division_by_zero(subject, reason));
                }
                None
            },
            Rule::Positive { expr } => {
                let v = eval(expr)?;
                (v.is_nan() || v <= 0.0).then(|| format!("{} must be greater than zero", expr))
            },
            Rule::NonNegative { expr } => {
                let v = eval(expr)?;
                (v.is_nan() || v < 0.0).then(|| format!("{} must not be negative", expr))
            },
            Rule::NotEqual { left, right } => {
                (eval(left)? == eval(right)?).then(|| format!("{} must differ from {}", left, right))
            },
            Rule::Less { left, right } => {
                let ok = eval(left)? < eval(right)?;
                (!ok).then(|| format!("{} must be less than {}", left, right))
            },
            Rule::AtMost { left, right } => {
                let ok = eval(left)? <= eval(right)?;
                (!ok).then(|| format!("{} must not exceed {}", left, right))
            },
            Rule::UnitRange { expr } => {
                let ok = eval(expr)?.abs() <= 1.0 + UNIT_RANGE_TOLERANCE;
                (!ok).then(|| format!("{} must lie within [-1, 1]", expr))
            },
        };

        match violation {
            Some(default) => Err(CalcError::invalid_domain(
                subject,
                self.message.clone().unwrap_or(default),
            )),
            None => Ok(()),
        }
    }
}

/// Complete description of a multi-directional formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaSpec {
    /// Lookup key, lowercase with dashes (`ohms-law`)
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
    pub variables: Vec<Variable>,
    /// Keyed by target symbol
    pub solve: BTreeMap<String, SolveBranch>,
    /// Hold for every direction; rules touching the target are checked on the result
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derived: Vec<DerivedValue>,
}

impl FormulaSpec {
    pub fn new(name: &str, title: &str, category: Category) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            category,
            description: String::new(),
            variables: Vec::new(),
            solve: BTreeMap::new(),
            constraints: Vec::new(),
            derived: Vec::new(),
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.into();
        self
    }

    pub fn variable(mut self, symbol: &str, name: &str, dimension: Dimension, unit: &str) -> Self {
        self.variables.push(Variable {
            symbol: symbol.into(),
            name: name.into(),
            dimension,
            unit: unit.into(),
        });
        self
    }

    pub fn solve(mut self, target: &str, expression: &str, constraints: Vec<Constraint>) -> Self {
        self.solve.insert(
            target.into(),
            SolveBranch {
                expression: expression.into(),
                constraints,
            },
        );
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn derive(
        mut self,
        symbol: &str,
        name: &str,
        dimension: Dimension,
        unit: &str,
        expression: &str,
    ) -> Self {
        self.derived.push(DerivedValue {
            symbol: symbol.into(),
            name: name.into(),
            dimension,
            unit: unit.into(),
            expression: expression.into(),
        });
        self
    }

    /// Find a variable by symbol, or by name ignoring ASCII case
    pub fn find_variable(&self, key: &str) -> Option<&Variable> {
        let key = key.trim();
        self.variables
            .iter()
            .find(|v| v.symbol == key)
            .or_else(|| self.variables.iter().find(|v| v.name.eq_ignore_ascii_case(key)))
    }

    pub fn branch(&self, target: &str) -> Option<&SolveBranch> {
        self.solve.get(target)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.symbol.as_str())
    }

    /// Formula variables referenced by an expression, in order of appearance
    pub fn referenced(&self, expression: &str) -> Result<Vec<String>> {
        Ok(engine::identifiers(expression)?
            .into_iter()
            .filter(|name| self.variables.iter().any(|v| &v.symbol == name))
            .collect())
    }

    /// Structural checks run once when the formula is registered.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(CalcError::invalid_formula(&self.name, reason));

        if self.name.is_empty()
            || !self
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return fail("name must be lowercase letters, digits and dashes".into());
        }
        if self.variables.len() < 2 {
            return fail("a formula needs at least two variables".into());
        }

        let mut symbols = HashSet::new();
        let mut names = HashSet::new();
        for var in &self.variables {
            if !is_identifier(&var.symbol) {
                return fail(format!("'{}' is not a valid symbol", var.symbol));
            }
            if CalcEngine::is_builtin(&var.symbol) {
                return fail(format!("'{}' shadows a built-in name", var.symbol));
            }
            if !symbols.insert(var.symbol.as_str()) {
                return fail(format!("duplicate symbol '{}'", var.symbol));
            }
            if !names.insert(var.name.to_ascii_lowercase()) {
                return fail(format!("duplicate variable name '{}'", var.name));
            }
            if !var.dimension.table().contains(&var.unit) {
                return fail(format!(
                    "default unit '{}' of {} is not a {} unit",
                    var.unit, var.symbol, var.dimension
                ));
            }
        }

        for target in self.solve.keys() {
            if !symbols.contains(target.as_str()) {
                return fail(format!("solve branch for unknown variable '{}'", target));
            }
        }

        for var in &self.variables {
            let Some(branch) = self.solve.get(&var.symbol) else {
                return fail(format!("no solve branch for '{}'", var.symbol));
            };
            let inputs: HashSet<&str> =
                symbols.iter().copied().filter(|s| *s != var.symbol).collect();
            self.check_identifiers(&branch.expression, &inputs)?;
            for constraint in &branch.constraints {
                for expr in constraint.expressions() {
                    self.check_identifiers(expr, &inputs)?;
                }
            }
        }

        for constraint in &self.constraints {
            for expr in constraint.expressions() {
                self.check_identifiers(expr, &symbols)?;
            }
        }

        for derived in &self.derived {
            if symbols.contains(derived.symbol.as_str()) {
                return fail(format!("derived value '{}' reuses a variable symbol", derived.symbol));
            }
            if !derived.dimension.table().contains(&derived.unit) {
                return fail(format!(
                    "unit '{}' of derived value {} is not a {} unit",
                    derived.unit, derived.symbol, derived.dimension
                ));
            }
            self.check_identifiers(&derived.expression, &symbols)?;
        }

        Ok(())
    }

    fn check_identifiers(&self, expression: &str, allowed: &HashSet<&str>) -> Result<()> {
        for name in engine::identifiers(expression)? {
            if !allowed.contains(name.as_str()) && !CalcEngine::is_builtin(&name) {
                return Err(CalcError::invalid_formula(
                    &self.name,
                    format!("'{}' in '{}' is not an available input", name, expression),
                ));
            }
        }
        Ok(())
    }
}

fn is_identifier(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn capacitor() -> FormulaSpec {
        FormulaSpec::new("capacitor", "Capacitor", Category::Physics)
            .variable("Q", "charge", Dimension::Charge, "µC")
            .variable("C", "capacitance", Dimension::Capacitance, "µF")
            .variable("V", "voltage", Dimension::Voltage, "V")
            .solve("Q", "C * V", vec![])
            .solve("C", "Q / V", vec![Constraint::denominator("V")])
            .solve("V", "Q / C", vec![Constraint::denominator("C")])
    }

    fn values(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_valid_formula_passes() {
        capacitor().validate().unwrap();
    }

    #[test]
    fn test_find_variable_by_symbol_or_name() {
        let spec = capacitor();
        assert_eq!(spec.find_variable("Q").unwrap().name, "charge");
        assert_eq!(spec.find_variable("Capacitance").unwrap().symbol, "C");
        assert!(spec.find_variable("q").is_none());
    }

    #[test]
    fn test_missing_branch_is_rejected() {
        let mut spec = capacitor();
        spec.solve.remove("V");
        let err = spec.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormula);
        assert!(err.to_string().contains("no solve branch for 'V'"));
    }

    #[test]
    fn test_branch_may_not_use_its_target() {
        let spec = capacitor().solve("Q", "Q * 2.0", vec![]);
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("'Q'"), "{}", err);
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        let spec = capacitor().solve("V", "Q / Cap", vec![]);
        assert_eq!(spec.validate().unwrap_err().kind(), ErrorKind::InvalidFormula);
    }

    #[test]
    fn test_bad_default_unit_is_rejected() {
        let spec = capacitor().variable("L", "length", Dimension::Length, "parsec");
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("parsec"));
    }

    #[test]
    fn test_builtin_names_cannot_be_symbols() {
        let spec = FormulaSpec::new("bad", "Bad", Category::Math)
            .variable("PI", "pie", Dimension::Ratio, "")
            .variable("x", "x", Dimension::Ratio, "")
            .solve("PI", "x", vec![])
            .solve("x", "PI", vec![]);
        assert!(spec.validate().unwrap_err().to_string().contains("built-in"));
    }

    #[test]
    fn test_denominator_reports_division_by_zero() {
        let engine = CalcEngine::new();
        let rule = Constraint::denominator("C");
        let err = rule
            .check(&engine, &values(&[("Q", 1.0), ("C", 0.0)]), "C")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);
        assert_eq!(err.to_string(), "Division by zero: C must not be zero");
        rule.check(&engine, &values(&[("C", 1e-12)]), "C").unwrap();
    }

    #[test]
    fn test_domain_rules() {
        let engine = CalcEngine::new();
        let vals = values(&[("a", 2.0), ("b", 3.0), ("z", 0.0), ("n", -1.0)]);

        assert!(Constraint::positive("a").check(&engine, &vals, "a").is_ok());
        assert!(Constraint::positive("z").check(&engine, &vals, "z").is_err());
        assert!(Constraint::non_negative("z").check(&engine, &vals, "z").is_ok());
        assert!(Constraint::non_negative("n").check(&engine, &vals, "n").is_err());
        assert!(Constraint::less("a", "b").check(&engine, &vals, "a").is_ok());
        assert!(Constraint::less("b", "a").check(&engine, &vals, "b").is_err());
        assert!(Constraint::at_most("a", "a").check(&engine, &vals, "a").is_ok());
        assert!(Constraint::not_equal("a", "a").check(&engine, &vals, "a").is_err());
        assert!(Constraint::unit_range("n").check(&engine, &vals, "n").is_ok());
        assert!(Constraint::unit_range("a / b").check(&engine, &vals, "a").is_ok());
        assert!(Constraint::unit_range("b / a").check(&engine, &vals, "b").is_err());
    }

    #[test]
    fn test_unit_range_tolerates_drift() {
        let engine = CalcEngine::new();
        let vals = values(&[("r", 1.0 + 1e-12)]);
        assert!(Constraint::unit_range("r").check(&engine, &vals, "r").is_ok());
    }

    #[test]
    fn test_custom_message_replaces_default() {
        let engine = CalcEngine::new();
        let rule = Constraint::less("n1", "n2").with_message("n1 must be lower than n2");
        let err = rule
            .check(&engine, &values(&[("n1", 3.0), ("n2", 2.0)]), "n1")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomain);
        assert_eq!(err.to_string(), "Invalid value for n1: n1 must be lower than n2");
    }

    #[test]
    fn test_constraint_deserializes_flat() {
        let json = r#"{"rule": "at_most", "left": "clicks", "right": "impressions"}"#;
        let constraint: Constraint = serde_json::from_str(json).unwrap();
        assert_eq!(constraint, Constraint::at_most("clicks", "impressions"));

        let json = r#"{"rule": "denominator", "expr": "V", "message": "voltage is zero"}"#;
        let constraint: Constraint = serde_json::from_str(json).unwrap();
        assert_eq!(constraint.message.as_deref(), Some("voltage is zero"));
    }

    #[test]
    fn test_formula_deserializes_from_json() {
        let json = r#"{
            "name": "ohms-law-custom",
            "variables": [
                {"symbol": "V", "name": "voltage", "dimension": "voltage", "unit": "V"},
                {"symbol": "I", "name": "current", "dimension": "current", "unit": "A"},
                {"symbol": "R", "name": "resistance", "dimension": "resistance", "unit": "ohm"}
            ],
            "solve": {
                "V": {"expression": "I * R"},
                "I": {"expression": "V / R", "constraints": [{"rule": "denominator", "expr": "R"}]},
                "R": {"expression": "V / I", "constraints": [{"rule": "denominator", "expr": "I"}]}
            }
        }"#;
        let spec: FormulaSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.category, Category::Custom);
        assert_eq!(spec.branch("I").unwrap().constraints.len(), 1);
        spec.validate().unwrap();
    }

    #[test]
    fn test_referenced_ignores_builtins() {
        let spec = capacitor();
        assert_eq!(spec.referenced("sqrt(Q) * PI / V").unwrap(), vec!["Q", "V"]);
    }
}
