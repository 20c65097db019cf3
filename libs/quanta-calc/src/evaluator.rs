//! Evaluator - solves a registered formula for one of its variables
//!
//! The evaluator checks the inputs against the formula, converts them to base
//! units, runs the solve branch for the target and converts the result to the
//! requested unit. It keeps no state between calls.
//!
//! ```rust
//! use quanta_calc::{evaluate, Quantity};
//!
//! let result = evaluate(
//!     "capacitor",
//!     "C",
//!     [("Q", Quantity::new(25.0, "µC")), ("V", Quantity::new(5.0, "V"))],
//! )
//! .unwrap();
//! assert_eq!(result.display, "5");
//! assert_eq!(result.unit, "µF");
//! ```

use crate::engine::{self, CalcEngine};
use crate::error::{CalcError, Result};
use crate::format::Formatter;
use crate::formula::{Constraint, FormulaSpec, Rule, Variable};
use crate::quantity::Quantity;
use crate::registry::FormulaRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Serializable form of an evaluation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub formula: String,
    /// Symbol or name of the variable to solve for
    pub target: String,
    /// Every other variable, keyed by symbol or name
    pub knowns: BTreeMap<String, Quantity>,
    /// Output unit; the target's default unit when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A secondary value recomputed after the solve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedResult {
    pub symbol: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub formula: String,
    /// Symbol of the solved variable
    pub target: String,
    /// Result in `unit`
    pub value: f64,
    pub unit: String,
    /// `value` rendered by the formatter
    pub display: String,
    pub base_value: f64,
    pub base_unit: String,
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub derived: Vec<DerivedResult>,
}

impl EvaluationResult {
    /// Display value followed by its unit
    pub fn display_with_unit(&self) -> String {
        with_unit(&self.display, &self.unit)
    }
}

fn with_unit(display: &str, unit: &str) -> String {
    if unit.is_empty() {
        display.to_string()
    } else {
        format!("{} {}", display, unit)
    }
}

/// Formula evaluator over a registry
#[derive(Debug, Clone)]
pub struct Evaluator<'r> {
    registry: &'r FormulaRegistry,
    engine: CalcEngine,
    formatter: Formatter,
}

impl Evaluator<'static> {
    /// Evaluator over the built-in catalogue
    pub fn builtin() -> Self {
        Self::new(FormulaRegistry::builtin())
    }
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r FormulaRegistry) -> Self {
        Self {
            registry,
            engine: CalcEngine::new(),
            formatter: Formatter::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn registry(&self) -> &'r FormulaRegistry {
        self.registry
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Solve `formula` for `target`, reporting the result in the target's
    /// default unit.
    pub fn evaluate<I, K>(&self, formula: &str, target: &str, knowns: I) -> Result<EvaluationResult>
    where
        I: IntoIterator<Item = (K, Quantity)>,
        K: AsRef<str>,
    {
        self.solve(formula, target, knowns, None)
    }

    pub fn evaluate_request(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        self.solve(
            &request.formula,
            &request.target,
            request.knowns.iter().map(|(k, q)| (k.as_str(), q.clone())),
            request.unit.as_deref(),
        )
    }

    /// Solve with an explicit output unit
    pub fn evaluate_in<I, K>(
        &self,
        formula: &str,
        target: &str,
        knowns: I,
        unit: &str,
    ) -> Result<EvaluationResult>
    where
        I: IntoIterator<Item = (K, Quantity)>,
        K: AsRef<str>,
    {
        self.solve(formula, target, knowns, Some(unit))
    }

    fn solve<I, K>(
        &self,
        formula: &str,
        target: &str,
        knowns: I,
        unit: Option<&str>,
    ) -> Result<EvaluationResult>
    where
        I: IntoIterator<Item = (K, Quantity)>,
        K: AsRef<str>,
    {
        let spec = self.registry.get(formula)?;
        let target = spec
            .find_variable(target)
            .ok_or_else(|| CalcError::unknown_variable(&spec.name, target.trim()))?;
        let branch = spec
            .branch(&target.symbol)
            .ok_or_else(|| CalcError::unknown_variable(&spec.name, &target.symbol))?;

        let inputs = match_inputs(spec, target, knowns)?;

        // Units
        let mut resolved: Vec<(&Variable, f64, f64)> = Vec::with_capacity(inputs.len());
        for (var, quantity) in &inputs {
            let quantity = Quantity::new(quantity.value, unit_or_default(&quantity.unit, &var.unit));
            resolved.push((*var, quantity.value, quantity.to_base(var.dimension)?));
        }
        let out_unit = target
            .dimension
            .table()
            .canonical(unit.map_or(target.unit.as_str(), |u| unit_or_default(u, &target.unit)))?;

        let mut values: HashMap<String, f64> = HashMap::with_capacity(spec.variables.len());
        for (var, value, base) in resolved {
            if !value.is_finite() {
                return Err(CalcError::invalid_domain(
                    &var.symbol,
                    "value must be a finite number",
                ));
            }
            values.insert(var.symbol.clone(), base);
        }

        // Zero divisors of the branch, then formula constraints over known
        // inputs, then the rest of the branch's own
        let (divisors, guards): (Vec<&Constraint>, Vec<&Constraint>) = branch
            .constraints
            .iter()
            .partition(|c| matches!(c.rule, Rule::Denominator { .. }));
        for constraint in divisors {
            self.check_known(spec, &target.symbol, constraint, &values)?;
        }
        let mut deferred: Vec<&Constraint> = Vec::new();
        for constraint in &spec.constraints {
            let involved = constraint_variables(spec, constraint)?;
            if involved.iter().any(|s| *s == target.symbol) {
                deferred.push(constraint);
            } else {
                self.check_known(spec, &target.symbol, constraint, &values)?;
            }
        }
        for constraint in guards {
            self.check_known(spec, &target.symbol, constraint, &values)?;
        }

        let base_value = self.engine.evaluate_simple(&branch.expression, &values)?;
        if !base_value.is_finite() {
            return Err(CalcError::invalid_domain(
                &target.symbol,
                "result is not a finite number",
            ));
        }

        let substituted = engine::substitute(&branch.expression, |name| {
            values.get(name).map(|v| self.operand(*v))
        })?;

        values.insert(target.symbol.clone(), base_value);
        for constraint in deferred {
            constraint.check(&self.engine, &values, &target.symbol)?;
        }

        let output = Quantity::from_base(target.dimension, base_value, out_unit)?;
        let display = self.formatter.format(output.value);
        let base_unit = target.dimension.table().base().symbol;
        let base_display = self.formatter.format(base_value);

        let derived = self.derive(spec, &values)?;

        let mut steps = vec![
            format!("{} = {}", target.symbol, branch.expression),
            format!("{} = {}", target.symbol, substituted),
        ];
        let mut result_line = format!("{} = {}", target.symbol, with_unit(&base_display, base_unit));
        if output.unit != base_unit {
            result_line.push_str(&format!(" = {}", with_unit(&display, &output.unit)));
        }
        steps.push(result_line);
        for d in &derived {
            steps.push(format!("{} = {}", d.symbol, with_unit(&d.display, &d.unit)));
        }

        debug!(
            formula = %spec.name,
            target = %target.symbol,
            base_value,
            unit = %output.unit,
            "Formula evaluated"
        );

        Ok(EvaluationResult {
            formula: spec.name.clone(),
            target: target.symbol.clone(),
            value: output.value,
            unit: output.unit,
            display,
            base_value,
            base_unit: base_unit.to_string(),
            steps,
            derived,
        })
    }

    fn derive(&self, spec: &FormulaSpec, values: &HashMap<String, f64>) -> Result<Vec<DerivedResult>> {
        let mut derived = Vec::with_capacity(spec.derived.len());
        for d in &spec.derived {
            let base = self.engine.evaluate_simple(&d.expression, values)?;
            if !base.is_finite() {
                debug!(formula = %spec.name, derived = %d.symbol, "Derived value skipped: not finite");
                continue;
            }
            let quantity = Quantity::from_base(d.dimension, base, &d.unit)?;
            derived.push(DerivedResult {
                symbol: d.symbol.clone(),
                name: d.name.clone(),
                value: quantity.value,
                display: self.formatter.format(quantity.value),
                unit: quantity.unit,
            });
        }
        Ok(derived)
    }

    /// Check a constraint whose variables are all known inputs
    fn check_known(
        &self,
        spec: &FormulaSpec,
        target: &str,
        constraint: &Constraint,
        values: &HashMap<String, f64>,
    ) -> Result<()> {
        let involved = constraint_variables(spec, constraint)?;
        let subject = involved.first().map_or(target, String::as_str);
        constraint.check(&self.engine, values, subject)
    }

    /// Operand text for the substituted step; negatives are parenthesized
    fn operand(&self, value: f64) -> String {
        let text = self.formatter.format(value);
        if text.starts_with('-') {
            format!("({})", text)
        } else {
            text
        }
    }
}

fn unit_or_default<'a>(unit: &'a str, default: &'a str) -> &'a str {
    let unit = unit.trim();
    if unit.is_empty() {
        default
    } else {
        unit
    }
}

/// Pair every non-target variable with exactly one input.
fn match_inputs<'s, I, K>(
    spec: &'s FormulaSpec,
    target: &Variable,
    knowns: I,
) -> Result<Vec<(&'s Variable, Quantity)>>
where
    I: IntoIterator<Item = (K, Quantity)>,
    K: AsRef<str>,
{
    let mut matched: Vec<(&'s Variable, Quantity)> = Vec::new();
    let mut unexpected = Vec::new();

    for (key, quantity) in knowns {
        let key = key.as_ref();
        match spec.find_variable(key) {
            Some(var)
                if var.symbol != target.symbol
                    && !matched.iter().any(|(m, _)| m.symbol == var.symbol) =>
            {
                matched.push((var, quantity));
            },
            _ => unexpected.push(key.trim().to_string()),
        }
    }

    let missing: Vec<String> = spec
        .variables
        .iter()
        .filter(|v| v.symbol != target.symbol)
        .filter(|v| !matched.iter().any(|(m, _)| m.symbol == v.symbol))
        .map(|v| v.symbol.clone())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(CalcError::missing_input(missing, unexpected));
    }

    // Formula order, so constraint checks and steps do not depend on input order
    matched.sort_by_key(|(var, _)| {
        spec.variables
            .iter()
            .position(|v| v.symbol == var.symbol)
            .unwrap_or(usize::MAX)
    });
    Ok(matched)
}

fn constraint_variables(spec: &FormulaSpec, constraint: &Constraint) -> Result<Vec<String>> {
    let mut involved = Vec::new();
    for expr in constraint.expressions() {
        for name in spec.referenced(expr)? {
            if !involved.contains(&name) {
                involved.push(name);
            }
        }
    }
    Ok(involved)
}

/// Solve a built-in formula.
pub fn evaluate<I, K>(formula: &str, target: &str, knowns: I) -> Result<EvaluationResult>
where
    I: IntoIterator<Item = (K, Quantity)>,
    K: AsRef<str>,
{
    Evaluator::builtin().evaluate(formula, target, knowns)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tracing_test::traced_test;

    fn q(value: f64, unit: &str) -> Quantity {
        Quantity::new(value, unit)
    }

    #[test]
    fn test_capacitance_steps() {
        let result = evaluate("capacitor", "C", [("Q", q(25.0, "µC")), ("V", q(5.0, "V"))]).unwrap();

        assert!((result.base_value - 5e-6).abs() < 1e-18);
        assert_eq!(result.unit, "µF");
        assert_eq!(result.display, "5");
        assert_eq!(result.base_unit, "F");
        assert_eq!(
            result.steps[..3],
            [
                "C = Q / V".to_string(),
                "C = 2.5000e-5 / 5".to_string(),
                "C = 5.0000e-6 F = 5 µF".to_string(),
            ]
        );
    }

    #[test]
    fn test_inputs_by_name_and_default_unit() {
        let result = evaluate(
            "capacitor",
            "charge",
            [("capacitance", q(2.0, "")), ("voltage", q(3.0, "V"))],
        )
        .unwrap();
        // 2 µF (default) × 3 V = 6 µC
        assert_eq!(result.target, "Q");
        assert_eq!(result.display, "6");
        assert_eq!(result.unit, "µC");
    }

    #[test]
    fn test_requested_unit() {
        let evaluator = Evaluator::builtin();
        let result = evaluator
            .evaluate_in("capacitor", "Q", [("C", q(2.0, "µF")), ("V", q(3.0, "V"))], "nC")
            .unwrap();
        assert!((result.value - 6000.0).abs() < 1e-9);
        assert_eq!(result.display_with_unit(), "6000 nC");
    }

    #[test]
    fn test_missing_and_unexpected_inputs() {
        let err = evaluate("capacitor", "C", [("Q", q(1.0, "C")), ("C", q(1.0, "F"))]).unwrap_err();
        assert_eq!(
            err,
            CalcError::missing_input(vec!["V".to_string()], vec!["C".to_string()])
        );

        let err = evaluate("capacitor", "C", Vec::<(&str, Quantity)>::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(err.variables(), vec!["Q".to_string(), "V".to_string()]);
    }

    #[test]
    fn test_duplicate_key_is_unexpected() {
        let err = evaluate(
            "capacitor",
            "C",
            [("Q", q(1.0, "C")), ("charge", q(1.0, "C")), ("V", q(1.0, "V"))],
        )
        .unwrap_err();
        assert_eq!(err, CalcError::missing_input(vec![], vec!["charge".to_string()]));
    }

    #[test]
    fn test_unknown_target_and_unit() {
        let err = evaluate("capacitor", "inductance", [("Q", q(1.0, "C"))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownVariable);

        let err = evaluate("capacitor", "C", [("Q", q(1.0, "furlong")), ("V", q(1.0, "V"))])
            .unwrap_err();
        assert_eq!(err, CalcError::unknown_unit("charge", "furlong"));

        let err = Evaluator::builtin()
            .evaluate_in("capacitor", "C", [("Q", q(1.0, "C")), ("V", q(1.0, "V"))], "kg")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownUnit);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let err = evaluate("capacitor", "C", [("Q", q(f64::NAN, "C")), ("V", q(1.0, "V"))])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomain);
        assert_eq!(err.variables(), vec!["Q".to_string()]);
    }

    #[test]
    fn test_constraint_on_target_checked_after_solve() {
        // V0 = 100, V1 = 50 at +10%/yr needs negative time
        let err = evaluate(
            "appreciation",
            "t",
            [
                ("V0", q(100.0, "$")),
                ("V1", q(50.0, "$")),
                ("r", q(10.0, "%")),
            ],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomain);
        assert_eq!(err.variables(), vec!["t".to_string()]);
    }

    #[test]
    fn test_zero_divisor_reported_before_sign_rule() {
        // lambda = 0 also breaks "wavelength must be positive"
        let err = evaluate("photon-energy", "E", [("lambda", q(0.0, "nm"))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DivisionByZero);
        assert_eq!(err.variables(), vec!["lambda".to_string()]);

        let err = evaluate("photon-energy", "E", [("lambda", q(-500.0, "nm"))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDomain);
    }

    #[test]
    fn test_negative_operand_is_parenthesized() {
        let result = evaluate("ohms-law", "V", [("I", q(-2.0, "A")), ("R", q(10.0, "Ω"))]).unwrap();
        assert_eq!(result.steps[1], "V = (-2) * 10");
        assert_eq!(result.display, "-20");
    }

    #[test]
    fn test_derived_values_follow_solve() {
        let result = evaluate("markup", "price", [("cost", q(80.0, "$")), ("markup", q(25.0, "%"))])
            .unwrap();
        assert_eq!(result.display, "100");
        let profit = result.derived.iter().find(|d| d.symbol == "profit").unwrap();
        assert_eq!(profit.display, "20");
        let margin = result.derived.iter().find(|d| d.symbol == "margin").unwrap();
        assert_eq!(margin.display, "20");
        assert_eq!(margin.unit, "%");
        assert_eq!(result.steps.last().unwrap(), "margin = 20 %");
    }

    #[test]
    fn test_non_finite_derived_value_is_omitted() {
        // price = 0 makes the margin 0/0
        let result = evaluate("markup", "price", [("cost", q(0.0, "$")), ("markup", q(10.0, "%"))])
            .unwrap();
        assert!(result.derived.iter().all(|d| d.symbol != "margin"));
        assert!(result.derived.iter().any(|d| d.symbol == "profit"));
    }

    #[test]
    fn test_evaluate_request() {
        let request: EvaluationRequest = serde_json::from_str(
            r#"{
                "formula": "ohms-law-calculator",
                "target": "current",
                "knowns": {"V": {"value": 12, "unit": "V"}, "R": {"value": 4, "unit": "kohm"}},
                "unit": "mA"
            }"#,
        )
        .unwrap();
        let result = Evaluator::builtin().evaluate_request(&request).unwrap();
        assert_eq!(result.formula, "ohms-law");
        assert_eq!(result.display_with_unit(), "3 mA");
    }

    #[traced_test]
    #[test]
    fn test_evaluation_is_logged() {
        evaluate("ohms-law", "R", [("V", q(10.0, "V")), ("I", q(2.0, "A"))]).unwrap();
        assert!(logs_contain("Formula evaluated"));
        assert!(logs_contain("ohms-law"));
    }
}
