//! CalcEngine - Expression evaluator with built-in functions
//!
//! Provides formula evaluation with support for:
//! - Arithmetic: +, -, *, /, ^, %
//! - Built-in functions: sqrt, ln, exp, sin, cos, tan, asin, acos, atan, abs, min, max, clamp
//! - Constants: PI, R_INF, MU_0, PLANCK, LIGHT_SPEED, EARTH_RADIUS, K_EFF, YEAR, HOUR,
//!   BTU_PER_HOUR
//!
//! Integer literals are rewritten to floating point before evaluation, so
//! `1 / 4` is `0.25` and never evalexpr's integer division.

use crate::builtin_functions::{self, CONSTANTS};
use crate::error::{CalcError, Result};
use evalexpr::{ContextWithMutableFunctions, ContextWithMutableVariables, Value};
use regex::{Captures, Regex};
use std::collections::HashMap;

// Numbers are matched first so the exponent marker in `2.5e-3` is never read
// as an identifier.
const TOKEN_PATTERN: &str = r"\d+(?:\.\d*)?(?:[eE][+-]?\d+)?|([A-Za-z_][A-Za-z0-9_]*)";

fn token_regex() -> Result<Regex> {
    Regex::new(TOKEN_PATTERN).map_err(|e| CalcError::expression(format!("Regex error: {}", e)))
}

/// Identifiers referenced by an expression, in order of first appearance.
pub fn identifiers(expression: &str) -> Result<Vec<String>> {
    let re = token_regex()?;
    let mut names: Vec<String> = Vec::new();
    for captures in re.captures_iter(expression) {
        if let Some(name) = captures.get(1) {
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }
    Ok(names)
}

/// Replace identifiers for which `lookup` returns text, leaving everything
/// else (numbers, functions, constants) untouched.
pub fn substitute<F>(expression: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = token_regex()?;
    let replaced = re.replace_all(expression, |captures: &Captures| {
        let whole = captures.get(0).map(|m| m.as_str()).unwrap_or_default();
        captures
            .get(1)
            .and_then(|name| lookup(name.as_str()))
            .unwrap_or_else(|| whole.to_string())
    });
    Ok(replaced.into_owned())
}

/// Rewrite bare integer literals (`4`) as floats (`4.0`).
pub fn float_literals(expression: &str) -> Result<String> {
    let re = token_regex()?;
    let replaced = re.replace_all(expression, |captures: &Captures| {
        let whole = captures.get(0).map(|m| m.as_str()).unwrap_or_default();
        if captures.get(1).is_none() && whole.bytes().all(|b| b.is_ascii_digit()) {
            format!("{}.0", whole)
        } else {
            whole.to_string()
        }
    });
    Ok(replaced.into_owned())
}

/// CalcEngine - Formula evaluation engine
///
/// # Example
/// ```rust
/// use quanta_calc::CalcEngine;
/// use std::collections::HashMap;
///
/// let engine = CalcEngine::new();
/// let mut vars = HashMap::new();
/// vars.insert("Q".to_string(), 2.5e-5);
/// vars.insert("V".to_string(), 5.0);
///
/// let c = engine.evaluate_simple("Q / V", &vars).unwrap();
/// assert!((c - 5e-6).abs() < 1e-18);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CalcEngine;

impl CalcEngine {
    pub fn new() -> Self {
        Self
    }

    /// Whether `name` resolves inside every expression without being bound
    /// by the caller.
    pub fn is_builtin(name: &str) -> bool {
        builtin_functions::is_constant(name) || builtin_functions::is_function(name)
    }

    /// Evaluate an expression with the given variables bound
    pub fn evaluate_simple(&self, formula: &str, variables: &HashMap<String, f64>) -> Result<f64> {
        let mut context = evalexpr::HashMapContext::new();

        // Add constants
        for (name, value) in CONSTANTS {
            context
                .set_value(name.to_string(), Value::from(*value))
                .map_err(|e| {
                    CalcError::expression(format!("Failed to set constant {}: {}", name, e))
                })?;
        }

        // Add variables
        for (name, value) in variables {
            context
                .set_value(name.to_string(), Value::from(*value))
                .map_err(|e| {
                    CalcError::expression(format!("Failed to set variable {}: {}", name, e))
                })?;
        }

        Self::register_functions(&mut context)?;

        let expression = float_literals(formula)?;
        let result = evalexpr::eval_with_context(&expression, &context).map_err(|e| {
            CalcError::expression(format!("Failed to evaluate '{}': {}", formula, e))
        })?;

        Self::value_to_f64(result, formula)
    }

    /// Register built-in functions with evalexpr context
    fn register_functions(context: &mut evalexpr::HashMapContext) -> Result<()> {
        use evalexpr::{EvalexprError, Function};

        // Helper to convert Value to f64 (handles both Int and Float)
        fn to_f64(value: &Value) -> std::result::Result<f64, EvalexprError> {
            match value {
                Value::Float(f) => Ok(*f),
                Value::Int(i) => Ok(*i as f64),
                _ => Err(EvalexprError::expected_number(value.clone())),
            }
        }

        let unary: [(&str, fn(f64) -> f64); 10] = [
            ("sqrt", f64::sqrt),
            ("ln", f64::ln),
            ("exp", f64::exp),
            ("sin", builtin_functions::sin),
            ("cos", builtin_functions::cos),
            ("tan", builtin_functions::tan),
            ("asin", builtin_functions::asin),
            ("acos", builtin_functions::acos),
            ("atan", f64::atan),
            ("abs", builtin_functions::abs),
        ];

        for (name, function) in unary {
            context
                .set_function(
                    name.to_string(),
                    Function::new(move |args| {
                        let value = to_f64(args)?;
                        Ok(Value::Float(function(value)))
                    }),
                )
                .map_err(|e| {
                    CalcError::expression(format!("Failed to register {}: {}", name, e))
                })?;
        }

        // min(a, b)
        context
            .set_function(
                "min".to_string(),
                Function::new(|args| {
                    let tuple = args.as_tuple()?;
                    let a = to_f64(&tuple[0])?;
                    let b = to_f64(&tuple[1])?;
                    Ok(Value::Float(builtin_functions::min(a, b)))
                }),
            )
            .map_err(|e| CalcError::expression(format!("Failed to register min: {}", e)))?;

        // max(a, b)
        context
            .set_function(
                "max".to_string(),
                Function::new(|args| {
                    let tuple = args.as_tuple()?;
                    let a = to_f64(&tuple[0])?;
                    let b = to_f64(&tuple[1])?;
                    Ok(Value::Float(builtin_functions::max(a, b)))
                }),
            )
            .map_err(|e| CalcError::expression(format!("Failed to register max: {}", e)))?;

        // clamp(value, min, max)
        context
            .set_function(
                "clamp".to_string(),
                Function::new(|args| {
                    let tuple = args.as_tuple()?;
                    if tuple.len() != 3 {
                        return Err(EvalexprError::CustomMessage(format!(
                            "clamp expects 3 arguments, got {}",
                            tuple.len()
                        )));
                    }
                    let value = to_f64(&tuple[0])?;
                    let min = to_f64(&tuple[1])?;
                    let max = to_f64(&tuple[2])?;
                    if min > max {
                        return Err(EvalexprError::CustomMessage(format!(
                            "clamp: min {} exceeds max {}",
                            min, max
                        )));
                    }
                    Ok(Value::Float(builtin_functions::clamp(value, min, max)))
                }),
            )
            .map_err(|e| CalcError::expression(format!("Failed to register clamp: {}", e)))?;

        Ok(())
    }

    /// Convert evalexpr Value to f64
    fn value_to_f64(value: Value, formula: &str) -> Result<f64> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            _ => Err(CalcError::expression(format!(
                "Expression did not evaluate to a number: {}",
                formula
            ))),
        }
    }
}
