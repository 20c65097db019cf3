//! Rendering of results and errors

use clap::ValueEnum;
use colored::Colorize;
use quanta_calc::EvaluationResult;
use quanta_errors::{QuantaError, QuantaResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    Json,
    Yaml,
}

/// Serialize `value` for the structured formats
pub fn render_data<T: Serialize>(value: &T, format: OutputFormat) -> QuantaResult<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        // serde_yaml already terminates with a newline
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Text => Err(QuantaError::Serialization(
            "text output has no data encoding".to_string(),
        )),
    }
}

pub fn render_result(result: &EvaluationResult, format: OutputFormat) -> QuantaResult<String> {
    if format != OutputFormat::Text {
        return render_data(result, format);
    }

    let mut out = format!(
        "{} = {}\n",
        result.target.bold(),
        result.display_with_unit().bright_green().bold()
    );

    if !result.derived.is_empty() {
        out.push('\n');
        for derived in &result.derived {
            let value = if derived.unit.is_empty() {
                derived.display.clone()
            } else {
                format!("{} {}", derived.display, derived.unit)
            };
            out.push_str(&format!(
                "  {} = {}  {}\n",
                derived.symbol,
                value.bright_cyan(),
                format!("({})", derived.name).dimmed()
            ));
        }
    }

    out.push_str(&format!("\n{}\n", "Steps:".bright_cyan()));
    for step in &result.steps {
        out.push_str(&format!("  {}\n", step));
    }
    Ok(out)
}

/// Render an error in place of a result.
///
/// Structured formats carry the [`ErrorInfo`](quanta_errors::ErrorInfo)
/// payload so that callers can key on `kind` and `field_errors`.
pub fn render_error(err: &QuantaError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{} {}\n", "Error:".bright_red().bold(), err),
        structured => render_data(&err.to_error_info(), structured)
            .unwrap_or_else(|_| format!("{}\n", err)),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use quanta_calc::{evaluate, CalcError, Quantity};

    fn cpm() -> EvaluationResult {
        evaluate(
            "cpm",
            "cpm",
            [
                ("spend", Quantity::new(3500.0, "$")),
                ("impressions", Quantity::new(250_000.0, "")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_text_result() {
        colored::control::set_override(false);
        let text = render_result(&cpm(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("cpm = 14 $\n"), "{text}");
        assert!(text.contains("Steps:\n  cpm = spend / impressions * 1000.0\n"));
    }

    #[test]
    fn test_json_result() {
        let json = render_result(&cpm(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["display"], "14");
        assert_eq!(value["target"], "cpm");
        assert_eq!(value["steps"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_yaml_result() {
        let yaml = render_result(&cpm(), OutputFormat::Yaml).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["formula"].as_str(), Some("cpm"));
        assert_eq!(value["value"].as_f64(), Some(14.0));
    }

    #[test]
    fn test_error_text() {
        colored::control::set_override(false);
        let err = QuantaError::from(CalcError::division_by_zero("C", "C must not be zero"));
        assert_eq!(
            render_error(&err, OutputFormat::Text),
            "Error: Division by zero: C must not be zero\n"
        );
    }

    #[test]
    fn test_error_json_has_no_result_fields() {
        let err = QuantaError::from(CalcError::missing_input(vec!["spend".into()], vec![]));
        let json = render_error(&err, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "MISSING_INPUT");
        assert_eq!(value["code"], 400);
        assert_eq!(value["field_errors"]["spend"][0], "required");
        assert!(value.get("display").is_none());
    }
}
