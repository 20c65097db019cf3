//! Command handlers
//!
//! Each handler returns the text to print so that the binary only decides
//! where it goes.

use crate::args::parse_knowns;
use crate::output::{render_data, render_result, OutputFormat};
use colored::Colorize;
use quanta_calc::{
    convert, Category, Dimension, Evaluator, FormulaRegistry, FormulaSpec, Formatter,
};
use quanta_common::QuantaConfig;
use quanta_errors::QuantaResult;
use tracing::debug;

/// Loaded configuration and the registry built from it
pub struct Session {
    config: QuantaConfig,
    registry: FormulaRegistry,
}

impl Session {
    pub fn new(config: QuantaConfig) -> QuantaResult<Self> {
        let registry = config.registry()?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &QuantaConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    fn formatter(&self) -> Formatter {
        self.config.formatter()
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry).with_formatter(self.formatter())
    }

    /// `quanta list`
    pub fn list(&self, category: Option<Category>) -> String {
        let mut out = String::new();
        for cat in Category::ALL {
            if category.is_some_and(|c| c != cat) {
                continue;
            }
            let specs: Vec<&FormulaSpec> = self.registry.by_category(cat).collect();
            if specs.is_empty() {
                continue;
            }
            out.push_str(&format!("{}\n", cat.as_str().to_uppercase().bright_cyan().bold()));
            for spec in specs {
                out.push_str(&format!("  {:<18} {}\n", spec.name.bright_yellow(), spec.title));
            }
        }
        out
    }

    /// `quanta show <formula>`
    pub fn show(&self, name: &str) -> QuantaResult<String> {
        let spec = self.registry.get(name)?;
        let mut out = format!(
            "{} ({}) [{}]\n",
            spec.title.bold(),
            spec.name.bright_yellow(),
            spec.category
        );
        if !spec.description.is_empty() {
            out.push_str(&format!("{}\n", spec.description));
        }

        out.push_str(&format!("\n{}\n", "Variables:".bright_cyan()));
        for var in &spec.variables {
            let unit = if var.unit.is_empty() { "-" } else { var.unit.as_str() };
            out.push_str(&format!(
                "  {:<10} {:<24} {:<12} {}\n",
                var.symbol, var.name, var.dimension, unit
            ));
        }

        out.push_str(&format!("\n{}\n", "Solve:".bright_cyan()));
        for var in &spec.variables {
            if let Some(branch) = spec.branch(&var.symbol) {
                out.push_str(&format!("  {} = {}\n", var.symbol, branch.expression));
            }
        }

        if !spec.derived.is_empty() {
            out.push_str(&format!("\n{}\n", "Derived:".bright_cyan()));
            for derived in &spec.derived {
                out.push_str(&format!(
                    "  {} = {}  {}\n",
                    derived.symbol,
                    derived.expression,
                    format!("({})", derived.name).dimmed()
                ));
            }
        }
        Ok(out)
    }

    /// `quanta eval <formula> --solve <target> NAME=VALUE[:UNIT]...`
    pub fn eval(
        &self,
        formula: &str,
        target: &str,
        unit: Option<&str>,
        knowns: &[String],
        format: OutputFormat,
    ) -> QuantaResult<String> {
        let knowns = parse_knowns(knowns)?;
        debug!(formula, target, inputs = knowns.len(), "eval command");

        let evaluator = self.evaluator();
        let result = match unit {
            Some(unit) => evaluator.evaluate_in(formula, target, knowns, unit)?,
            None => evaluator.evaluate(formula, target, knowns)?,
        };
        render_result(&result, format)
    }

    /// `quanta convert <value> <from> <to>`
    pub fn convert(&self, value: f64, from: &str, to: &str) -> QuantaResult<String> {
        let (converted, dimension) = convert(value, from, to)?;
        let formatter = self.formatter();
        Ok(format!(
            "{} {} = {} {}  {}\n",
            formatter.format(value),
            from.trim(),
            formatter.format(converted).bright_green().bold(),
            to.trim(),
            format!("({})", dimension).dimmed()
        ))
    }

    /// `quanta units [dimension]`
    pub fn units(&self, dimension: Option<Dimension>) -> String {
        let formatter = self.formatter();
        let mut out = String::new();
        for dim in Dimension::ALL {
            if dimension.is_some_and(|d| d != dim) {
                continue;
            }
            let table = dim.table();
            out.push_str(&format!(
                "{} (base: {})\n",
                dim.as_str().bright_cyan().bold(),
                display_symbol(table.base().symbol)
            ));
            for unit in table.units {
                let mut line = format!(
                    "  {:<8} {:<28} {}",
                    display_symbol(unit.symbol),
                    unit.name,
                    formatter.format(unit.factor)
                );
                if unit.offset != 0.0 {
                    line.push_str(&format!(" + {}", formatter.format(unit.offset)));
                }
                let aliases: Vec<&str> = unit
                    .aliases
                    .iter()
                    .copied()
                    .filter(|a| !a.is_empty())
                    .collect();
                if !aliases.is_empty() {
                    line.push_str(&format!("  {}", format!("[{}]", aliases.join(", ")).dimmed()));
                }
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// `quanta format <value>...`
    pub fn format(&self, values: &[String]) -> String {
        let formatter = self.formatter();
        values
            .iter()
            .map(|value| format!("{}\n", formatter.reformat(value)))
            .collect()
    }

    /// `quanta config`: effective configuration
    pub fn dump_config(&self, format: OutputFormat) -> QuantaResult<String> {
        let format = match format {
            OutputFormat::Text => OutputFormat::Yaml,
            other => other,
        };
        render_data(&self.config, format)
    }
}

fn display_symbol(symbol: &str) -> &str {
    if symbol.is_empty() {
        "(none)"
    } else {
        symbol
    }
}
