//! Display formatting for calculation results
//!
//! Values are rendered either fixed-point or in exponential notation:
//!
//! | Magnitude | Notation | Example |
//! |-----------|----------|---------|
//! | `0` | literal | `0` |
//! | `0 < \|v\| < small` | exponential | `2.5000e-5` |
//! | `small <= \|v\| < large` | fixed, trailing zeros stripped | `3.1416` |
//! | `\|v\| >= large` | exponential | `6.6667e10` |
//! | NaN, ±∞ | literal | `Invalid` |
//!
//! The notation is picked on the *rounded* value, so formatting output that
//! was already formatted gives it back unchanged.
//!
//! ```rust
//! use quanta_calc::format::{format_value, Formatter};
//!
//! assert_eq!(format_value(14.000000000000002), "14");
//! assert_eq!(format_value(6.666666666666667e10), "6.6667e10");
//! assert_eq!(Formatter::default().reformat("6.6667e10"), "6.6667e10");
//! ```

use serde::{Deserialize, Serialize};

/// Literal rendered for NaN and infinities.
pub const INVALID: &str = "Invalid";

/// Formatting thresholds and precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Maximum decimals in fixed-point notation
    pub decimals: usize,
    /// Mantissa decimals in exponential notation
    pub sci_digits: usize,
    /// Magnitudes below this (and non-zero) use exponential notation
    pub small: f64,
    /// Magnitudes at or above this use exponential notation
    pub large: f64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimals: 4,
            sci_digits: 4,
            small: 1e-3,
            large: 1e6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    fn wants_exponential(&self, value: f64) -> bool {
        let magnitude = value.abs();
        magnitude >= self.options.large || (magnitude < self.options.small && value != 0.0)
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return INVALID.to_string();
        }
        if value == 0.0 {
            return "0".to_string();
        }

        if self.wants_exponential(value) {
            let text = self.exponential(value);
            match text.parse::<f64>() {
                // Rounding the mantissa can carry the value back into the
                // fixed-point range (9.99996e-4 -> 1.0000e-3).
                Ok(rounded) if !self.wants_exponential(rounded) => self.fixed(rounded),
                _ => text,
            }
        } else {
            let text = self.fixed(value);
            match text.parse::<f64>() {
                // 999999.99999 rounds up to 1000000
                Ok(rounded) if self.wants_exponential(rounded) => self.exponential(rounded),
                _ => text,
            }
        }
    }

    /// Format a value that is already text, e.g. the output of [`format`](Self::format).
    ///
    /// Anything that does not parse as a number renders as [`INVALID`].
    pub fn reformat(&self, text: &str) -> String {
        match text.trim().parse::<f64>() {
            Ok(value) => self.format(value),
            Err(_) => INVALID.to_string(),
        }
    }

    fn exponential(&self, value: f64) -> String {
        format!("{:.*e}", self.options.sci_digits, value)
    }

    fn fixed(&self, value: f64) -> String {
        let text = format!("{:.*}", self.options.decimals, value);
        let text = if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.')
        } else {
            text.as_str()
        };
        match text {
            "-0" | "0" => "0".to_string(),
            other => other.to_string(),
        }
    }
}

/// Format with [`FormatOptions::default`].
pub fn format_value(value: f64) -> String {
    Formatter::default().format(value)
}
