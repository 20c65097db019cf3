//! Ideal gas state changes between two states of a fixed amount of gas
//!
//! Temperatures are solved in kelvin; entering them in °C or °F converts
//! through the offset of the temperature scale. Every state variable must be
//! positive, which for temperature means above absolute zero.

use crate::formula::{Category, Constraint, FormulaSpec};
use crate::units::Dimension::{Pressure, Temperature, Volume};

pub(super) fn formulas() -> Vec<FormulaSpec> {
    vec![boyles_law(), charles_law(), gay_lussacs_law()]
}

const ABOVE_ABSOLUTE_ZERO: &str = "temperature must be above absolute zero";

fn boyles_law() -> FormulaSpec {
    FormulaSpec::new("boyles-law", "Boyle's Law", Category::Physics)
        .describe("At constant temperature: P1 × V1 = P2 × V2.")
        .variable("P1", "initial pressure", Pressure, "kPa")
        .variable("V1", "initial volume", Volume, "L")
        .variable("P2", "final pressure", Pressure, "kPa")
        .variable("V2", "final volume", Volume, "L")
        .solve("P1", "P2 * V2 / V1", vec![Constraint::denominator("V1")])
        .solve("V1", "P2 * V2 / P1", vec![Constraint::denominator("P1")])
        .solve("P2", "P1 * V1 / V2", vec![Constraint::denominator("V2")])
        .solve("V2", "P1 * V1 / P2", vec![Constraint::denominator("P2")])
        .constraint(Constraint::positive("P1").with_message("pressure must be positive"))
        .constraint(Constraint::positive("V1").with_message("volume must be positive"))
        .constraint(Constraint::positive("P2").with_message("pressure must be positive"))
        .constraint(Constraint::positive("V2").with_message("volume must be positive"))
}

fn charles_law() -> FormulaSpec {
    FormulaSpec::new("charles-law", "Charles's Law", Category::Physics)
        .describe("At constant pressure: V1 / T1 = V2 / T2.")
        .variable("V1", "initial volume", Volume, "L")
        .variable("T1", "initial temperature", Temperature, "°C")
        .variable("V2", "final volume", Volume, "L")
        .variable("T2", "final temperature", Temperature, "°C")
        .solve("V1", "V2 * T1 / T2", vec![Constraint::denominator("T2")])
        .solve("T1", "V1 * T2 / V2", vec![Constraint::denominator("V2")])
        .solve("V2", "V1 * T2 / T1", vec![Constraint::denominator("T1")])
        .solve("T2", "V2 * T1 / V1", vec![Constraint::denominator("V1")])
        .constraint(Constraint::positive("V1").with_message("volume must be positive"))
        .constraint(Constraint::positive("T1").with_message(ABOVE_ABSOLUTE_ZERO))
        .constraint(Constraint::positive("V2").with_message("volume must be positive"))
        .constraint(Constraint::positive("T2").with_message(ABOVE_ABSOLUTE_ZERO))
}

fn gay_lussacs_law() -> FormulaSpec {
    FormulaSpec::new("gay-lussacs-law", "Gay-Lussac's Law", Category::Physics)
        .describe("At constant volume: P1 / T1 = P2 / T2.")
        .variable("P1", "initial pressure", Pressure, "kPa")
        .variable("T1", "initial temperature", Temperature, "°C")
        .variable("P2", "final pressure", Pressure, "kPa")
        .variable("T2", "final temperature", Temperature, "°C")
        .solve("P1", "P2 * T1 / T2", vec![Constraint::denominator("T2")])
        .solve("T1", "P1 * T2 / P2", vec![Constraint::denominator("P2")])
        .solve("P2", "P1 * T2 / T1", vec![Constraint::denominator("T1")])
        .solve("T2", "P2 * T1 / P1", vec![Constraint::denominator("P1")])
        .constraint(Constraint::positive("P1").with_message("pressure must be positive"))
        .constraint(Constraint::positive("T1").with_message(ABOVE_ABSOLUTE_ZERO))
        .constraint(Constraint::positive("P2").with_message("pressure must be positive"))
        .constraint(Constraint::positive("T2").with_message(ABOVE_ABSOLUTE_ZERO))
}
