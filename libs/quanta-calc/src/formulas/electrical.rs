//! Circuit calculators: stored energy, reactance and power

use crate::formula::{Category, Constraint, FormulaSpec};
use crate::units::Dimension::{
    Capacitance, Charge, Current, Energy, Frequency, Inductance, Power, Ratio, Resistance, Time,
    Voltage,
};

pub(super) fn formulas() -> Vec<FormulaSpec> {
    vec![
        capacitor_energy(),
        capacitive_reactance(),
        inductive_reactance(),
        electrical_power(),
        watts_to_amps(),
        watt_hour(),
    ]
}

fn capacitor_energy() -> FormulaSpec {
    FormulaSpec::new("capacitor-energy", "Capacitor Energy", Category::Physics)
        .describe("Energy stored in a charged capacitor: E = ½ C V².")
        .variable("E", "stored energy", Energy, "J")
        .variable("C", "capacitance", Capacitance, "µF")
        .variable("V", "voltage", Voltage, "V")
        .solve("E", "0.5 * C * V^2", vec![])
        .solve("C", "2.0 * E / V^2", vec![Constraint::denominator("V")])
        .solve("V", "sqrt(2.0 * E / C)", vec![Constraint::denominator("C")])
        .constraint(Constraint::non_negative("E").with_message("energy cannot be negative"))
        .constraint(Constraint::positive("C").with_message("capacitance must be positive"))
        .constraint(Constraint::non_negative("V").with_message("voltage cannot be negative"))
        .derive("Q", "stored charge", Charge, "µC", "C * V")
}

fn capacitive_reactance() -> FormulaSpec {
    FormulaSpec::new("capacitive-reactance", "Capacitive Reactance", Category::Physics)
        .describe("Opposition of a capacitor to AC: Xc = 1 / (2π f C).")
        .variable("Xc", "capacitive reactance", Resistance, "Ω")
        .variable("f", "frequency", Frequency, "kHz")
        .variable("C", "capacitance", Capacitance, "µF")
        .solve(
            "Xc",
            "1.0 / (2.0 * PI * f * C)",
            vec![Constraint::denominator("f"), Constraint::denominator("C")],
        )
        .solve(
            "f",
            "1.0 / (2.0 * PI * Xc * C)",
            vec![Constraint::denominator("Xc"), Constraint::denominator("C")],
        )
        .solve(
            "C",
            "1.0 / (2.0 * PI * f * Xc)",
            vec![Constraint::denominator("f"), Constraint::denominator("Xc")],
        )
        .constraint(Constraint::positive("Xc").with_message("reactance must be positive"))
        .constraint(Constraint::positive("f").with_message("frequency must be positive"))
        .constraint(Constraint::positive("C").with_message("capacitance must be positive"))
}

fn inductive_reactance() -> FormulaSpec {
    FormulaSpec::new("inductive-reactance", "Inductive Reactance", Category::Physics)
        .describe("Opposition of an inductor to AC: XL = 2π f L.")
        .variable("XL", "inductive reactance", Resistance, "Ω")
        .variable("f", "frequency", Frequency, "Hz")
        .variable("L", "inductance", Inductance, "mH")
        .solve("XL", "2.0 * PI * f * L", vec![])
        .solve("f", "XL / (2.0 * PI * L)", vec![Constraint::denominator("L")])
        .solve("L", "XL / (2.0 * PI * f)", vec![Constraint::denominator("f")])
        .constraint(Constraint::positive("XL").with_message("reactance must be positive"))
        .constraint(Constraint::positive("f").with_message("frequency must be positive"))
        .constraint(Constraint::positive("L").with_message("inductance must be positive"))
}

fn electrical_power() -> FormulaSpec {
    FormulaSpec::new("electrical-power", "Electrical Power", Category::Physics)
        .describe("Power dissipated in a resistance: P = V² / R.")
        .variable("P", "power", Power, "W")
        .variable("V", "voltage", Voltage, "V")
        .variable("R", "resistance", Resistance, "Ω")
        .solve("P", "V^2 / R", vec![Constraint::denominator("R")])
        .solve("V", "sqrt(P * R)", vec![])
        .solve("R", "V^2 / P", vec![Constraint::denominator("P")])
        .constraint(Constraint::positive("P").with_message("power must be positive"))
        .constraint(Constraint::positive("V").with_message("voltage must be positive"))
        .constraint(Constraint::positive("R").with_message("resistance must be positive"))
        .derive("I", "current", Current, "A", "V / R")
}

fn watts_to_amps() -> FormulaSpec {
    FormulaSpec::new("watts-to-amps", "Watts to Amps", Category::Physics)
        .describe("Current drawn by a load: I = P / (V × PF). Use PF = 1 for DC.")
        .variable("I", "current", Current, "A")
        .variable("P", "power", Power, "W")
        .variable("V", "voltage", Voltage, "V")
        .variable("pf", "power factor", Ratio, "")
        .solve(
            "I",
            "P / (V * pf)",
            vec![Constraint::denominator("V"), Constraint::denominator("pf")],
        )
        .solve("P", "I * V * pf", vec![])
        .solve(
            "V",
            "P / (I * pf)",
            vec![Constraint::denominator("I"), Constraint::denominator("pf")],
        )
        .solve(
            "pf",
            "P / (I * V)",
            vec![Constraint::denominator("I"), Constraint::denominator("V")],
        )
        .constraint(Constraint::non_negative("P").with_message("power cannot be negative"))
        .constraint(Constraint::positive("V").with_message("voltage must be positive"))
        .constraint(Constraint::positive("pf").with_message("power factor must be positive"))
        .constraint(
            Constraint::at_most("pf", "1.0").with_message("power factor cannot exceed 1"),
        )
}

fn watt_hour() -> FormulaSpec {
    FormulaSpec::new("watt-hour", "Watt-Hours", Category::Physics)
        .describe("Energy used by a constant load over time: E = P × t.")
        .variable("E", "energy", Energy, "Wh")
        .variable("P", "power", Power, "W")
        .variable("t", "time", Time, "h")
        .solve("E", "P * t", vec![])
        .solve("P", "E / t", vec![Constraint::denominator("t")])
        .solve("t", "E / P", vec![Constraint::denominator("P")])
        .constraint(Constraint::positive("E").with_message("energy must be positive"))
        .constraint(Constraint::positive("P").with_message("power must be positive"))
        .constraint(Constraint::positive("t").with_message("time must be positive"))
}
