//! Physics and engineering calculators

use crate::formula::{Category, Constraint, FormulaSpec};
use crate::units::Dimension::{
    Angle, Area, Capacitance, Charge, Count, Current, Density, Energy, Force, Frequency, Length,
    Mass, Momentum, Power, Pressure, Ratio, Resistance, Resistivity, Stiffness, Time, Velocity,
    Voltage, Volume,
};

pub(super) fn formulas() -> Vec<FormulaSpec> {
    vec![
        capacitor(),
        ohms_law(),
        hookes_law(),
        youngs_modulus(),
        kinetic_energy(),
        photon_energy(),
        rydberg(),
        skin_depth(),
        radar_horizon(),
        horizon_distance(),
        wind_correction(),
        snells_law(),
        work(),
        momentum(),
        density_mass_volume(),
        wavelength_to_frequency(),
    ]
}

fn capacitor() -> FormulaSpec {
    FormulaSpec::new("capacitor", "Capacitor Charge", Category::Physics)
        .describe("Charge stored on a capacitor: Q = C × V.")
        .variable("Q", "charge", Charge, "µC")
        .variable("C", "capacitance", Capacitance, "µF")
        .variable("V", "voltage", Voltage, "V")
        .solve("Q", "C * V", vec![])
        .solve("C", "Q / V", vec![Constraint::denominator("V")])
        .solve("V", "Q / C", vec![Constraint::denominator("C")])
        .constraint(Constraint::non_negative("C").with_message("capacitance cannot be negative"))
        .derive("U", "stored energy", Energy, "J", "0.5 * C * V^2")
}

fn ohms_law() -> FormulaSpec {
    FormulaSpec::new("ohms-law", "Ohm's Law", Category::Physics)
        .describe("Voltage across a resistor: V = I × R.")
        .variable("V", "voltage", Voltage, "V")
        .variable("I", "current", Current, "A")
        .variable("R", "resistance", Resistance, "Ω")
        .solve("V", "I * R", vec![])
        .solve("I", "V / R", vec![Constraint::denominator("R")])
        .solve("R", "V / I", vec![Constraint::denominator("I")])
        .constraint(Constraint::non_negative("R").with_message("resistance cannot be negative"))
        .derive("P", "power", Power, "W", "V * I")
}

fn hookes_law() -> FormulaSpec {
    FormulaSpec::new("hookes-law", "Hooke's Law", Category::Physics)
        .describe("Spring force: F = k × x.")
        .variable("F", "force", Force, "N")
        .variable("k", "spring constant", Stiffness, "N/m")
        .variable("x", "displacement", Length, "m")
        .solve("F", "k * x", vec![])
        .solve("k", "F / x", vec![Constraint::denominator("x")])
        .solve("x", "F / k", vec![Constraint::denominator("k")])
        .constraint(
            Constraint::non_negative("k").with_message("spring constant cannot be negative"),
        )
        .derive("U", "elastic energy", Energy, "J", "0.5 * k * x^2")
}

fn youngs_modulus() -> FormulaSpec {
    FormulaSpec::new("youngs-modulus", "Young's Modulus", Category::Physics)
        .describe("Stiffness of a material from stress over strain: E = (F × L0) / (A × ΔL).")
        .variable("E", "youngs modulus", Pressure, "GPa")
        .variable("F", "force", Force, "N")
        .variable("L0", "original length", Length, "m")
        .variable("A", "cross-sectional area", Area, "m²")
        .variable("dL", "change in length", Length, "mm")
        .solve(
            "E",
            "F * L0 / (A * dL)",
            vec![
                Constraint::denominator("A"),
                Constraint::denominator("dL"),
            ],
        )
        .solve("F", "E * A * dL / L0", vec![])
        .solve(
            "L0",
            "E * A * dL / F",
            vec![Constraint::denominator("F")],
        )
        .solve(
            "A",
            "F * L0 / (E * dL)",
            vec![
                Constraint::denominator("E"),
                Constraint::denominator("dL"),
            ],
        )
        .solve(
            "dL",
            "F * L0 / (E * A)",
            vec![
                Constraint::denominator("E"),
                Constraint::denominator("A"),
            ],
        )
        .constraint(Constraint::positive("L0").with_message("original length must be positive"))
        .constraint(Constraint::non_negative("A").with_message("area cannot be negative"))
        .constraint(Constraint::non_negative("E").with_message("modulus cannot be negative"))
        .derive("stress", "stress", Pressure, "MPa", "F / A")
        .derive("strain", "strain", Ratio, "", "dL / L0")
}

fn kinetic_energy() -> FormulaSpec {
    FormulaSpec::new("kinetic-energy", "Kinetic Energy", Category::Physics)
        .describe("Energy of a moving mass: KE = ½ m v².")
        .variable("KE", "kinetic energy", Energy, "J")
        .variable("m", "mass", Mass, "kg")
        .variable("v", "velocity", Velocity, "m/s")
        .solve("KE", "0.5 * m * v^2", vec![])
        .solve(
            "m",
            "2.0 * KE / v^2",
            vec![Constraint::denominator("v")],
        )
        .solve(
            "v",
            "sqrt(2.0 * KE / m)",
            vec![Constraint::denominator("m")],
        )
        .constraint(Constraint::non_negative("m").with_message("mass cannot be negative"))
        .constraint(
            Constraint::non_negative("KE").with_message("kinetic energy cannot be negative"),
        )
}

fn photon_energy() -> FormulaSpec {
    FormulaSpec::new("photon-energy", "Photon Energy", Category::Physics)
        .describe("Energy of a photon from its wavelength: E = h c / λ.")
        .variable("E", "photon energy", Energy, "eV")
        .variable("lambda", "wavelength", Length, "nm")
        .solve(
            "E",
            "PLANCK * LIGHT_SPEED / lambda",
            vec![Constraint::denominator("lambda")],
        )
        .solve(
            "lambda",
            "PLANCK * LIGHT_SPEED / E",
            vec![Constraint::denominator("E")],
        )
        .constraint(Constraint::positive("lambda").with_message("wavelength must be positive"))
        .constraint(Constraint::positive("E").with_message("energy must be positive"))
        .derive("f", "frequency", Frequency, "Hz", "LIGHT_SPEED / lambda")
}

fn rydberg() -> FormulaSpec {
    FormulaSpec::new("rydberg", "Rydberg Equation", Category::Physics)
        .describe("Wavelength of a hydrogen transition between levels n1 < n2.")
        .variable("lambda", "wavelength", Length, "nm")
        .variable("n1", "lower level", Count, "")
        .variable("n2", "upper level", Count, "")
        .solve(
            "lambda",
            "1.0 / (R_INF * (1.0 / n1^2 - 1.0 / n2^2))",
            vec![
                Constraint::denominator("n1"),
                Constraint::denominator("n2"),
            ],
        )
        .solve(
            "n1",
            "1.0 / sqrt(1.0 / (R_INF * lambda) + 1.0 / n2^2)",
            vec![
                Constraint::denominator("lambda"),
                Constraint::denominator("n2"),
            ],
        )
        .solve(
            "n2",
            "1.0 / sqrt(1.0 / n1^2 - 1.0 / (R_INF * lambda))",
            vec![
                Constraint::denominator("n1"),
                Constraint::denominator("lambda"),
                Constraint::positive("1.0 / n1^2 - 1.0 / (R_INF * lambda)")
                    .with_message("wavelength is shorter than the series limit of n1"),
            ],
        )
        .constraint(Constraint::positive("n1").with_message("n1 must be positive"))
        .constraint(Constraint::positive("n2").with_message("n2 must be positive"))
        .constraint(Constraint::positive("lambda").with_message("wavelength must be positive"))
        .constraint(
            Constraint::not_equal("n1", "n2").with_message("quantum numbers must differ"),
        )
        .constraint(Constraint::less("n1", "n2").with_message("n1 must be lower than n2"))
        .derive(
            "E",
            "photon energy",
            Energy,
            "eV",
            "PLANCK * LIGHT_SPEED / lambda",
        )
}

fn skin_depth() -> FormulaSpec {
    FormulaSpec::new("skin-depth", "Skin Depth", Category::Physics)
        .describe("Depth at which AC current density falls to 1/e: δ = √(ρ / (π f μ0 μr)).")
        .variable("delta", "skin depth", Length, "mm")
        .variable("rho", "resistivity", Resistivity, "Ω·m")
        .variable("f", "frequency", Frequency, "Hz")
        .variable("mu_r", "relative permeability", Ratio, "")
        .solve(
            "delta",
            "sqrt(rho / (PI * f * MU_0 * mu_r))",
            vec![
                Constraint::denominator("f"),
                Constraint::denominator("mu_r"),
            ],
        )
        .solve("rho", "PI * f * MU_0 * mu_r * delta^2", vec![])
        .solve(
            "f",
            "rho / (PI * MU_0 * mu_r * delta^2)",
            vec![
                Constraint::denominator("mu_r"),
                Constraint::denominator("delta"),
            ],
        )
        .solve(
            "mu_r",
            "rho / (PI * f * MU_0 * delta^2)",
            vec![
                Constraint::denominator("f"),
                Constraint::denominator("delta"),
            ],
        )
        .constraint(Constraint::non_negative("rho").with_message("resistivity cannot be negative"))
        .constraint(Constraint::non_negative("f").with_message("frequency cannot be negative"))
        .constraint(
            Constraint::positive("mu_r").with_message("relative permeability must be positive"),
        )
        .constraint(Constraint::non_negative("delta").with_message("skin depth cannot be negative"))
}

fn radar_horizon() -> FormulaSpec {
    FormulaSpec::new("radar-horizon", "Radar Horizon", Category::Physics)
        .describe("Maximum line-of-sight range between a radar and a target over a 4/3 Earth.")
        .variable("h_r", "radar height", Length, "m")
        .variable("h_t", "target height", Length, "m")
        .variable("d", "radar horizon", Length, "km")
        .solve(
            "d",
            "sqrt(2.0 * K_EFF * EARTH_RADIUS * h_r) + sqrt(2.0 * K_EFF * EARTH_RADIUS * h_t)",
            vec![],
        )
        .solve(
            "h_r",
            "(d - sqrt(2.0 * K_EFF * EARTH_RADIUS * h_t))^2 / (2.0 * K_EFF * EARTH_RADIUS)",
            vec![Constraint::non_negative("d - sqrt(2.0 * K_EFF * EARTH_RADIUS * h_t)")
                .with_message("range is shorter than the target's own horizon")],
        )
        .solve(
            "h_t",
            "(d - sqrt(2.0 * K_EFF * EARTH_RADIUS * h_r))^2 / (2.0 * K_EFF * EARTH_RADIUS)",
            vec![Constraint::non_negative("d - sqrt(2.0 * K_EFF * EARTH_RADIUS * h_r)")
                .with_message("range is shorter than the radar's own horizon")],
        )
        .constraint(Constraint::non_negative("h_r").with_message("radar height cannot be negative"))
        .constraint(
            Constraint::non_negative("h_t").with_message("target height cannot be negative"),
        )
        .constraint(Constraint::non_negative("d").with_message("range cannot be negative"))
        .derive(
            "d_r",
            "radar-only horizon",
            Length,
            "km",
            "sqrt(2.0 * K_EFF * EARTH_RADIUS * h_r)",
        )
}

fn horizon_distance() -> FormulaSpec {
    FormulaSpec::new("horizon-distance", "Distance to Horizon", Category::Physics)
        .describe("Geometric distance to the horizon from an observer height.")
        .variable("h", "observer height", Length, "m")
        .variable("d", "horizon distance", Length, "km")
        .solve("d", "sqrt(2.0 * EARTH_RADIUS * h + h^2)", vec![])
        .solve("h", "sqrt(EARTH_RADIUS^2 + d^2) - EARTH_RADIUS", vec![])
        .constraint(Constraint::non_negative("h").with_message("height cannot be negative"))
        .constraint(Constraint::non_negative("d").with_message("distance cannot be negative"))
        .derive(
            "dip",
            "horizon dip angle",
            Angle,
            "deg",
            "acos(EARTH_RADIUS / (EARTH_RADIUS + h))",
        )
}

fn wind_correction() -> FormulaSpec {
    FormulaSpec::new("wind-correction", "Wind Correction Angle", Category::Physics)
        .describe("Heading correction needed to hold a course in a crosswind.")
        .variable("tas", "true airspeed", Velocity, "kn")
        .variable("crosswind", "crosswind component", Velocity, "kn")
        .variable("wca", "wind correction angle", Angle, "deg")
        .solve(
            "wca",
            "asin(crosswind / tas)",
            vec![
                Constraint::denominator("tas"),
                Constraint::unit_range("crosswind / tas")
                    .with_message("crosswind exceeds true airspeed"),
            ],
        )
        .solve("crosswind", "tas * sin(wca)", vec![])
        .solve(
            "tas",
            "crosswind / sin(wca)",
            vec![Constraint::denominator("sin(wca)")
                .with_message("a correction angle of 0° or 180° has no crosswind component")],
        )
        .constraint(Constraint::positive("tas").with_message("true airspeed must be positive"))
        .constraint(
            Constraint::at_most("abs(wca)", "PI / 2.0")
                .with_message("correction angle must lie within ±90°"),
        )
        .derive(
            "effective",
            "effective airspeed",
            Velocity,
            "kn",
            "tas * cos(wca)",
        )
}

fn snells_law() -> FormulaSpec {
    FormulaSpec::new("snells-law", "Snell's Law", Category::Physics)
        .describe("Refraction at an interface: n1 sin θ1 = n2 sin θ2.")
        .variable("n1", "first refractive index", Ratio, "")
        .variable("theta1", "angle of incidence", Angle, "deg")
        .variable("n2", "second refractive index", Ratio, "")
        .variable("theta2", "angle of refraction", Angle, "deg")
        .solve(
            "theta2",
            "asin(n1 * sin(theta1) / n2)",
            vec![
                Constraint::denominator("n2"),
                Constraint::unit_range("n1 * sin(theta1) / n2")
                    .with_message("total internal reflection: no refracted ray"),
            ],
        )
        .solve(
            "theta1",
            "asin(n2 * sin(theta2) / n1)",
            vec![
                Constraint::denominator("n1"),
                Constraint::unit_range("n2 * sin(theta2) / n1")
                    .with_message("no incidence angle produces this refraction"),
            ],
        )
        .solve(
            "n1",
            "n2 * sin(theta2) / sin(theta1)",
            vec![Constraint::denominator("sin(theta1)")
                .with_message("incident angle cannot be 0° or 180°")],
        )
        .solve(
            "n2",
            "n1 * sin(theta1) / sin(theta2)",
            vec![Constraint::denominator("sin(theta2)")
                .with_message("refracted angle cannot be 0° or 180°")],
        )
        .constraint(Constraint::positive("n1").with_message("refractive index must be positive"))
        .constraint(Constraint::positive("n2").with_message("refractive index must be positive"))
        .constraint(
            Constraint::non_negative("theta1").with_message("angles must lie between 0° and 90°"),
        )
        .constraint(
            Constraint::at_most("theta1", "PI / 2.0")
                .with_message("angles must lie between 0° and 90°"),
        )
        .constraint(
            Constraint::non_negative("theta2").with_message("angles must lie between 0° and 90°"),
        )
        .constraint(
            Constraint::at_most("theta2", "PI / 2.0")
                .with_message("angles must lie between 0° and 90°"),
        )
}

fn work() -> FormulaSpec {
    FormulaSpec::new("work", "Work", Category::Physics)
        .describe("Work done by a constant force over a displacement: W = F d cos θ.")
        .variable("W", "work", Energy, "J")
        .variable("F", "force", Force, "N")
        .variable("d", "distance", Length, "m")
        .variable("theta", "angle between force and motion", Angle, "deg")
        .solve("W", "F * d * cos(theta)", vec![])
        .solve(
            "F",
            "W / (d * cos(theta))",
            vec![
                Constraint::denominator("d"),
                Constraint::denominator("cos(theta)")
                    .with_message("a force perpendicular to the motion does no work"),
            ],
        )
        .solve(
            "d",
            "W / (F * cos(theta))",
            vec![
                Constraint::denominator("F"),
                Constraint::denominator("cos(theta)")
                    .with_message("a force perpendicular to the motion does no work"),
            ],
        )
        .solve(
            "theta",
            "acos(W / (F * d))",
            vec![
                Constraint::denominator("F"),
                Constraint::denominator("d"),
                Constraint::unit_range("W / (F * d)")
                    .with_message("work exceeds force times distance"),
            ],
        )
        .constraint(Constraint::non_negative("F").with_message("force cannot be negative"))
        .constraint(Constraint::non_negative("d").with_message("distance cannot be negative"))
        .constraint(
            Constraint::non_negative("theta").with_message("angle must lie between 0° and 180°"),
        )
        .constraint(
            Constraint::at_most("theta", "PI").with_message("angle must lie between 0° and 180°"),
        )
}

fn momentum() -> FormulaSpec {
    FormulaSpec::new("momentum", "Momentum", Category::Physics)
        .describe("Linear momentum of a moving mass: p = m v.")
        .variable("p", "momentum", Momentum, "kg·m/s")
        .variable("m", "mass", Mass, "kg")
        .variable("v", "velocity", Velocity, "m/s")
        .solve("p", "m * v", vec![])
        .solve("m", "p / v", vec![Constraint::denominator("v")])
        .solve("v", "p / m", vec![Constraint::denominator("m")])
        .constraint(Constraint::positive("m").with_message("mass must be positive"))
        .derive("KE", "kinetic energy", Energy, "J", "0.5 * m * v^2")
}

fn density_mass_volume() -> FormulaSpec {
    FormulaSpec::new("density-mass-volume", "Density, Mass and Volume", Category::Physics)
        .describe("Density of a material: ρ = m / V.")
        .variable("rho", "density", Density, "kg/m³")
        .variable("m", "mass", Mass, "kg")
        .variable("V", "volume", Volume, "m³")
        .solve("rho", "m / V", vec![Constraint::denominator("V")])
        .solve("m", "rho * V", vec![])
        .solve(
            "V",
            "m / rho",
            vec![Constraint::denominator("rho").with_message("density cannot be zero")],
        )
        .constraint(Constraint::positive("rho").with_message("density must be positive"))
        .constraint(Constraint::positive("m").with_message("mass must be positive"))
        .constraint(Constraint::positive("V").with_message("volume must be positive"))
}

fn wavelength_to_frequency() -> FormulaSpec {
    FormulaSpec::new(
        "wavelength-to-frequency",
        "Wavelength to Frequency",
        Category::Physics,
    )
    .describe("Frequency of a wave from its wavelength and speed: f = v / λ.")
    .variable("f", "frequency", Frequency, "Hz")
    .variable("lambda", "wavelength", Length, "m")
    .variable("v", "wave speed", Velocity, "c")
    .solve(
        "f",
        "v / lambda",
        vec![Constraint::denominator("lambda").with_message("wavelength cannot be zero")],
    )
    .solve(
        "lambda",
        "v / f",
        vec![Constraint::denominator("f").with_message("frequency cannot be zero")],
    )
    .solve("v", "f * lambda", vec![])
    .constraint(Constraint::positive("f").with_message("frequency must be positive"))
    .constraint(Constraint::positive("lambda").with_message("wavelength must be positive"))
    .constraint(Constraint::positive("v").with_message("wave speed must be positive"))
    .derive("T", "period", Time, "s", "lambda / v")
}
