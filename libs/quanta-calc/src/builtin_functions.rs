//! Built-in functions and constants for formula expressions
//!
//! All functions are pure and stateless. The inverse trigonometric functions
//! clamp their argument into [-1, 1] first so that ratios which drift a few
//! ulps past the boundary (a crosswind equal to the airspeed, a grazing ray)
//! evaluate instead of producing NaN. Ratios that are genuinely out of range
//! are rejected earlier by `unit_range` constraints.
//!
//! `sin`, `cos` and `tan` return exact zero within [`TRIG_ZERO`] of zero, so
//! angles entered in degrees land on the zeros of the functions (`sin(180°)`,
//! `cos(90°)`) and trip exact denominator checks.

use tracing::trace;

/// Rydberg constant for infinite nuclear mass (1/m)
pub const R_INF: f64 = 1.097_373_156_816_0e7;
/// Vacuum magnetic permeability (H/m)
pub const MU_0: f64 = 1.256_637_062_12e-6;
/// Planck constant (J·s)
pub const PLANCK: f64 = 6.626_070_15e-34;
/// Speed of light in vacuum (m/s)
pub const LIGHT_SPEED: f64 = 299_792_458.0;
/// Mean Earth radius (m)
pub const EARTH_RADIUS: f64 = 6_371_000.0;
/// Effective Earth radius factor for standard atmospheric refraction
pub const K_EFF: f64 = 4.0 / 3.0;
/// Julian year (s)
pub const YEAR: f64 = 31_557_600.0;
/// One hour (s)
pub const HOUR: f64 = 3600.0;
/// One BTU per hour in watts
pub const BTU_PER_HOUR: f64 = 1055.055_852_62 / 3600.0;

/// Named constants available to every expression
pub const CONSTANTS: &[(&str, f64)] = &[
    ("PI", std::f64::consts::PI),
    ("R_INF", R_INF),
    ("MU_0", MU_0),
    ("PLANCK", PLANCK),
    ("LIGHT_SPEED", LIGHT_SPEED),
    ("EARTH_RADIUS", EARTH_RADIUS),
    ("K_EFF", K_EFF),
    ("YEAR", YEAR),
    ("HOUR", HOUR),
    ("BTU_PER_HOUR", BTU_PER_HOUR),
];

/// Trigonometric results this close to zero are reported as zero
pub const TRIG_ZERO: f64 = 1e-15;

/// Names of the functions registered with the expression engine
pub const FUNCTIONS: &[&str] = &[
    "sqrt", "ln", "exp", "sin", "cos", "tan", "asin", "acos", "atan", "abs", "min", "max",
    "clamp",
];

pub fn is_constant(name: &str) -> bool {
    CONSTANTS.iter().any(|(n, _)| *n == name)
}

pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// Clamp value to range [min, max]
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

/// Absolute value
#[inline]
pub fn abs(value: f64) -> f64 {
    value.abs()
}

/// Minimum of two values
#[inline]
pub fn min(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// Maximum of two values
#[inline]
pub fn max(a: f64, b: f64) -> f64 {
    a.max(b)
}

pub fn sin(value: f64) -> f64 {
    snap_zero(value.sin())
}

pub fn cos(value: f64) -> f64 {
    snap_zero(value.cos())
}

pub fn tan(value: f64) -> f64 {
    snap_zero(value.tan())
}

fn snap_zero(value: f64) -> f64 {
    if value.abs() < TRIG_ZERO {
        0.0
    } else {
        value
    }
}

/// Arcsine with the argument clamped to [-1, 1]
pub fn asin(value: f64) -> f64 {
    clamped_unit(value).asin()
}

/// Arccosine with the argument clamped to [-1, 1]
pub fn acos(value: f64) -> f64 {
    clamped_unit(value).acos()
}

fn clamped_unit(value: f64) -> f64 {
    let clamped = clamp(value, -1.0, 1.0);
    if clamped != value {
        trace!(value, clamped, "inverse trig argument clamped");
    }
    clamped
}
