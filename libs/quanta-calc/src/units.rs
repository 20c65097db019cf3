//! Unit tables
//!
//! One static table per physical dimension, mapping unit symbols to a
//! multiplicative factor into the dimension's base unit. Temperature scales
//! also carry an offset: `base = value × factor + offset`. Tables are plain
//! `'static` slices: built at compile time, shared by every evaluation,
//! never mutated.
//!
//! ```rust
//! use quanta_calc::units::Dimension;
//!
//! let charge = Dimension::Charge.table();
//! assert_eq!(charge.base().symbol, "C");
//! assert!((charge.to_base(25.0, "µC").unwrap() - 25e-6).abs() < 1e-18);
//! ```

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};

/// A unit symbol and its conversion into the base unit of its table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub symbol: &'static str,
    pub name: &'static str,
    pub factor: f64,
    /// Added after scaling; zero except for temperature scales
    pub offset: f64,
    /// Alternative spellings resolving to this entry (ASCII forms, the
    /// other micro sign, etc.)
    pub aliases: &'static [&'static str],
}

impl UnitDef {
    fn matches(&self, unit: &str) -> bool {
        self.symbol == unit || self.aliases.contains(&unit)
    }

    pub fn to_base(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    pub fn from_base(&self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }

    /// The unit the table stores values in.
    pub fn is_base(&self) -> bool {
        self.factor == 1.0 && self.offset == 0.0
    }
}

const fn unit(symbol: &'static str, name: &'static str, factor: f64) -> UnitDef {
    UnitDef {
        symbol,
        name,
        factor,
        offset: 0.0,
        aliases: &[],
    }
}

const fn alias(
    symbol: &'static str,
    name: &'static str,
    factor: f64,
    aliases: &'static [&'static str],
) -> UnitDef {
    UnitDef {
        symbol,
        name,
        factor,
        offset: 0.0,
        aliases,
    }
}

const fn scale(
    symbol: &'static str,
    name: &'static str,
    factor: f64,
    offset: f64,
    aliases: &'static [&'static str],
) -> UnitDef {
    UnitDef {
        symbol,
        name,
        factor,
        offset,
        aliases,
    }
}

// 1 BTU (IT) = 1055.05585262 J
const BTU: f64 = 1055.055_852_62;
const ELECTRON_VOLT: f64 = 1.602_176_634e-19;
const POUND_FORCE: f64 = 4.448_221_615_260_5;
const POUND: f64 = 0.453_592_37;
const FOOT: f64 = 0.3048;
const INCH: f64 = 0.0254;
const US_GALLON: f64 = 3.785_411_784e-3;
const ATMOSPHERE: f64 = 101_325.0;
const YEAR_SECONDS: f64 = 31_557_600.0;

static LENGTH: &[UnitDef] = &[
    alias("m", "meters", 1.0, &["meter", "meters"]),
    unit("km", "kilometers", 1e3),
    unit("cm", "centimeters", 1e-2),
    unit("mm", "millimeters", 1e-3),
    alias("µm", "micrometers", 1e-6, &["μm", "um"]),
    unit("nm", "nanometers", 1e-9),
    alias("Å", "angstroms", 1e-10, &["angstrom"]),
    unit("in", "inches", INCH),
    unit("ft", "feet", FOOT),
    unit("yd", "yards", 0.9144),
    unit("mi", "miles", 1609.344),
    unit("nmi", "nautical miles", 1852.0),
];

static AREA: &[UnitDef] = &[
    alias("m²", "square meters", 1.0, &["m2", "m^2"]),
    alias("cm²", "square centimeters", 1e-4, &["cm2", "cm^2"]),
    alias("mm²", "square millimeters", 1e-6, &["mm2", "mm^2"]),
    alias("in²", "square inches", 6.4516e-4, &["in2", "in^2"]),
    alias("ft²", "square feet", 0.092_903_04, &["ft2", "ft^2"]),
];

static MASS: &[UnitDef] = &[
    unit("kg", "kilograms", 1.0),
    unit("g", "grams", 1e-3),
    unit("mg", "milligrams", 1e-6),
    unit("t", "metric tons", 1e3),
    alias("lb", "pounds", POUND, &["lbs"]),
    unit("oz", "ounces", 0.028_349_523_125),
];

static FORCE: &[UnitDef] = &[
    unit("N", "newtons", 1.0),
    unit("kN", "kilonewtons", 1e3),
    unit("mN", "millinewtons", 1e-3),
    unit("lbf", "pounds-force", POUND_FORCE),
    unit("dyn", "dynes", 1e-5),
];

static PRESSURE: &[UnitDef] = &[
    unit("Pa", "pascals", 1.0),
    unit("kPa", "kilopascals", 1e3),
    unit("MPa", "megapascals", 1e6),
    unit("GPa", "gigapascals", 1e9),
    unit("bar", "bar", 1e5),
    unit("atm", "standard atmospheres", ATMOSPHERE),
    alias("Torr", "torr", ATMOSPHERE / 760.0, &["torr"]),
    unit("mmHg", "millimeters of mercury", 133.322_387_415),
    unit("psi", "pounds per square inch", 6_894.757_293_168),
];

static STIFFNESS: &[UnitDef] = &[
    unit("N/m", "newtons per meter", 1.0),
    unit("N/cm", "newtons per centimeter", 1e2),
    unit("N/mm", "newtons per millimeter", 1e3),
    unit("kN/m", "kilonewtons per meter", 1e3),
    unit("lbf/in", "pounds-force per inch", POUND_FORCE / 0.0254),
];

static ENERGY: &[UnitDef] = &[
    unit("J", "joules", 1.0),
    unit("kJ", "kilojoules", 1e3),
    unit("MJ", "megajoules", 1e6),
    unit("mJ", "millijoules", 1e-3),
    unit("eV", "electronvolts", ELECTRON_VOLT),
    unit("keV", "kiloelectronvolts", ELECTRON_VOLT * 1e3),
    unit("MeV", "megaelectronvolts", ELECTRON_VOLT * 1e6),
    unit("cal", "calories", 4.184),
    unit("kcal", "kilocalories", 4184.0),
    unit("Wh", "watt-hours", 3600.0),
    unit("kWh", "kilowatt-hours", 3.6e6),
    unit("MWh", "megawatt-hours", 3.6e9),
    unit("BTU", "british thermal units", BTU),
];

static POWER: &[UnitDef] = &[
    unit("W", "watts", 1.0),
    unit("kW", "kilowatts", 1e3),
    unit("MW", "megawatts", 1e6),
    unit("mW", "milliwatts", 1e-3),
    unit("hp", "horsepower", 745.699_871_582_27),
    alias("BTU/h", "BTU per hour", BTU / 3600.0, &["BTU/hr"]),
    alias("TR", "tons of refrigeration", 12_000.0 * BTU / 3600.0, &["ton"]),
];

static CHARGE: &[UnitDef] = &[
    unit("C", "coulombs", 1.0),
    unit("mC", "millicoulombs", 1e-3),
    alias("µC", "microcoulombs", 1e-6, &["μC", "uC"]),
    unit("nC", "nanocoulombs", 1e-9),
    unit("pC", "picocoulombs", 1e-12),
];

static VOLTAGE: &[UnitDef] = &[
    unit("V", "volts", 1.0),
    unit("mV", "millivolts", 1e-3),
    alias("µV", "microvolts", 1e-6, &["μV", "uV"]),
    unit("kV", "kilovolts", 1e3),
];

static CURRENT: &[UnitDef] = &[
    unit("A", "amperes", 1.0),
    unit("mA", "milliamperes", 1e-3),
    alias("µA", "microamperes", 1e-6, &["μA", "uA"]),
    unit("nA", "nanoamperes", 1e-9),
    unit("kA", "kiloamperes", 1e3),
];

static CAPACITANCE: &[UnitDef] = &[
    unit("F", "farads", 1.0),
    unit("mF", "millifarads", 1e-3),
    alias("µF", "microfarads", 1e-6, &["μF", "uF"]),
    unit("nF", "nanofarads", 1e-9),
    unit("pF", "picofarads", 1e-12),
];

static RESISTANCE: &[UnitDef] = &[
    alias("Ω", "ohms", 1.0, &["ohm", "ohms"]),
    alias("mΩ", "milliohms", 1e-3, &["mohm"]),
    alias("kΩ", "kiloohms", 1e3, &["kohm"]),
    alias("MΩ", "megaohms", 1e6, &["Mohm"]),
];

static RESISTIVITY: &[UnitDef] = &[
    alias("Ω·m", "ohm-meters", 1.0, &["ohm*m", "ohm-m"]),
    alias("Ω·cm", "ohm-centimeters", 1e-2, &["ohm*cm", "ohm-cm"]),
    alias("µΩ·cm", "microohm-centimeters", 1e-8, &["μΩ·cm", "uohm*cm", "uohm-cm"]),
    alias("nΩ·m", "nanoohm-meters", 1e-9, &["nohm*m", "nohm-m"]),
];

static FREQUENCY: &[UnitDef] = &[
    unit("Hz", "hertz", 1.0),
    unit("kHz", "kilohertz", 1e3),
    unit("MHz", "megahertz", 1e6),
    unit("GHz", "gigahertz", 1e9),
    unit("THz", "terahertz", 1e12),
];

static VELOCITY: &[UnitDef] = &[
    unit("m/s", "meters per second", 1.0),
    alias("km/h", "kilometers per hour", 1.0 / 3.6, &["kph"]),
    unit("mph", "miles per hour", 0.447_04),
    alias("kn", "knots", 1852.0 / 3600.0, &["kt", "kts"]),
    unit("ft/s", "feet per second", FOOT),
    unit("km/s", "kilometers per second", 1e3),
    unit("c", "speed of light", 299_792_458.0),
];

static ANGLE: &[UnitDef] = &[
    unit("rad", "radians", 1.0),
    alias("deg", "degrees", std::f64::consts::PI / 180.0, &["°"]),
];

static TIME: &[UnitDef] = &[
    unit("s", "seconds", 1.0),
    unit("min", "minutes", 60.0),
    unit("h", "hours", 3600.0),
    unit("d", "days", 86_400.0),
    alias("wk", "weeks", 604_800.0, &["week", "weeks"]),
    alias("mo", "months", YEAR_SECONDS / 12.0, &["month", "months"]),
    alias("yr", "years", YEAR_SECONDS, &["year", "years", "y"]),
];

static VOLUME: &[UnitDef] = &[
    alias("m³", "cubic meters", 1.0, &["m3", "m^3"]),
    alias("L", "liters", 1e-3, &["l", "liter", "liters"]),
    alias("mL", "milliliters", 1e-6, &["ml"]),
    alias("cm³", "cubic centimeters", 1e-6, &["cm3", "cm^3", "cc"]),
    alias("ft³", "cubic feet", FOOT * FOOT * FOOT, &["ft3", "ft^3"]),
    alias("in³", "cubic inches", INCH * INCH * INCH, &["in3", "in^3"]),
    unit("gal", "US gallons", US_GALLON),
    unit("qt", "US quarts", US_GALLON / 4.0),
    unit("pt", "US pints", US_GALLON / 8.0),
    alias("fl oz", "US fluid ounces", US_GALLON / 128.0, &["floz"]),
];

static TEMPERATURE: &[UnitDef] = &[
    alias("K", "kelvin", 1.0, &["kelvin"]),
    scale("°C", "degrees Celsius", 1.0, 273.15, &["degC", "celsius"]),
    scale("°F", "degrees Fahrenheit", 5.0 / 9.0, 459.67 * 5.0 / 9.0, &["degF", "fahrenheit"]),
    scale("°R", "degrees Rankine", 5.0 / 9.0, 0.0, &["degR", "rankine"]),
];

static INDUCTANCE: &[UnitDef] = &[
    unit("H", "henries", 1.0),
    unit("mH", "millihenries", 1e-3),
    alias("µH", "microhenries", 1e-6, &["μH", "uH"]),
    unit("nH", "nanohenries", 1e-9),
];

static MOMENTUM: &[UnitDef] = &[
    alias("kg·m/s", "kilogram meters per second", 1.0, &["kg*m/s", "kgm/s", "N·s", "N*s"]),
    alias("g·cm/s", "gram centimeters per second", 1e-5, &["g*cm/s"]),
    alias("lb·ft/s", "pound feet per second", POUND * FOOT, &["lb*ft/s"]),
];

static DENSITY: &[UnitDef] = &[
    alias("kg/m³", "kilograms per cubic meter", 1.0, &["kg/m3", "kg/m^3", "g/L"]),
    alias("g/cm³", "grams per cubic centimeter", 1e3, &["g/cm3", "g/mL", "kg/L"]),
    alias("lb/ft³", "pounds per cubic foot", POUND / (FOOT * FOOT * FOOT), &["lb/ft3"]),
    alias("lb/in³", "pounds per cubic inch", POUND / (INCH * INCH * INCH), &["lb/in3"]),
];

static CURRENCY: &[UnitDef] = &[alias("$", "dollars", 1.0, &["USD", "usd"])];

static COUNT: &[UnitDef] = &[
    alias("", "count", 1.0, &["1", "count"]),
    unit("k", "thousands", 1e3),
    unit("M", "millions", 1e6),
];

static RATIO: &[UnitDef] = &[
    alias("", "ratio", 1.0, &["1", "x"]),
    alias("%", "percent", 1e-2, &["pct"]),
];

/// Physical dimension of a quantity; selects the unit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Length,
    Area,
    Volume,
    Mass,
    Density,
    Momentum,
    Force,
    Pressure,
    Stiffness,
    Energy,
    Power,
    Temperature,
    Charge,
    Voltage,
    Current,
    Capacitance,
    Inductance,
    Resistance,
    Resistivity,
    Frequency,
    Velocity,
    Angle,
    Time,
    Currency,
    Count,
    Ratio,
}

impl Dimension {
    pub const ALL: [Dimension; 26] = [
        Dimension::Length,
        Dimension::Area,
        Dimension::Volume,
        Dimension::Mass,
        Dimension::Density,
        Dimension::Momentum,
        Dimension::Force,
        Dimension::Pressure,
        Dimension::Stiffness,
        Dimension::Energy,
        Dimension::Power,
        Dimension::Temperature,
        Dimension::Charge,
        Dimension::Voltage,
        Dimension::Current,
        Dimension::Capacitance,
        Dimension::Inductance,
        Dimension::Resistance,
        Dimension::Resistivity,
        Dimension::Frequency,
        Dimension::Velocity,
        Dimension::Angle,
        Dimension::Time,
        Dimension::Currency,
        Dimension::Count,
        Dimension::Ratio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Area => "area",
            Self::Volume => "volume",
            Self::Mass => "mass",
            Self::Density => "density",
            Self::Momentum => "momentum",
            Self::Force => "force",
            Self::Pressure => "pressure",
            Self::Stiffness => "stiffness",
            Self::Energy => "energy",
            Self::Power => "power",
            Self::Temperature => "temperature",
            Self::Charge => "charge",
            Self::Voltage => "voltage",
            Self::Current => "current",
            Self::Capacitance => "capacitance",
            Self::Inductance => "inductance",
            Self::Resistance => "resistance",
            Self::Resistivity => "resistivity",
            Self::Frequency => "frequency",
            Self::Velocity => "velocity",
            Self::Angle => "angle",
            Self::Time => "time",
            Self::Currency => "currency",
            Self::Count => "count",
            Self::Ratio => "ratio",
        }
    }

    pub fn table(&self) -> UnitTable {
        let units = match self {
            Self::Length => LENGTH,
            Self::Area => AREA,
            Self::Volume => VOLUME,
            Self::Mass => MASS,
            Self::Density => DENSITY,
            Self::Momentum => MOMENTUM,
            Self::Force => FORCE,
            Self::Pressure => PRESSURE,
            Self::Stiffness => STIFFNESS,
            Self::Energy => ENERGY,
            Self::Power => POWER,
            Self::Temperature => TEMPERATURE,
            Self::Charge => CHARGE,
            Self::Voltage => VOLTAGE,
            Self::Current => CURRENT,
            Self::Capacitance => CAPACITANCE,
            Self::Inductance => INDUCTANCE,
            Self::Resistance => RESISTANCE,
            Self::Resistivity => RESISTIVITY,
            Self::Frequency => FREQUENCY,
            Self::Velocity => VELOCITY,
            Self::Angle => ANGLE,
            Self::Time => TIME,
            Self::Currency => CURRENCY,
            Self::Count => COUNT,
            Self::Ratio => RATIO,
        };
        UnitTable {
            dimension: *self,
            units,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == needle)
            .ok_or_else(|| format!("Unknown dimension: '{}'", s))
    }
}

/// Unit table of a single dimension.
#[derive(Debug, Clone, Copy)]
pub struct UnitTable {
    pub dimension: Dimension,
    pub units: &'static [UnitDef],
}

impl UnitTable {
    /// The unit with factor 1 and no offset.
    pub fn base(&self) -> &'static UnitDef {
        // Every table starts with its base unit; the invariant is covered by tests.
        &self.units[0]
    }

    pub fn lookup(&self, unit: &str) -> Result<&'static UnitDef> {
        let unit = unit.trim();
        self.units
            .iter()
            .find(|u| u.matches(unit))
            .ok_or_else(|| CalcError::unknown_unit(self.dimension.as_str(), unit))
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.lookup(unit).is_ok()
    }

    /// Canonical symbol for a unit spelling (resolves aliases).
    pub fn canonical(&self, unit: &str) -> Result<&'static str> {
        self.lookup(unit).map(|u| u.symbol)
    }

    pub fn to_base(&self, value: f64, unit: &str) -> Result<f64> {
        Ok(self.lookup(unit)?.to_base(value))
    }

    pub fn from_base(&self, value: f64, unit: &str) -> Result<f64> {
        Ok(self.lookup(unit)?.from_base(value))
    }
}

/// Convert between two units of the same dimension.
///
/// The dimension is the first one (in [`Dimension::ALL`] order) whose table
/// knows both symbols. Returns the converted value and that dimension.
pub fn convert(value: f64, from: &str, to: &str) -> Result<(f64, Dimension)> {
    let dimension = Dimension::ALL
        .into_iter()
        .find(|d| {
            let table = d.table();
            table.contains(from) && table.contains(to)
        })
        .ok_or_else(|| {
            let known = Dimension::ALL
                .into_iter()
                .find(|d| d.table().contains(from));
            match known {
                Some(d) => CalcError::unknown_unit(d.as_str(), to.trim()),
                None => CalcError::unknown_unit("any", from.trim()),
            }
        })?;

    let table = dimension.table();
    let base = table.to_base(value, from)?;
    Ok((table.from_base(base, to)?, dimension))
}
