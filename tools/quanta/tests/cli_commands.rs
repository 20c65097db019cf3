#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use quanta_calc::{Category, Dimension, ErrorKind};
use quanta_cli::{OutputFormat, Session};
use quanta_common::QuantaConfig;
use quanta_errors::QuantaError;
use std::fs;
use tempfile::TempDir;

fn session() -> Session {
    colored::control::set_override(false);
    Session::new(QuantaConfig::default()).unwrap()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_list_groups_by_category() {
    let text = session().list(None);
    let finance = text.find("FINANCE").unwrap();
    let physics = text.find("PHYSICS").unwrap();
    let math = text.find("MATH").unwrap();
    assert!(finance < physics && physics < math);
    assert!(text.contains("pay-raise"));
    assert!(!text.contains("CUSTOM"));

    let only_math = session().list(Some(Category::Math));
    assert!(only_math.contains("pythagorean"));
    assert!(!only_math.contains("cpm"));
}

#[test]
fn test_show_lists_every_branch() {
    let text = session().show("ohms-law-calculator").unwrap();
    assert!(text.starts_with("Ohm's Law (ohms-law) [physics]"), "{text}");
    assert!(text.contains("Variables:"));
    assert!(text.contains("Solve:"));
    for symbol in ["V", "I", "R"] {
        assert!(text.contains(&format!("\n  {} = ", symbol)), "{symbol}: {text}");
    }
}

#[test]
fn test_show_unknown_formula() {
    let err = session().show("flux-capacitor").unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.error_code(), "UNKNOWN_FORMULA");
}

#[test]
fn test_eval_text() {
    let text = session()
        .eval(
            "capacitor",
            "Q",
            None,
            &args(&["C=10:µF", "V=5"]),
            OutputFormat::Text,
        )
        .unwrap();
    assert!(text.starts_with("Q = 50 µC\n"), "{text}");
    assert!(text.contains("Steps:"));
}

#[test]
fn test_eval_with_unit_and_json() {
    let json = session()
        .eval(
            "cpm",
            "cpm",
            Some("$"),
            &args(&["spend=3500", "impressions=250:k"]),
            OutputFormat::Json,
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["display"], "14");
    assert_eq!(value["unit"], "$");
}

#[test]
fn test_eval_missing_input() {
    let err = session()
        .eval("cpm", "cpm", None, &args(&["spend=3500"]), OutputFormat::Text)
        .unwrap_err();
    match &err {
        QuantaError::Calculation(e) => assert_eq!(e.kind(), ErrorKind::MissingInput),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_error_info().field_errors["impressions"], vec!["required".to_string()]);
}

#[test]
fn test_eval_duplicate_input_is_reported() {
    let err = session()
        .eval(
            "ohms-law",
            "V",
            None,
            &args(&["I=2", "R=5", "R=6"]),
            OutputFormat::Text,
        )
        .unwrap_err();
    let info = err.to_error_info();
    assert_eq!(info.kind, "MISSING_INPUT");
    assert!(info.field_errors.contains_key("R"));
}

#[test]
fn test_eval_division_by_zero() {
    let err = session()
        .eval(
            "capacitor",
            "V",
            None,
            &args(&["Q=5:µC", "C=0:µF"]),
            OutputFormat::Json,
        )
        .unwrap_err();
    assert_eq!(err.error_code(), "DIVISION_BY_ZERO");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_convert() {
    let text = session().convert(12000.0, "BTU/h", "TR").unwrap();
    assert_eq!(text, "12000 BTU/h = 1 TR  (power)\n");

    let err = session().convert(1.0, "m", "kg").unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_UNIT");
}

#[test]
fn test_units_single_dimension() {
    let text = session().units(Some(Dimension::Pressure));
    assert!(text.starts_with("pressure (base: Pa)\n"), "{text}");
    assert!(text.contains("GPa"));
    assert!(!text.contains("length"));
}

#[test]
fn test_units_show_temperature_offsets() {
    let text = session().units(Some(Dimension::Temperature));
    assert!(text.starts_with("temperature (base: K)\n"), "{text}");
    assert!(text.contains("1 + 273.15"), "{text}");
}

#[test]
fn test_convert_temperature() {
    let text = session().convert(100.0, "°C", "°F").unwrap();
    assert_eq!(text, "100 °C = 212 °F  (temperature)\n");
}

#[test]
fn test_units_all_dimensions() {
    let text = session().units(None);
    for dim in Dimension::ALL {
        assert!(text.contains(&format!("{} (base: ", dim)), "{dim}");
    }
}

#[test]
fn test_format_is_idempotent() {
    let session = session();
    let first = session.format(&args(&["0.000123456", "1234567", "-0", "abc", "3.14159265"]));
    assert_eq!(first, "1.2346e-4\n1.2346e6\n0\nInvalid\n3.1416\n");

    let again: Vec<String> = first.lines().map(str::to_string).collect();
    let second = session.format(&again);
    assert_eq!(second, first);
}

#[test]
fn test_configured_formatting_and_formulas() {
    colored::control::set_override(false);
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("quanta.toml"),
        r#"
[format]
decimals = 2

[[formulas]]
name = "density"
title = "Density"
variables = [
    { symbol = "rho", name = "density", dimension = "ratio" },
    { symbol = "m", name = "mass", dimension = "mass", unit = "kg" },
    { symbol = "n", name = "parts", dimension = "count" },
]

[formulas.solve.rho]
expression = "m / n"
constraints = [{ rule = "denominator", expr = "n" }]

[formulas.solve.m]
expression = "rho * n"

[formulas.solve.n]
expression = "m / rho"
constraints = [{ rule = "denominator", expr = "rho" }]
"#,
    )
    .unwrap();

    let config = QuantaConfig::load(Some(dir.path()), None).unwrap();
    let session = Session::new(config).unwrap();
    assert!(session.list(Some(Category::Custom)).contains("density"));

    let text = session
        .eval("density", "rho", None, &args(&["m=10", "n=3"]), OutputFormat::Text)
        .unwrap();
    assert!(text.starts_with("rho = 3.33\n"), "{text}");
}

#[test]
fn test_dump_config_round_trips() {
    let session = session();
    let yaml = session.dump_config(OutputFormat::Text).unwrap();
    let parsed: QuantaConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(&parsed, session.config());
}
