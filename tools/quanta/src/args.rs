//! Parsing of `NAME=VALUE[:UNIT]` arguments

use quanta_calc::Quantity;
use quanta_errors::{argument_error, QuantaResult};

/// Parse one known value, e.g. `C=10:µF`, `spend=3500` or `rate=3.5:%`.
///
/// A missing unit stays empty and the evaluator falls back to the
/// variable's default unit.
pub fn parse_known(arg: &str) -> QuantaResult<(String, Quantity)> {
    let (name, rest) = arg
        .split_once('=')
        .ok_or_else(|| argument_error!(arg, "expected NAME=VALUE[:UNIT]"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(argument_error!(arg, "variable name is empty"));
    }

    let (value, unit) = rest.split_once(':').unwrap_or((rest, ""));
    let quantity = Quantity::parse(name, value, unit)?;
    Ok((name.to_string(), quantity))
}

pub fn parse_knowns<S: AsRef<str>>(args: &[S]) -> QuantaResult<Vec<(String, Quantity)>> {
    args.iter().map(|arg| parse_known(arg.as_ref())).collect()
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use quanta_calc::ErrorKind;
    use quanta_errors::QuantaError;

    #[test]
    fn test_value_with_unit() {
        let (name, q) = parse_known("C=10:µF").unwrap();
        assert_eq!(name, "C");
        assert_eq!(q, Quantity::new(10.0, "µF"));
    }

    #[test]
    fn test_value_without_unit() {
        let (name, q) = parse_known(" impressions = 250000").unwrap();
        assert_eq!(name, "impressions");
        assert_eq!(q, Quantity::new(250_000.0, ""));
    }

    #[test]
    fn test_negative_and_exponent() {
        let (_, q) = parse_known("f=-1e3:Hz").unwrap();
        assert_eq!(q, Quantity::new(-1000.0, "Hz"));
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_known("spend3500").unwrap_err();
        assert!(matches!(err, QuantaError::InvalidArgument { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_empty_name() {
        assert!(matches!(
            parse_known("=5").unwrap_err(),
            QuantaError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_empty_value_is_missing_input() {
        match parse_known("V=").unwrap_err() {
            QuantaError::Calculation(e) => {
                assert_eq!(e.kind(), ErrorKind::MissingInput);
                assert_eq!(e.variables(), vec!["V".to_string()]);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_value_names_the_variable() {
        let err = parse_known("R=abc:Ω").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for R: 'abc' is not a number");
    }

    #[test]
    fn test_parse_knowns_stops_at_first_error() {
        let ok = parse_knowns(&["a=1", "b=2:m"]).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(parse_knowns(&["a=1", "b"]).is_err());
    }
}
