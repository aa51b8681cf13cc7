//! Leaf conversions from the raw override string

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::descriptor::PrimitiveKind;
use crate::domain::{ConfigurationError, Value};

pub(crate) fn convert_primitive(
    name: &str,
    raw: &str,
    kind: &PrimitiveKind,
) -> Result<Value, ConfigurationError> {
    let mismatch = || ConfigurationError::type_mismatch(name, raw, kind);
    match kind {
        PrimitiveKind::Bool => Ok(Value::Bool(raw.to_lowercase() == "true")),
        PrimitiveKind::NoneSentinel => Ok(Value::Str(raw.to_string())),
        PrimitiveKind::Str => Ok(Value::Str(raw.to_string())),
        PrimitiveKind::Int => parse_int(raw).map(Value::Int).ok_or_else(mismatch),
        PrimitiveKind::Float => parse_float(raw).map(Value::Float).ok_or_else(mismatch),
        PrimitiveKind::Decimal => parse_decimal(raw)
            .map(Value::Decimal)
            .map_err(|source| ConfigurationError::InvalidDecimal {
                name: name.to_string(),
                raw: raw.to_string(),
                source,
            }),
        PrimitiveKind::Other(constructor) => constructor.construct(raw).map_err(|reason| {
            tracing::debug!(setting = name, type_name = constructor.type_name(), %reason, "Constructor rejected value");
            mismatch()
        }),
    }
}

/// Integer text: optional sign, decimal digits with single `_` separators,
/// surrounding whitespace ignored
pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    let text = strip_separators(raw.trim())?;
    text.parse().ok()
}

/// Float text: like integers, plus fraction, exponent, `inf` and `nan`
pub(crate) fn parse_float(raw: &str) -> Option<f64> {
    let text = strip_separators(raw.trim())?;
    text.parse().ok()
}

fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let text = raw.trim();
    Decimal::from_str(text).or_else(|err| Decimal::from_scientific(text).map_err(|_| err))
}

/// Removes `_` digit separators, rejecting misplaced ones
fn strip_separators(text: &str) -> Option<String> {
    if !text.contains('_') {
        return Some(text.to_string());
    }
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == '_' {
            let before = i.checked_sub(1).and_then(|j| chars.get(j));
            let after = chars.get(i + 1);
            if !(before.is_some_and(char::is_ascii_digit) && after.is_some_and(char::is_ascii_digit)) {
                return None;
            }
        } else {
            out.push(*c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("42", Some(42) ; "plain")]
    #[test_case("  -17\n", Some(-17) ; "whitespace and sign")]
    #[test_case("+5", Some(5) ; "plus sign")]
    #[test_case("1_000", Some(1000) ; "separators")]
    #[test_case("007", Some(7) ; "leading zeros")]
    #[test_case("1__0", None ; "double separator")]
    #[test_case("_1", None ; "leading separator")]
    #[test_case("", None ; "empty")]
    #[test_case("abc", None ; "letters")]
    #[test_case("1.0", None ; "float text")]
    fn test_parse_int(raw: &str, expected: Option<i64>) {
        assert_eq!(parse_int(raw), expected);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("2.5"), Some(2.5));
        assert_eq!(parse_float(" 1e3 "), Some(1000.0));
        assert_eq!(parse_float("1_000.5"), Some(1000.5));
        assert_eq!(parse_float("-inf"), Some(f64::NEG_INFINITY));
        assert!(parse_float("nan").is_some_and(f64::is_nan));
        assert_eq!(parse_float("xyz"), None);
    }

    #[test]
    fn test_decimal_keeps_distinct_error() {
        let kind = PrimitiveKind::Decimal;
        assert_eq!(
            convert_primitive("RATE", "3.14", &kind).unwrap(),
            Value::Decimal(Decimal::new(314, 2))
        );
        assert_eq!(
            convert_primitive("RATE", "1e-2", &kind).unwrap(),
            Value::Decimal(Decimal::new(1, 2))
        );
        let err = convert_primitive("RATE", "abc", &kind).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidDecimal { .. }));
    }

    #[test]
    fn test_none_sentinel_keeps_text() {
        assert_eq!(
            convert_primitive("NONE_VALUE", "null", &PrimitiveKind::NoneSentinel).unwrap(),
            Value::from("null")
        );
    }
}
