//! Per-field value coercion.

use serde_json::Value;
use trowel_normalize::{DateInput, DateStrategy, NULL_SENTINEL, NumeralCleaner, transliterate};
use trowel_types::{FieldOutcome, SkippedReason};

/// Coerces a JSON price into an integer, truncating any fraction.
///
/// Missing values, JSON null, `""` and `"null"` are absent. Strings may use
/// Persian digits. A numeric zero is kept as zero.
pub fn coerce_price(value: Option<&Value>) -> FieldOutcome<i64> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => parse_price_text(s),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => n
                .as_f64()
                .ok_or_else(|| SkippedReason::OutOfRange(n.to_string()))
                .and_then(truncate)
                .map(Some),
        },
        Some(Value::Bool(_)) => Err(SkippedReason::UnexpectedType("bool")),
        Some(Value::Array(_)) => Err(SkippedReason::UnexpectedType("array")),
        Some(Value::Object(_)) => Err(SkippedReason::UnexpectedType("object")),
    }
}

fn parse_price_text(text: &str) -> FieldOutcome<i64> {
    price_from_text(text, |t| Some(transliterate(t)))
}

/// Coerces rendered price text, dropping labels and thousands separators.
///
/// Blank text and `"null"` are absent, like API prices.
pub fn coerce_board_price(text: &str) -> FieldOutcome<i64> {
    price_from_text(text, |t| NumeralCleaner::with_decimal_point().clean(Some(t)))
}

/// Shared price rule: blank or `"null"` is absent, otherwise `digits` maps
/// the trimmed text to a number that is parsed and truncated.
fn price_from_text(
    text: &str,
    digits: impl FnOnce(&str) -> Option<String>,
) -> FieldOutcome<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == NULL_SENTINEL {
        return Ok(None);
    }
    let value: f64 = digits(trimmed)
        .and_then(|d| d.parse().ok())
        .ok_or_else(|| SkippedReason::NotNumeric(text.to_string()))?;
    truncate(value).map(Some)
}

fn truncate(value: f64) -> Result<i64, SkippedReason> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !value.is_finite() || value >= i64::MAX as f64 || value < i64::MIN as f64 {
        return Err(SkippedReason::OutOfRange(value.to_string()));
    }
    Ok(value.trunc() as i64)
}

/// Coerces a JSON date through `strategy`.
pub fn coerce_date(value: Option<&Value>, strategy: DateStrategy) -> FieldOutcome<String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => strategy.apply(Some(DateInput::Text(s))),
        Some(Value::Number(n)) => {
            let text = n.to_string();
            strategy.apply(Some(DateInput::Text(&text)))
        }
        Some(Value::Bool(_)) => Err(SkippedReason::UnexpectedType("bool")),
        Some(Value::Array(_)) => Err(SkippedReason::UnexpectedType("array")),
        Some(Value::Object(_)) => Err(SkippedReason::UnexpectedType("object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_strings() {
        assert_eq!(coerce_price(Some(&json!("28500"))), Ok(Some(28500)));
        assert_eq!(coerce_price(Some(&json!("28500.9"))), Ok(Some(28500)));
        assert_eq!(coerce_price(Some(&json!("۲۸۵۰۰"))), Ok(Some(28500)));
        assert_eq!(coerce_price(Some(&json!(" 42 "))), Ok(Some(42)));
    }

    #[test]
    fn test_price_numbers() {
        assert_eq!(coerce_price(Some(&json!(28500))), Ok(Some(28500)));
        assert_eq!(coerce_price(Some(&json!(28500.75))), Ok(Some(28500)));
        assert_eq!(coerce_price(Some(&json!(-3.5))), Ok(Some(-3)));
        assert_eq!(coerce_price(Some(&json!(0))), Ok(Some(0)));
    }

    #[test]
    fn test_price_absent() {
        assert_eq!(coerce_price(None), Ok(None));
        assert_eq!(coerce_price(Some(&Value::Null)), Ok(None));
        assert_eq!(coerce_price(Some(&json!("null"))), Ok(None));
        assert_eq!(coerce_price(Some(&json!(""))), Ok(None));
    }

    #[test]
    fn test_price_malformed() {
        assert_eq!(
            coerce_price(Some(&json!("28,500"))),
            Err(SkippedReason::NotNumeric("28,500".into()))
        );
        assert!(matches!(
            coerce_price(Some(&json!("1e300"))),
            Err(SkippedReason::OutOfRange(_))
        ));
        assert!(matches!(
            coerce_price(Some(&json!("NaN"))),
            Err(SkippedReason::OutOfRange(_))
        ));
        assert_eq!(
            coerce_price(Some(&json!(true))),
            Err(SkippedReason::UnexpectedType("bool"))
        );
    }

    #[test]
    fn test_board_price() {
        assert_eq!(coerce_board_price("۲۸,۵۰۰ ریال"), Ok(Some(28500)));
        assert_eq!(coerce_board_price("۱۲.۷"), Ok(Some(12)));
        assert_eq!(coerce_board_price(""), Ok(None));
        assert!(coerce_board_price("-").is_err());
    }

    #[test]
    fn test_board_and_api_agree_on_absent_prices() {
        for text in ["", "   ", "null", " null "] {
            assert_eq!(coerce_board_price(text), Ok(None), "{text:?}");
            assert_eq!(coerce_price(Some(&json!(text))), Ok(None), "{text:?}");
        }
        assert_eq!(
            coerce_board_price("n/a"),
            Err(SkippedReason::NotNumeric("n/a".into()))
        );
    }

    #[test]
    fn test_date_from_number() {
        assert_eq!(
            coerce_date(Some(&json!(14010101)), DateStrategy::API),
            Ok(Some("1401-01-01".into()))
        );
        assert_eq!(coerce_date(Some(&Value::Null), DateStrategy::API), Ok(None));
        assert!(coerce_date(Some(&json!([1])), DateStrategy::API).is_err());
    }
}
