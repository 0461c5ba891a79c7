use chrono::{DateTime, Utc};

use crate::error::{DatasourceError, Result};
use crate::macros::TimeRange;

pub(super) const FROM_TIMESTAMP_ARITY: usize = 0;
pub(super) const TO_TIMESTAMP_ARITY: usize = 0;
pub(super) const TIME_FILTER_ARITY: usize = 1;
pub(super) const VAR_FALLBACK_ARITY: usize = 2;

fn check_arity(name: &'static str, expected: usize, args: &[&str]) -> Result<()> {
    if args.len() != expected {
        return Err(DatasourceError::MacroArity {
            name,
            expected,
            received: args.len(),
        });
    }
    Ok(())
}

fn cast_timestamp(at: DateTime<Utc>) -> String {
    format!("CAST({} AS TIMESTAMP)", at.timestamp_micros())
}

/// `$__fromTimestamp`: start of the time range as a timestamp literal.
pub fn from_timestamp(range: &TimeRange, args: &[&str]) -> Result<String> {
    check_arity("fromTimestamp", FROM_TIMESTAMP_ARITY, args)?;
    Ok(cast_timestamp(range.from))
}

/// `$__toTimestamp`: end of the time range as a timestamp literal.
pub fn to_timestamp(range: &TimeRange, args: &[&str]) -> Result<String> {
    check_arity("toTimestamp", TO_TIMESTAMP_ARITY, args)?;
    Ok(cast_timestamp(range.to))
}

/// `$__timeFilter(column)`: inclusive range predicate on `column`.
pub fn time_filter(range: &TimeRange, args: &[&str]) -> Result<String> {
    check_arity("timeFilter", TIME_FILTER_ARITY, args)?;
    let column = args[0];
    Ok(format!(
        "{column} >= {} AND {column} <= {}",
        cast_timestamp(range.from),
        cast_timestamp(range.to)
    ))
}

/// `$__varFallback(fallback, value)`: `value` unless it is empty, then `fallback`.
pub fn var_fallback(_range: &TimeRange, args: &[&str]) -> Result<String> {
    check_arity("varFallback", VAR_FALLBACK_ARITY, args)?;
    let (fallback, value) = (args[0], args[1]);
    if !value.is_empty() {
        return Ok(value.to_string());
    }
    if fallback.is_empty() {
        return Err(DatasourceError::EmptyFallback);
    }
    Ok(fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> TimeRange {
        let from = DateTime::parse_from_rfc3339("2021-11-12T11:45:26.371Z").unwrap();
        let to = DateTime::parse_from_rfc3339("2022-11-12T11:45:26.371Z").unwrap();
        TimeRange::new(from, to)
    }

    fn assert_arity(err: DatasourceError, want_expected: usize, want_received: usize) {
        match err {
            DatasourceError::MacroArity {
                expected, received, ..
            } => {
                assert_eq!(expected, want_expected);
                assert_eq!(received, want_received);
            }
            other => panic!("Expected MacroArity error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_timestamp() {
        let got = from_timestamp(&range(), &[]).unwrap();
        assert_eq!(got, "CAST(1636717526371000 AS TIMESTAMP)");
    }

    #[test]
    fn test_to_timestamp() {
        let got = to_timestamp(&range(), &[]).unwrap();
        assert_eq!(got, "CAST(1668253526371000 AS TIMESTAMP)");
    }

    #[test]
    fn test_timestamps_take_no_arguments() {
        assert_arity(from_timestamp(&range(), &["x"]).unwrap_err(), 0, 1);
        assert_arity(to_timestamp(&range(), &["x", "y"]).unwrap_err(), 0, 2);
    }

    #[test]
    fn test_time_filter() {
        let got = time_filter(&range(), &["foo"]).unwrap();
        assert_eq!(
            got,
            "foo >= CAST(1636717526371000 AS TIMESTAMP) AND foo <= CAST(1668253526371000 AS TIMESTAMP)"
        );
    }

    #[test]
    fn test_time_filter_arity() {
        assert_arity(time_filter(&range(), &[]).unwrap_err(), 1, 0);
        assert_arity(time_filter(&range(), &["a", "b"]).unwrap_err(), 1, 2);
    }

    #[test]
    fn test_var_fallback() {
        assert_eq!(var_fallback(&range(), &["fallback", "value"]).unwrap(), "value");
        assert_eq!(var_fallback(&range(), &["fallback", ""]).unwrap(), "fallback");
        assert_eq!(var_fallback(&range(), &["", "value"]).unwrap(), "value");
        assert!(matches!(
            var_fallback(&range(), &["", ""]).unwrap_err(),
            DatasourceError::EmptyFallback
        ));
    }

    #[test]
    fn test_var_fallback_arity() {
        assert_arity(var_fallback(&range(), &["only"]).unwrap_err(), 2, 1);
        assert_arity(var_fallback(&range(), &["a", "b", "c"]).unwrap_err(), 2, 3);
    }
}
