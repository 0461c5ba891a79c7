use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{DatasourceError, Result};
use crate::types::{FieldType, FieldValue, ScalarKind, Scalar, ScanShape, ScanValue};

/// Microseconds per output unit of an interval field (milliseconds).
const INTERVAL_DIVISOR: i64 = 1000;

/// Signature shared by all custom value converters.
pub type ConvertFn = fn(&ScanValue) -> Result<FieldValue>;

/// Converts a scanned value without transforming it.
///
/// A missing box becomes the output type's zero value (`Null` for nullable
/// outputs). An empty optional box becomes `Null`.
pub fn passthrough(shape: ScanShape, output: FieldType, value: &ScanValue) -> Result<FieldValue> {
    match (shape, value) {
        (_, ScanValue::Null) => Ok(output.zero_value()),
        (ScanShape::Plain(kind), ScanValue::Plain(scalar)) if scalar.kind() == kind => {
            scalar_to_field(scalar)
        }
        (ScanShape::Optional(_), ScanValue::Optional(None)) => Ok(FieldValue::Null),
        (ScanShape::Optional(kind), ScanValue::Optional(Some(scalar))) if scalar.kind() == kind => {
            scalar_to_field(scalar)
        }
        _ => Err(shape_mismatch(shape, value)),
    }
}

/// Decimal to the nearest 64-bit float. A missing box becomes `0.0`.
pub fn decimal_to_f64(value: &ScanValue) -> Result<FieldValue> {
    match value {
        ScanValue::Null => Ok(FieldValue::Float64(0.0)),
        ScanValue::Plain(Scalar::Decimal(d)) => decimal_field(d),
        other => Err(shape_mismatch(ScanShape::Plain(ScalarKind::Decimal), other)),
    }
}

/// Nullable twin of [`decimal_to_f64`].
pub fn decimal_to_nullable_f64(value: &ScanValue) -> Result<FieldValue> {
    match value {
        ScanValue::Null | ScanValue::Optional(None) => Ok(FieldValue::Null),
        ScanValue::Optional(Some(Scalar::Decimal(d))) => decimal_field(d),
        other => Err(shape_mismatch(ScanShape::Optional(ScalarKind::Decimal), other)),
    }
}

/// Interval in microseconds to whole milliseconds.
///
/// Integer division truncates toward zero, so `-500` becomes `0` and `-1500`
/// becomes `-1`.
pub fn interval_to_millis(value: &ScanValue) -> Result<FieldValue> {
    match value {
        ScanValue::Null => Ok(FieldValue::Int64(0)),
        ScanValue::Plain(Scalar::Int64(micros)) => Ok(FieldValue::Int64(micros / INTERVAL_DIVISOR)),
        other => Err(shape_mismatch(ScanShape::Plain(ScalarKind::Int64), other)),
    }
}

/// Nullable twin of [`interval_to_millis`].
pub fn interval_to_nullable_millis(value: &ScanValue) -> Result<FieldValue> {
    match value {
        ScanValue::Null | ScanValue::Optional(None) => Ok(FieldValue::Null),
        ScanValue::Optional(Some(Scalar::Int64(micros))) => {
            Ok(FieldValue::Int64(micros / INTERVAL_DIVISOR))
        }
        other => Err(shape_mismatch(ScanShape::Optional(ScalarKind::Int64), other)),
    }
}

// `to_f64` never returns `None` for a finite decimal; the error only covers the library contract.
fn decimal_field(d: &Decimal) -> Result<FieldValue> {
    d.to_f64()
        .map(FieldValue::Float64)
        .ok_or_else(|| DatasourceError::DecimalOutOfRange(d.to_string()))
}

fn scalar_to_field(scalar: &Scalar) -> Result<FieldValue> {
    Ok(match scalar {
        Scalar::Bool(v) => FieldValue::Bool(*v),
        Scalar::Float(v) => FieldValue::Float32(*v),
        Scalar::Double(v) => FieldValue::Float64(*v),
        Scalar::Int8(v) => FieldValue::Int8(*v),
        Scalar::Int16(v) => FieldValue::Int16(*v),
        Scalar::Int32(v) => FieldValue::Int32(*v),
        Scalar::Int64(v) => FieldValue::Int64(*v),
        Scalar::Uint8(v) => FieldValue::Uint8(*v),
        Scalar::Uint16(v) => FieldValue::Uint16(*v),
        Scalar::Uint32(v) => FieldValue::Uint32(*v),
        Scalar::Uint64(v) => FieldValue::Uint64(*v),
        Scalar::Time(v) => FieldValue::Time(*v),
        Scalar::Decimal(d) => return decimal_field(d),
    })
}

fn shape_mismatch(expected: ScanShape, received: &ScanValue) -> DatasourceError {
    DatasourceError::ShapeMismatch {
        expected: expected.to_string(),
        received: received.shape_name(),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn decimal(s: &str) -> Scalar {
        Scalar::Decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_passthrough_identity() {
        let shape = ScanShape::Plain(ScalarKind::Int16);
        let got = passthrough(shape, FieldType::Int16, &ScanValue::Plain(Scalar::Int16(-12))).unwrap();
        assert_eq!(got, FieldValue::Int16(-12));
    }

    #[test]
    fn test_passthrough_missing_box_is_zero() {
        let shape = ScanShape::Plain(ScalarKind::Uint32);
        let got = passthrough(shape, FieldType::Uint32, &ScanValue::Null).unwrap();
        assert_eq!(got, FieldValue::Uint32(0));
    }

    #[test]
    fn test_passthrough_nullable() {
        let shape = ScanShape::Optional(ScalarKind::Bool);
        let out = FieldType::NullableBool;
        assert_eq!(
            passthrough(shape, out, &ScanValue::Optional(None)).unwrap(),
            FieldValue::Null
        );
        assert_eq!(
            passthrough(shape, out, &ScanValue::Optional(Some(Scalar::Bool(true)))).unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(passthrough(shape, out, &ScanValue::Null).unwrap(), FieldValue::Null);
    }

    #[test]
    fn test_passthrough_shape_mismatch() {
        let shape = ScanShape::Plain(ScalarKind::Int64);
        let err = passthrough(shape, FieldType::Int64, &ScanValue::Plain(Scalar::Int32(1))).unwrap_err();
        match err {
            DatasourceError::ShapeMismatch { expected, received } => {
                assert_eq!(expected, "i64");
                assert_eq!(received, "i32");
            }
            _ => panic!("Expected ShapeMismatch error"),
        }

        // optional box where a plain value is declared
        let err = passthrough(
            shape,
            FieldType::Int64,
            &ScanValue::Optional(Some(Scalar::Int64(1))),
        )
        .unwrap_err();
        assert!(matches!(err, DatasourceError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_decimal_to_f64() {
        match decimal_to_f64(&ScanValue::Plain(decimal("3.14159"))).unwrap() {
            FieldValue::Float64(v) => assert!((v - 3.14159).abs() < 1e-12),
            other => panic!("Expected Float64, got {:?}", other),
        }
        assert_eq!(decimal_to_f64(&ScanValue::Null).unwrap(), FieldValue::Float64(0.0));
    }

    #[test]
    fn test_decimal_to_nullable_f64() {
        assert_eq!(
            decimal_to_nullable_f64(&ScanValue::Optional(None)).unwrap(),
            FieldValue::Null
        );
        assert_eq!(decimal_to_nullable_f64(&ScanValue::Null).unwrap(), FieldValue::Null);
        assert_eq!(
            decimal_to_nullable_f64(&ScanValue::Optional(Some(decimal("-2.5")))).unwrap(),
            FieldValue::Float64(-2.5)
        );
    }

    #[test]
    fn test_decimal_rejects_wrong_shape() {
        let err = decimal_to_f64(&ScanValue::Plain(Scalar::Double(1.0))).unwrap_err();
        match err {
            DatasourceError::ShapeMismatch { expected, received } => {
                assert_eq!(expected, "decimal");
                assert_eq!(received, "f64");
            }
            _ => panic!("Expected ShapeMismatch error"),
        }
        assert!(decimal_to_nullable_f64(&ScanValue::Plain(decimal("1"))).is_err());
    }

    #[test]
    fn test_interval_to_millis() {
        let cases = [(1_500_000, 1500), (-500, 0), (-1500, -1), (999, 0), (0, 0)];
        for (micros, millis) in cases {
            assert_eq!(
                interval_to_millis(&ScanValue::Plain(Scalar::Int64(micros))).unwrap(),
                FieldValue::Int64(millis),
                "interval of {} microseconds",
                micros
            );
        }
        assert_eq!(interval_to_millis(&ScanValue::Null).unwrap(), FieldValue::Int64(0));
    }

    #[test]
    fn test_interval_to_nullable_millis() {
        assert_eq!(
            interval_to_nullable_millis(&ScanValue::Optional(Some(Scalar::Int64(2_000)))).unwrap(),
            FieldValue::Int64(2)
        );
        assert_eq!(
            interval_to_nullable_millis(&ScanValue::Optional(None)).unwrap(),
            FieldValue::Null
        );
        let err = interval_to_nullable_millis(&ScanValue::Plain(Scalar::Int64(1))).unwrap_err();
        match err {
            DatasourceError::ShapeMismatch { expected, .. } => assert_eq!(expected, "Option<i64>"),
            _ => panic!("Expected ShapeMismatch error"),
        }
    }
}
