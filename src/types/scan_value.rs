use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// The scalar families a column type can be scanned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Float,
    Double,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal,
    Time,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Float => "f32",
            ScalarKind::Double => "f64",
            ScalarKind::Int8 => "i8",
            ScalarKind::Int16 => "i16",
            ScalarKind::Int32 => "i32",
            ScalarKind::Int64 => "i64",
            ScalarKind::Uint8 => "u8",
            ScalarKind::Uint16 => "u16",
            ScalarKind::Uint32 => "u32",
            ScalarKind::Uint64 => "u64",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Time => "timestamp",
        };
        f.write_str(name)
    }
}

/// A single scanned scalar as delivered by a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Float(f32),
    Double(f64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Decimal(Decimal),
    Time(DateTime<Utc>),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Double(_) => ScalarKind::Double,
            Scalar::Int8(_) => ScalarKind::Int8,
            Scalar::Int16(_) => ScalarKind::Int16,
            Scalar::Int32(_) => ScalarKind::Int32,
            Scalar::Int64(_) => ScalarKind::Int64,
            Scalar::Uint8(_) => ScalarKind::Uint8,
            Scalar::Uint16(_) => ScalarKind::Uint16,
            Scalar::Uint32(_) => ScalarKind::Uint32,
            Scalar::Uint64(_) => ScalarKind::Uint64,
            Scalar::Decimal(_) => ScalarKind::Decimal,
            Scalar::Time(_) => ScalarKind::Time,
        }
    }
}

/// Storage layout a driver must allocate for a column.
/// `Optional` adds one layer that may itself be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanShape {
    Plain(ScalarKind),
    Optional(ScalarKind),
}

impl ScanShape {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScanShape::Plain(kind) | ScanShape::Optional(kind) => *kind,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ScanShape::Optional(_))
    }
}

impl fmt::Display for ScanShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanShape::Plain(kind) => write!(f, "{}", kind),
            ScanShape::Optional(kind) => write!(f, "Option<{}>", kind),
        }
    }
}

/// A scanned cell.
///
/// `Null` means the driver delivered no box at all, which is different from an
/// `Optional(None)` box holding an absent value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanValue {
    Null,
    Plain(Scalar),
    Optional(Option<Scalar>),
}

impl ScanValue {
    /// Human readable description of the runtime shape, used in mismatch errors.
    pub fn shape_name(&self) -> String {
        match self {
            ScanValue::Null => "null".to_string(),
            ScanValue::Plain(s) => s.kind().to_string(),
            ScanValue::Optional(Some(s)) => format!("Option<{}>", s.kind()),
            ScanValue::Optional(None) => "Option<_>(None)".to_string(),
        }
    }
}

impl From<Scalar> for ScanValue {
    fn from(value: Scalar) -> Self {
        ScanValue::Plain(value)
    }
}

impl From<Option<Scalar>> for ScanValue {
    fn from(value: Option<Scalar>) -> Self {
        ScanValue::Optional(value)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    f32 => Float,
    f64 => Double,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    Decimal => Decimal,
    DateTime<Utc> => Time,
);
