use std::fmt;

use chrono::{DateTime, Utc};

/// Semantic type of an output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Time,
    NullableBool,
    NullableFloat32,
    NullableFloat64,
    NullableInt8,
    NullableInt16,
    NullableInt32,
    NullableInt64,
    NullableUint8,
    NullableUint16,
    NullableUint32,
    NullableUint64,
    NullableTime,
}

impl FieldType {
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            FieldType::NullableBool
                | FieldType::NullableFloat32
                | FieldType::NullableFloat64
                | FieldType::NullableInt8
                | FieldType::NullableInt16
                | FieldType::NullableInt32
                | FieldType::NullableInt64
                | FieldType::NullableUint8
                | FieldType::NullableUint16
                | FieldType::NullableUint32
                | FieldType::NullableUint64
                | FieldType::NullableTime
        )
    }

    /// The nullable twin of this type. Nullable types map to themselves.
    pub fn nullable(&self) -> FieldType {
        match self {
            FieldType::Bool => FieldType::NullableBool,
            FieldType::Float32 => FieldType::NullableFloat32,
            FieldType::Float64 => FieldType::NullableFloat64,
            FieldType::Int8 => FieldType::NullableInt8,
            FieldType::Int16 => FieldType::NullableInt16,
            FieldType::Int32 => FieldType::NullableInt32,
            FieldType::Int64 => FieldType::NullableInt64,
            FieldType::Uint8 => FieldType::NullableUint8,
            FieldType::Uint16 => FieldType::NullableUint16,
            FieldType::Uint32 => FieldType::NullableUint32,
            FieldType::Uint64 => FieldType::NullableUint64,
            FieldType::Time => FieldType::NullableTime,
            other => *other,
        }
    }

    /// Zero value of a non-nullable type, `Null` for nullable ones.
    pub fn zero_value(&self) -> FieldValue {
        match self {
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::Float32 => FieldValue::Float32(0.0),
            FieldType::Float64 => FieldValue::Float64(0.0),
            FieldType::Int8 => FieldValue::Int8(0),
            FieldType::Int16 => FieldValue::Int16(0),
            FieldType::Int32 => FieldValue::Int32(0),
            FieldType::Int64 => FieldValue::Int64(0),
            FieldType::Uint8 => FieldValue::Uint8(0),
            FieldType::Uint16 => FieldValue::Uint16(0),
            FieldType::Uint32 => FieldValue::Uint32(0),
            FieldType::Uint64 => FieldValue::Uint64(0),
            FieldType::Time => FieldValue::Time(DateTime::<Utc>::default()),
            _ => FieldValue::Null,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A converted value placed into a typed field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Float32(f32),
    Float64(f64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Time(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}
