use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::converters::entry::ConverterEntry;
use crate::converters::values;
use crate::error::{DatasourceError, Result};
use crate::types::{FieldType, ScalarKind, ScanShape};

fn decimal_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Decimal\(").expect("Invalid decimal type regex"))
}

fn optional_decimal_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Optional<Decimal\(").expect("Invalid optional decimal type regex"))
}

/// Scalar families with a plain pass-through conversion, in declaration order.
const SCALARS: &[(&str, &str, ScalarKind, FieldType)] = &[
    ("Bool", "Optional<Bool>", ScalarKind::Bool, FieldType::Bool),
    ("Double", "Optional<Double>", ScalarKind::Double, FieldType::Float64),
    ("Float", "Optional<Float>", ScalarKind::Float, FieldType::Float32),
    ("Int64", "Optional<Int64>", ScalarKind::Int64, FieldType::Int64),
    ("Int32", "Optional<Int32>", ScalarKind::Int32, FieldType::Int32),
    ("Int16", "Optional<Int16>", ScalarKind::Int16, FieldType::Int16),
    ("Int8", "Optional<Int8>", ScalarKind::Int8, FieldType::Int8),
    ("Uint64", "Optional<Uint64>", ScalarKind::Uint64, FieldType::Uint64),
    ("Uint32", "Optional<Uint32>", ScalarKind::Uint32, FieldType::Uint32),
    ("Uint16", "Optional<Uint16>", ScalarKind::Uint16, FieldType::Uint16),
    ("Uint8", "Optional<Uint8>", ScalarKind::Uint8, FieldType::Uint8),
    ("Date", "Optional<Date>", ScalarKind::Time, FieldType::Time),
    ("Datetime", "Optional<Datetime>", ScalarKind::Time, FieldType::Time),
    ("Timestamp", "Optional<Timestamp>", ScalarKind::Time, FieldType::Time),
];

/// Ordered, immutable table of converters for database column types.
///
/// Built once and shared read-only between queries. Resolution tries exact
/// names first, then patterns in declaration order.
#[derive(Debug, Clone)]
pub struct TypeConverterRegistry {
    entries: Vec<ConverterEntry>,
}

impl TypeConverterRegistry {
    /// Creates the registry with every supported column type.
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(SCALARS.len() * 2 + 4);

        for (name, _, kind, output) in SCALARS {
            entries.push(ConverterEntry::new(name, ScanShape::Plain(*kind), *output));
        }
        entries.push(
            ConverterEntry::new(
                "Decimal",
                ScanShape::Plain(ScalarKind::Decimal),
                FieldType::Float64,
            )
            .with_pattern(decimal_pattern().clone())
            .with_convert(values::decimal_to_f64),
        );
        entries.push(
            ConverterEntry::new("Interval", ScanShape::Plain(ScalarKind::Int64), FieldType::Int64)
                .with_convert(values::interval_to_millis),
        );

        for (_, name, kind, output) in SCALARS {
            entries.push(ConverterEntry::new(
                name,
                ScanShape::Optional(*kind),
                output.nullable(),
            ));
        }
        entries.push(
            ConverterEntry::new(
                "Optional<Decimal>",
                ScanShape::Optional(ScalarKind::Decimal),
                FieldType::NullableFloat64,
            )
            .with_pattern(optional_decimal_pattern().clone())
            .with_convert(values::decimal_to_nullable_f64),
        );
        entries.push(
            ConverterEntry::new(
                "Optional<Interval>",
                ScanShape::Optional(ScalarKind::Int64),
                FieldType::NullableInt64,
            )
            .with_convert(values::interval_to_nullable_millis),
        );

        Self { entries }
    }

    /// Creates a registry from a custom declaration list.
    /// Names must be unique; their order is the pattern priority order.
    pub fn with_entries(entries: Vec<ConverterEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name()) {
                return Err(DatasourceError::DuplicateConverter(entry.name().to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Resolves a database-reported type name to its converter.
    pub fn resolve(&self, type_name: &str) -> Result<&ConverterEntry> {
        self.get(type_name)
            .or_else(|| self.entries.iter().find(|e| e.matches_pattern(type_name)))
            .ok_or_else(|| DatasourceError::UnsupportedType(type_name.to_string()))
    }

    /// Looks up an entry by its exact canonical name.
    pub fn get(&self, name: &str) -> Option<&ConverterEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[ConverterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
