use regex::Regex;

use crate::converters::values::{self, ConvertFn};
use crate::error::Result;
use crate::types::{FieldType, FieldValue, ScanShape, ScanValue};

/// How one database type name is scanned and converted.
#[derive(Debug, Clone)]
pub struct ConverterEntry {
    name: &'static str,
    scan_shape: ScanShape,
    output_type: FieldType,
    match_pattern: Option<Regex>,
    convert: Option<ConvertFn>,
}

impl ConverterEntry {
    /// Creates an entry that passes scanned values through unchanged.
    pub fn new(name: &'static str, scan_shape: ScanShape, output_type: FieldType) -> Self {
        Self {
            name,
            scan_shape,
            output_type,
            match_pattern: None,
            convert: None,
        }
    }

    /// Also match parameterized type names, e.g. `Decimal(22,9)` for `Decimal`.
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.match_pattern = Some(pattern);
        self
    }

    /// Replace the pass-through conversion.
    pub fn with_convert(mut self, convert: ConvertFn) -> Self {
        self.convert = Some(convert);
        self
    }

    /// Canonical type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn scan_shape(&self) -> ScanShape {
        self.scan_shape
    }

    pub fn output_type(&self) -> FieldType {
        self.output_type
    }

    pub fn match_pattern(&self) -> Option<&Regex> {
        self.match_pattern.as_ref()
    }

    /// Returns true if `type_name` matches this entry's pattern.
    /// Entries without a pattern never match here; exact names are handled by the registry.
    pub fn matches_pattern(&self, type_name: &str) -> bool {
        self.match_pattern
            .as_ref()
            .is_some_and(|re| re.is_match(type_name))
    }

    /// Converts one scanned value into this entry's output type.
    pub fn convert(&self, value: &ScanValue) -> Result<FieldValue> {
        match self.convert {
            Some(convert) => convert(value),
            None => values::passthrough(self.scan_shape, self.output_type, value),
        }
    }
}
