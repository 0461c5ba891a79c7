use crate::converters::TypeConverterRegistry;
use crate::error::{DatasourceError, Result};
use crate::types::{FieldType, FieldValue, ScanValue};

/// Name and database-reported type of a result column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    pub type_name: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Driver-agnostic raw result from a database query.
/// Each cell is scanned in the shape declared for its column type.
#[derive(Debug, Clone)]
pub struct RawQueryResult {
    /// Columns in order
    pub columns: Vec<ColumnMeta>,
    /// Rows, where each row is a vector of scanned values in column order
    pub rows: Vec<Vec<ScanValue>>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<ColumnMeta>, rows: Vec<Vec<ScanValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// A named column of converted values sharing one field type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    field_type: FieldType,
    values: Vec<FieldValue>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, value: FieldValue) {
        self.values.push(value);
    }
}

/// Typed tabular result, one field per result column.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    name: String,
    fields: Vec<Field>,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builds a frame from raw scanned rows.
    ///
    /// Every column type is resolved before any row is converted, so an
    /// unsupported column fails the whole frame.
    pub fn from_raw(
        name: impl Into<String>,
        raw: RawQueryResult,
        registry: &TypeConverterRegistry,
    ) -> Result<Self> {
        let converters = raw
            .columns
            .iter()
            .map(|col| registry.resolve(&col.type_name))
            .collect::<Result<Vec<_>>>()?;

        let mut fields: Vec<Field> = raw
            .columns
            .iter()
            .zip(&converters)
            .map(|(col, entry)| Field::new(col.name.clone(), entry.output_type()))
            .collect();

        for row in &raw.rows {
            if row.len() != converters.len() {
                return Err(DatasourceError::ColumnCountMismatch {
                    expected: converters.len(),
                    actual: row.len(),
                });
            }
            for ((value, entry), field) in row.iter().zip(&converters).zip(fields.iter_mut()) {
                field.push(entry.convert(value)?);
            }
        }

        Ok(Self {
            name: name.into(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Gets a field by column name.
    pub fn field(&self, name: &str) -> Result<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| DatasourceError::ColumnNotFound(name.to_string()))
    }

    /// Returns the number of rows in this frame.
    pub fn row_count(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    /// Returns true if this frame contains no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}
