mod field;
mod frame;
mod scan_value;

pub use field::{FieldType, FieldValue};
pub use frame::{ColumnMeta, Field, Frame, RawQueryResult};
pub use scan_value::{ScalarKind, Scalar, ScanShape, ScanValue};
