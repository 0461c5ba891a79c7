//! ydb-datasource - typed query results and SQL macros for a YDB data source
//!
//! # Example
//! ```ignore
//! use ydb_datasource::{DataQuery, Datasource, DatasourceSettings, TimeRange};
//!
//! // Connect to database
//! let settings = DatasourceSettings::load(json_data, &secrets)?;
//! let datasource = Datasource::connect(&settings).await?;
//!
//! // Run a query with macros over the dashboard's time range
//! let query = DataQuery::new(
//!     "A",
//!     "SELECT ts, value FROM metrics WHERE $__timeFilter(ts)",
//!     TimeRange::new(from, to),
//! );
//! let frame = datasource.query(&query).await?;
//!
//! let values = frame.field("value")?;
//! ```

pub mod converters;
pub mod datasource;
pub mod drivers;
pub mod error;
pub mod macros;
pub mod settings;
pub mod traits;
pub mod types;

// Re-export main types for convenient access
pub use converters::{ConverterEntry, TypeConverterRegistry};
pub use datasource::{DataQuery, Datasource};
pub use error::{DatasourceError, Result};
pub use macros::{MacroTable, TimeRange};
pub use settings::{AuthKind, DatasourceSettings};
pub use traits::DatabaseDriver;
pub use types::{FieldType, FieldValue, Frame, ScanShape, ScanValue};
