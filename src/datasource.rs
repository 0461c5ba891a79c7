use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::converters::TypeConverterRegistry;
use crate::drivers::TokioPostgresDriver;
use crate::error::{DatasourceError, Result};
use crate::macros::{MacroTable, TimeRange};
use crate::settings::{DatasourceSettings, DEFAULT_QUERY_TIMEOUT};
use crate::traits::DatabaseDriver;
use crate::types::Frame;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryModel {
    #[serde(default)]
    ref_id: String,
    #[serde(default)]
    raw_sql: String,
}

/// A raw SQL query and the time range it runs over.
#[derive(Debug, Clone, PartialEq)]
pub struct DataQuery {
    pub ref_id: String,
    pub raw_sql: String,
    pub time_range: TimeRange,
}

impl DataQuery {
    pub fn new(ref_id: impl Into<String>, raw_sql: impl Into<String>, time_range: TimeRange) -> Self {
        Self {
            ref_id: ref_id.into(),
            raw_sql: raw_sql.into(),
            time_range,
        }
    }

    /// Reads `refId` and `rawSql` from the query JSON.
    pub fn from_json(json: &[u8], time_range: TimeRange) -> Result<Self> {
        let model: QueryModel = serde_json::from_slice(json)?;
        Ok(Self::new(model.ref_id, model.raw_sql, time_range))
    }
}

/// Main entry point: runs raw SQL queries and returns typed frames.
///
/// The registry and macro table are built once and shared read-only by every
/// query.
pub struct Datasource {
    driver: Arc<dyn DatabaseDriver>,
    registry: Arc<TypeConverterRegistry>,
    macros: MacroTable,
    query_timeout: Duration,
}

impl Datasource {
    /// Connect to the database described by `settings`.
    pub async fn connect(settings: &DatasourceSettings) -> Result<Self> {
        let driver = TokioPostgresDriver::connect(settings).await?;
        Ok(Self::with_driver(Arc::new(driver)).with_query_timeout(settings.query_timeout))
    }

    /// Create a data source over a custom driver.
    /// Useful for testing or using alternative database drivers.
    pub fn with_driver(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self {
            driver,
            registry: Arc::new(TypeConverterRegistry::new()),
            macros: MacroTable::new(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &TypeConverterRegistry {
        &self.registry
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Expands the query's macros without running it.
    pub fn interpolate(&self, query: &DataQuery) -> Result<String> {
        self.macros.interpolate(&query.raw_sql, &query.time_range)
    }

    /// Interpolates, executes and converts a query into a frame named after its ref id.
    pub async fn query(&self, query: &DataQuery) -> Result<Frame> {
        let sql = self.interpolate(query)?;
        tracing::debug!(ref_id = %query.ref_id, sql = %sql, "executing query");

        let raw = tokio::time::timeout(self.query_timeout, self.driver.execute(&sql, &self.registry))
            .await
            .map_err(|_| DatasourceError::QueryTimedOut)??;

        let frame = Frame::from_raw(query.ref_id.clone(), raw, &self.registry)?;
        tracing::debug!(
            ref_id = %query.ref_id,
            fields = frame.fields().len(),
            rows = frame.row_count(),
            "built frame"
        );
        Ok(frame)
    }
}
