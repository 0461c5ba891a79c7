use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::converters::TypeConverterRegistry;
use crate::error::{DatasourceError, Result};
use crate::traits::DatabaseDriver;
use crate::types::{ColumnMeta, RawQueryResult, ScanValue};

/// A queued outcome for the next executed query.
#[derive(Debug, Clone)]
enum QueuedResponse {
    Rows(RawQueryResult),
    Failure(String),
}

/// An in-memory database driver for testing.
///
/// Allows configuring expected responses and verifying executed queries.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use ydb_datasource::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
/// use ydb_datasource::traits::DatabaseDriver;
/// use ydb_datasource::types::{Scalar, ScanValue};
///
/// let driver = Arc::new(
///     InMemoryTestDriver::new().with_response(
///         InMemoryTestResponseBuilder::new()
///             .column("id", "Uint64")
///             .row(vec![ScanValue::Plain(Scalar::Uint64(1))])
///             .build(),
///     ),
/// );
/// ```
pub struct InMemoryTestDriver {
    responses: Mutex<VecDeque<QueuedResponse>>,
    recorded_queries: Mutex<Vec<String>>,
    default_response: RawQueryResult,
    delay: Option<Duration>,
}

impl InMemoryTestDriver {
    /// Create a new in-memory test driver with no pre-configured responses.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            recorded_queries: Mutex::new(Vec::new()),
            default_response: RawQueryResult::empty(),
            delay: None,
        }
    }

    /// Add a response to be returned by the next query.
    /// Responses are returned in FIFO order.
    pub fn with_response(self, response: RawQueryResult) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(QueuedResponse::Rows(response));
        self
    }

    /// Make the next query fail with `QueryFailed(message)`.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(QueuedResponse::Failure(message.into()));
        self
    }

    /// Set a default response to use when no queued responses remain.
    pub fn with_default_response(mut self, response: RawQueryResult) -> Self {
        self.default_response = response;
        self
    }

    /// Sleep before answering each query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all recorded SQL strings that have been executed.
    pub fn recorded_queries(&self) -> Vec<String> {
        self.recorded_queries.lock().unwrap().clone()
    }

    /// Get the last recorded query, if any.
    pub fn last_query(&self) -> Option<String> {
        self.recorded_queries.lock().unwrap().last().cloned()
    }

    /// Assert that the last query matches the expected SQL.
    pub fn assert_last_query(&self, expected_sql: &str) {
        let last = self.last_query().expect("No queries were recorded");
        assert_eq!(
            last, expected_sql,
            "SQL mismatch.\nExpected: {}\nActual: {}",
            expected_sql, last
        );
    }

    /// Assert that exactly n queries were executed.
    pub fn assert_query_count(&self, expected: usize) {
        let actual = self.recorded_queries.lock().unwrap().len();
        assert_eq!(
            actual, expected,
            "Query count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }
}

impl Default for InMemoryTestDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for InMemoryTestDriver {
    async fn execute(&self, sql: &str, _registry: &TypeConverterRegistry) -> Result<RawQueryResult> {
        self.recorded_queries.lock().unwrap().push(sql.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        // Return next queued response or default
        let response = self.responses.lock().unwrap().pop_front();
        match response {
            Some(QueuedResponse::Rows(rows)) => Ok(rows),
            Some(QueuedResponse::Failure(message)) => Err(DatasourceError::QueryFailed(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

/// Builder for creating test responses easily.
pub struct InMemoryTestResponseBuilder {
    columns: Vec<ColumnMeta>,
    rows: Vec<Vec<ScanValue>>,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Add a column with its database type name.
    pub fn column(mut self, name: &str, type_name: &str) -> Self {
        self.columns.push(ColumnMeta::new(name, type_name));
        self
    }

    /// Add a row of scanned values.
    pub fn row(mut self, values: Vec<ScanValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Build the RawQueryResult.
    pub fn build(self) -> RawQueryResult {
        RawQueryResult::new(self.columns, self.rows)
    }
}

impl Default for InMemoryTestResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
