use async_trait::async_trait;

use crate::converters::TypeConverterRegistry;
use crate::error::Result;
use crate::types::RawQueryResult;

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Connecting to the database
/// - Reporting each result column's database type name
/// - Scanning every cell in the shape the registry declares for that type
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Execute a fully interpolated SQL query.
    async fn execute(&self, sql: &str, registry: &TypeConverterRegistry) -> Result<RawQueryResult>;
}
