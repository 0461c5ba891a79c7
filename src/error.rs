use thiserror::Error;

/// Error type for data source operations
#[derive(Debug, Error)]
pub enum DatasourceError {
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    #[error("Scanned value has shape {received}, expected {expected}")]
    ShapeMismatch { expected: String, received: String },

    #[error("Converter declared twice: {0}")]
    DuplicateConverter(String),

    /// `rust_decimal` reports float conversion as an `Option`; this carries its `None`.
    /// Every finite decimal converts today, so this only guards the library contract.
    #[error("Decimal {0} cannot be represented as a 64-bit float")]
    DecimalOutOfRange(String),

    #[error("Macro {name}: expected {expected} argument(s), received {received}")]
    MacroArity {
        name: &'static str,
        expected: usize,
        received: usize,
    },

    #[error("Fallback should contain at least one character")]
    EmptyFallback,

    #[error("Unknown macro: $__{0}")]
    UnknownMacro(String),

    #[error("Missing closing parenthesis for macro: $__{0}")]
    UnterminatedMacro(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Could not parse json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timed out")]
    ConnectionTimedOut,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Query timed out")]
    QueryTimedOut,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Expected {expected} column(s) per row, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
}

impl DatasourceError {
    /// Returns true for failures caused by the request itself rather than by the database.
    /// These are reported upstream as bad requests.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DatasourceError::MacroArity { .. }
                | DatasourceError::EmptyFallback
                | DatasourceError::UnknownMacro(_)
                | DatasourceError::UnterminatedMacro(_)
                | DatasourceError::InvalidSettings(_)
                | DatasourceError::InvalidJson(_)
        )
    }
}

/// Result type alias for data source operations
pub type Result<T> = std::result::Result<T, DatasourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_errors_are_bad_requests() {
        let err = DatasourceError::MacroArity {
            name: "timeFilter",
            expected: 1,
            received: 0,
        };
        assert!(err.is_bad_request());
        assert!(DatasourceError::EmptyFallback.is_bad_request());
        assert!(!DatasourceError::UnsupportedType("Map".to_string()).is_bad_request());
        assert!(!DatasourceError::QueryTimedOut.is_bad_request());
    }

    #[test]
    fn test_arity_message_names_counts() {
        let err = DatasourceError::MacroArity {
            name: "varFallback",
            expected: 2,
            received: 3,
        };
        assert_eq!(
            err.to_string(),
            "Macro varFallback: expected 2 argument(s), received 3"
        );
    }

    #[test]
    fn test_decimal_out_of_range_is_a_server_error() {
        let err = DatasourceError::DecimalOutOfRange("1e400".to_string());
        assert!(!err.is_bad_request());
        assert_eq!(
            err.to_string(),
            "Decimal 1e400 cannot be represented as a 64-bit float"
        );
    }
}
