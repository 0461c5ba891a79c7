//! Query macros.
//!
//! Raw SQL may contain `$__name` or `$__name(arg, ...)` placeholders. Each one is
//! replaced by the SQL fragment its macro produces from the query's time range
//! and arguments.

mod functions;
mod interpolate;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{DatasourceError, Result};

use functions::{FROM_TIMESTAMP_ARITY, TIME_FILTER_ARITY, TO_TIMESTAMP_ARITY, VAR_FALLBACK_ARITY};

pub use functions::{from_timestamp, time_filter, to_timestamp, var_fallback};

/// Signature of a macro function.
pub type MacroFn = fn(&TimeRange, &[&str]) -> Result<String>;

/// The `{from, to}` instants of a query, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new<Tz: TimeZone>(from: DateTime<Tz>, to: DateTime<Tz>) -> Self {
        Self {
            from: from.with_timezone(&Utc),
            to: to.with_timezone(&Utc),
        }
    }
}

/// A named macro and the function that expands it.
///
/// `arity` is the argument count the function itself enforces.
#[derive(Debug, Clone, Copy)]
pub struct MacroDefinition {
    pub name: &'static str,
    pub arity: usize,
    pub expand: MacroFn,
}

const MACROS: &[MacroDefinition] = &[
    MacroDefinition {
        name: "fromTimestamp",
        arity: FROM_TIMESTAMP_ARITY,
        expand: from_timestamp,
    },
    MacroDefinition {
        name: "toTimestamp",
        arity: TO_TIMESTAMP_ARITY,
        expand: to_timestamp,
    },
    MacroDefinition {
        name: "timeFilter",
        arity: TIME_FILTER_ARITY,
        expand: time_filter,
    },
    MacroDefinition {
        name: "varFallback",
        arity: VAR_FALLBACK_ARITY,
        expand: var_fallback,
    },
];

/// The fixed set of macros understood in raw SQL.
#[derive(Debug, Clone, Copy)]
pub struct MacroTable {
    macros: &'static [MacroDefinition],
}

impl MacroTable {
    pub fn new() -> Self {
        Self { macros: MACROS }
    }

    /// Looks up a macro by name.
    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.iter().find(|m| m.name == name)
    }

    pub fn definitions(&self) -> &[MacroDefinition] {
        self.macros
    }

    /// Expands a single macro invocation.
    pub fn expand(&self, name: &str, range: &TimeRange, args: &[&str]) -> Result<String> {
        let definition = self
            .get(name)
            .ok_or_else(|| DatasourceError::UnknownMacro(name.to_string()))?;
        (definition.expand)(range, args)
    }

    /// Replaces every macro invocation in `raw_sql`.
    pub fn interpolate(&self, raw_sql: &str, range: &TimeRange) -> Result<String> {
        interpolate::interpolate(self, raw_sql, range)
    }
}

impl Default for MacroTable {
    fn default() -> Self {
        Self::new()
    }
}
