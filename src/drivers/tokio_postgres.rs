use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::{Client, NoTls, Row};

use crate::converters::TypeConverterRegistry;
use crate::error::{DatasourceError, Result};
use crate::settings::{AuthKind, DatasourceSettings};
use crate::traits::DatabaseDriver;
use crate::types::{ColumnMeta, RawQueryResult, ScalarKind, Scalar, ScanShape, ScanValue};

const DEFAULT_USER: &str = "root";

/// Driver for the database's PostgreSQL-compatible endpoint, using tokio-postgres.
pub struct TokioPostgresDriver {
    client: Client,
}

impl TokioPostgresDriver {
    /// Connect using the data source settings.
    /// Gives up after the settings' connect timeout.
    pub async fn connect(settings: &DatasourceSettings) -> Result<Self> {
        let config = wire_config(settings)?;
        let timeout = settings.connect_timeout()?;

        let (client, connection) = tokio::time::timeout(timeout, config.connect(NoTls))
            .await
            .map_err(|_| DatasourceError::ConnectionTimedOut)?
            .map_err(|e| DatasourceError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "database connection error");
            }
        });

        Ok(Self { client })
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn execute(&self, sql: &str, registry: &TypeConverterRegistry) -> Result<RawQueryResult> {
        let statement = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| DatasourceError::QueryFailed(e.to_string()))?;

        let columns: Vec<ColumnMeta> = statement
            .columns()
            .iter()
            .map(|c| ColumnMeta::new(c.name(), column_type_name(c.type_())))
            .collect();
        let shapes = columns
            .iter()
            .map(|c| registry.resolve(&c.type_name).map(|entry| entry.scan_shape()))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .client
            .query(&statement, &[])
            .await
            .map_err(|e| DatasourceError::QueryFailed(e.to_string()))?;

        let rows = rows
            .iter()
            .map(|row| {
                shapes
                    .iter()
                    .zip(statement.columns())
                    .enumerate()
                    .map(|(i, (shape, col))| scan_value(row, i, *shape, col.type_()))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(columns = columns.len(), rows = rows.len(), "scanned result set");
        Ok(RawQueryResult::new(columns, rows))
    }
}

/// Builds the wire connection config from the data source settings.
fn wire_config(settings: &DatasourceSettings) -> Result<tokio_postgres::Config> {
    if settings.is_secure_connection() {
        return Err(DatasourceError::ConnectionFailed(
            "TLS endpoints are not supported over the postgres wire".to_string(),
        ));
    }

    let address = ["grpc://", "postgres://", "postgresql://"]
        .iter()
        .find_map(|scheme| settings.endpoint.strip_prefix(scheme))
        .unwrap_or(settings.endpoint.as_str());
    let (host, port) = address.rsplit_once(':').ok_or_else(|| {
        DatasourceError::InvalidSettings(format!("endpoint {} has no port", settings.endpoint))
    })?;
    let port: u16 = port.parse().map_err(|_| {
        DatasourceError::InvalidSettings(format!("endpoint {} has an invalid port", settings.endpoint))
    })?;

    let user = if settings.user.is_empty() {
        DEFAULT_USER
    } else {
        settings.user.as_str()
    };

    let mut config = tokio_postgres::Config::new();
    config
        .host(host)
        .port(port)
        .dbname(&settings.db_location)
        .user(user)
        .connect_timeout(settings.connect_timeout()?);

    match settings.auth_kind {
        AuthKind::UserPassword => {
            config.password(&settings.secrets.password);
        }
        AuthKind::AccessToken => {
            config.password(&settings.secrets.access_token);
        }
        AuthKind::Anonymous => {}
        other => {
            return Err(DatasourceError::ConnectionFailed(format!(
                "{:?} authentication is not supported over the postgres wire",
                other
            )));
        }
    }

    Ok(config)
}

/// Maps a wire type to the database type name used for converter lookup.
/// Wire columns are always nullable. Unknown types keep their wire name.
fn column_type_name(ty: &Type) -> String {
    let known = [
        (Type::BOOL, "Bool"),
        (Type::INT2, "Int16"),
        (Type::INT4, "Int32"),
        (Type::INT8, "Int64"),
        (Type::FLOAT4, "Float"),
        (Type::FLOAT8, "Double"),
        (Type::NUMERIC, "Decimal"),
        (Type::DATE, "Date"),
        (Type::TIMESTAMP, "Timestamp"),
        (Type::TIMESTAMPTZ, "Timestamp"),
    ];
    known
        .iter()
        .find(|(wire, _)| wire == ty)
        .map(|(_, name)| format!("Optional<{}>", name))
        .unwrap_or_else(|| ty.name().to_string())
}

fn get<'a, T: FromSql<'a>>(row: &'a Row, index: usize) -> Result<Option<T>> {
    row.try_get::<_, Option<T>>(index)
        .map_err(|e| DatasourceError::QueryFailed(e.to_string()))
}

fn scan_time(row: &Row, index: usize, ty: &Type) -> Result<Option<DateTime<Utc>>> {
    if *ty == Type::TIMESTAMPTZ {
        get::<DateTime<Utc>>(row, index)
    } else if *ty == Type::TIMESTAMP {
        Ok(get::<NaiveDateTime>(row, index)?.map(|dt| dt.and_utc()))
    } else {
        Ok(get::<NaiveDate>(row, index)?
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc()))
    }
}

/// Scans one cell into the shape declared by its converter.
fn scan_value(row: &Row, index: usize, shape: ScanShape, ty: &Type) -> Result<ScanValue> {
    let scalar = match shape.kind() {
        ScalarKind::Bool => get::<bool>(row, index)?.map(Scalar::Bool),
        ScalarKind::Int16 => get::<i16>(row, index)?.map(Scalar::Int16),
        ScalarKind::Int32 => get::<i32>(row, index)?.map(Scalar::Int32),
        ScalarKind::Int64 => get::<i64>(row, index)?.map(Scalar::Int64),
        ScalarKind::Float => get::<f32>(row, index)?.map(Scalar::Float),
        ScalarKind::Double => get::<f64>(row, index)?.map(Scalar::Double),
        ScalarKind::Decimal => get::<Decimal>(row, index)?.map(Scalar::Decimal),
        ScalarKind::Time => scan_time(row, index, ty)?.map(Scalar::Time),
        other => {
            return Err(DatasourceError::QueryFailed(format!(
                "cannot scan {} from a {} column",
                other,
                ty.name()
            )))
        }
    };

    Ok(match shape {
        ScanShape::Optional(_) => ScanValue::Optional(scalar),
        ScanShape::Plain(_) => scalar.map(ScanValue::Plain).unwrap_or(ScanValue::Null),
    })
}
