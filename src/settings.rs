use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DatasourceError, Result};

const DEFAULT_CONNECT_TIMEOUT_SECS: &str = "10";
pub(crate) const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(60);

/// How the data source authenticates against the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AuthKind {
    #[default]
    ServiceAccountKey,
    AccessToken,
    UserPassword,
    MetaData,
    Anonymous,
}

/// Decrypted secrets stored alongside the data source.
#[derive(Clone, Default)]
pub struct SecretSettings {
    pub service_acc_auth_access_key: String,
    pub access_token: String,
    pub password: String,
    pub certificate: String,
}

impl SecretSettings {
    pub fn from_map(secrets: &HashMap<String, String>) -> Self {
        let get = |key: &str| secrets.get(key).cloned().unwrap_or_default();
        Self {
            service_acc_auth_access_key: get("serviceAccAuthAccessKey"),
            access_token: get("accessToken"),
            password: get("password"),
            certificate: get("certificate"),
        }
    }
}

// Secrets never show up in logs.
impl std::fmt::Debug for SecretSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSettings").finish_non_exhaustive()
    }
}

fn default_timeout() -> String {
    DEFAULT_CONNECT_TIMEOUT_SECS.to_string()
}

fn default_query_timeout() -> Duration {
    DEFAULT_QUERY_TIMEOUT
}

/// Data source configuration as saved by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceSettings {
    #[serde(default)]
    pub auth_kind: AuthKind,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub db_location: String,
    #[serde(default)]
    pub user: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: String,
    #[serde(skip)]
    pub secrets: SecretSettings,
    #[serde(skip, default = "default_query_timeout")]
    pub query_timeout: Duration,
}

impl Default for DatasourceSettings {
    fn default() -> Self {
        Self {
            auth_kind: AuthKind::default(),
            endpoint: String::new(),
            db_location: String::new(),
            user: String::new(),
            timeout: default_timeout(),
            secrets: SecretSettings::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl DatasourceSettings {
    /// Reads settings from the saved JSON blob and decrypted secrets.
    ///
    /// An empty blob yields defaults; anything else is validated.
    pub fn load(json_data: &[u8], secrets: &HashMap<String, String>) -> Result<Self> {
        if json_data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self {
                secrets: SecretSettings::from_map(secrets),
                ..Self::default()
            });
        }

        let mut settings: DatasourceSettings = serde_json::from_slice(json_data)?;
        settings.secrets = SecretSettings::from_map(secrets);
        if let Err(e) = settings.validate() {
            tracing::warn!(error = %e, "rejected data source settings");
            return Err(e);
        }
        Ok(settings)
    }

    /// Checks that the chosen auth kind has what it needs.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(invalid("endpoint should not be empty"));
        }
        if self.db_location.is_empty() {
            return Err(invalid("data base location should not be empty"));
        }
        match self.auth_kind {
            AuthKind::ServiceAccountKey if self.secrets.service_acc_auth_access_key.is_empty() => {
                return Err(invalid("service account auth access key should not be empty"));
            }
            AuthKind::AccessToken if self.secrets.access_token.is_empty() => {
                return Err(invalid("access token should not be empty"));
            }
            AuthKind::UserPassword if self.user.is_empty() || self.secrets.password.is_empty() => {
                return Err(invalid("username and password should not be empty"));
            }
            _ => {}
        }
        self.connect_timeout()?;
        Ok(())
    }

    /// Full connection string: endpoint followed by database location.
    pub fn dsn(&self) -> String {
        format!("{}{}", self.endpoint, self.db_location)
    }

    pub fn is_secure_connection(&self) -> bool {
        self.endpoint.starts_with("grpcs://")
    }

    pub fn connect_timeout(&self) -> Result<Duration> {
        self.timeout
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| invalid(&format!("timeout {} invalid: {}", self.timeout, e)))
    }
}

fn invalid(message: &str) -> DatasourceError {
    DatasourceError::InvalidSettings(message.to_string())
}
