use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Store kind literal for MySQL, the only kind currently supported.
pub const MYSQL_KIND: &str = "mysql";

/// Counter table used when the configuration leaves `table_name` blank.
pub const DEFAULT_TABLE_NAME: &str = "_distribute_machineId";

/// TCP connect timeout applied when the configuration leaves
/// `connect_timeout_ms` at zero.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Connection settings for the shared counter store.
///
/// This is a plain value: resolving twice with an equal configuration is a
/// no-op (the allocator returns its cached machine id without reconnecting),
/// while any differing field triggers re-initialization.
///
/// # Example
///
/// ```
/// use hexid_mysql::StoreConfig;
///
/// let config = StoreConfig {
///     retry_count: 2,
///     ..StoreConfig::new("mysql", "db.internal:3306/ids", "svc", "secret")
/// };
/// assert_eq!(config.table_name, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store kind; only [`MYSQL_KIND`] is currently supported.
    pub kind: String,
    /// Endpoint in `host[:port]/dbname` form.
    pub uri: String,
    /// Store username.
    pub username: String,
    /// Store password.
    pub password: String,
    /// Counter table name; blank means [`DEFAULT_TABLE_NAME`].
    #[serde(default)]
    pub table_name: String,
    /// Additional allocation attempts after the first failure.
    #[serde(default)]
    pub retry_count: u32,
    /// TCP connect timeout in milliseconds; zero means
    /// [`DEFAULT_CONNECT_TIMEOUT_MS`].
    #[serde(default)]
    pub connect_timeout_ms: u64,
}

impl StoreConfig {
    /// Creates a configuration with default table name, retry count, and
    /// connect timeout.
    pub fn new(
        kind: impl Into<String>,
        uri: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            uri: uri.into(),
            username: username.into(),
            password: password.into(),
            table_name: String::new(),
            retry_count: 0,
            connect_timeout_ms: 0,
        }
    }

    /// Validates required fields and applies defaults.
    ///
    /// Fails with a configuration error before any I/O is attempted.
    pub fn normalize(&self) -> Result<NormalizedConfig> {
        for (field, value) in [
            ("kind", &self.kind),
            ("uri", &self.uri),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(Error::MissingConfig { field });
            }
        }
        if self.kind != MYSQL_KIND {
            return Err(Error::UnsupportedStoreKind {
                kind: self.kind.clone(),
            });
        }

        let table_name = match self.table_name.trim() {
            "" => DEFAULT_TABLE_NAME,
            trimmed => trimmed,
        };
        let connect_timeout_ms = if self.connect_timeout_ms == 0 {
            DEFAULT_CONNECT_TIMEOUT_MS
        } else {
            self.connect_timeout_ms
        };

        Ok(NormalizedConfig {
            kind: self.kind.clone(),
            uri: self.uri.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            table_name: table_name.to_owned(),
            retry_count: self.retry_count,
            connect_timeout_ms,
        })
    }
}

/// A validated [`StoreConfig`] with all defaults applied.
///
/// Equality on this type is what the allocator's idempotence contract is
/// defined over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedConfig {
    pub kind: String,
    pub uri: String,
    pub username: String,
    pub password: String,
    pub table_name: String,
    pub retry_count: u32,
    pub connect_timeout_ms: u64,
}
