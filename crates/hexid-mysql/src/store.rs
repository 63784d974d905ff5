use crate::{BoxError, Error, NormalizedConfig, Result};
use mysql::prelude::Queryable;
use mysql::{Opts, OptsBuilder, Pool};
use std::time::Duration;

/// The narrow capability the allocator needs from a persistent store.
///
/// Both operations are invoked only during machine-id resolution, never on
/// the id-generation path. Implementations are free to fail with whatever
/// error their driver produces; the allocator logs, counts, and re-surfaces
/// the last one.
pub trait CounterStore {
    /// Idempotent create-if-absent of the counter table: a single
    /// auto-incrementing integer primary key column.
    fn ensure_counter_table(&self, table: &str) -> Result<(), BoxError>;

    /// Inserts a row with no explicit values and returns the generated
    /// primary-key value.
    fn allocate_next(&self, table: &str) -> Result<u64, BoxError>;
}

/// Builds a store client from a validated configuration.
///
/// The allocator calls this once per configuration change; a configuration
/// equal to the active one never reaches the connector.
pub trait StoreConnector {
    type Store: CounterStore;

    fn connect(&self, config: &NormalizedConfig) -> Result<Self::Store>;
}

/// [`CounterStore`] over a synchronous MySQL connection pool.
///
/// Resolution is a rare, blocking startup operation, so a synchronous
/// client is the whole requirement; no async runtime is involved.
pub struct MySqlStore {
    pool: Pool,
}

impl MySqlStore {
    /// Opens a pool for the configured endpoint.
    ///
    /// The pool connects lazily: endpoint parsing fails here, while network
    /// failures surface from the [`CounterStore`] operations where the
    /// allocator's retry budget applies.
    pub fn connect(config: &NormalizedConfig) -> Result<Self> {
        let endpoint = format!("mysql://{}", config.uri);
        let base = Opts::from_url(&endpoint).map_err(|e| Error::Endpoint {
            source: Box::new(e),
        })?;

        // Credentials are applied through the builder rather than spliced
        // into the URL, so they never need URL escaping.
        let opts = OptsBuilder::from_opts(base)
            .user(Some(config.username.clone()))
            .pass(Some(config.password.clone()))
            .tcp_connect_timeout(Some(Duration::from_millis(config.connect_timeout_ms)));

        let pool = Pool::new(Opts::from(opts)).map_err(|e| Error::Endpoint {
            source: Box::new(e),
        })?;
        Ok(Self { pool })
    }
}

impl CounterStore for MySqlStore {
    fn ensure_counter_table(&self, table: &str) -> Result<(), BoxError> {
        let mut conn = self.pool.get_conn()?;
        conn.query_drop(format!(
            "CREATE TABLE IF NOT EXISTS `{table}` \
             (`id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, PRIMARY KEY (`id`)) \
             ENGINE=InnoDB"
        ))?;
        Ok(())
    }

    fn allocate_next(&self, table: &str) -> Result<u64, BoxError> {
        let mut conn = self.pool.get_conn()?;
        let result = conn.query_iter(format!("INSERT INTO `{table}` () VALUES ()"))?;
        result
            .last_insert_id()
            .ok_or_else(|| BoxError::from("store did not return a generated key"))
    }
}

/// The default [`StoreConnector`], producing [`MySqlStore`] clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlConnector;

impl StoreConnector for MySqlConnector {
    type Store = MySqlStore;

    fn connect(&self, config: &NormalizedConfig) -> Result<Self::Store> {
        MySqlStore::connect(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MYSQL_KIND, StoreConfig};

    fn normalized(uri: &str) -> NormalizedConfig {
        StoreConfig::new(MYSQL_KIND, uri, "svc", "secret")
            .normalize()
            .unwrap()
    }

    #[test]
    fn endpoint_parsing_rejects_garbage() {
        let config = normalized("not a uri at all");
        assert!(matches!(
            MySqlStore::connect(&config),
            Err(Error::Endpoint { .. })
        ));
    }

    #[test]
    fn credentials_and_timeout_come_from_config() {
        let config = NormalizedConfig {
            connect_timeout_ms: 250,
            ..normalized("db.internal:3306/ids")
        };

        let base = Opts::from_url(&format!("mysql://{}", config.uri)).unwrap();
        let opts = Opts::from(
            OptsBuilder::from_opts(base)
                .user(Some(config.username.clone()))
                .pass(Some(config.password.clone()))
                .tcp_connect_timeout(Some(Duration::from_millis(config.connect_timeout_ms))),
        );

        assert_eq!(opts.get_user(), Some("svc"));
        assert_eq!(opts.get_pass(), Some("secret"));
        assert_eq!(opts.get_db_name(), Some("ids"));
        assert_eq!(
            opts.get_tcp_connect_timeout(),
            Some(Duration::from_millis(250))
        );
    }
}
