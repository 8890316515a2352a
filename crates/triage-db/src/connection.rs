//! SurrealDB connection management.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Connection settings for the ticket store.
///
/// Defaults target a local SurrealDB instance; each field can be
/// overridden through a `TRIAGE_DB_*` environment variable (see
/// [`DbConfig::from_env`]).
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address of the SurrealDB server.
    pub url: String,
    /// Namespace the helpdesk data lives under.
    pub namespace: String,
    /// Database name within the namespace.
    pub database: String,
    /// Root username.
    pub username: String,
    /// Root password.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "triage".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build a config from the process environment.
    ///
    /// Recognized variables: `TRIAGE_DB_URL`, `TRIAGE_DB_NAMESPACE`,
    /// `TRIAGE_DB_DATABASE`, `TRIAGE_DB_USERNAME`,
    /// `TRIAGE_DB_PASSWORD`. Unset variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: get("TRIAGE_DB_URL").unwrap_or(defaults.url),
            namespace: get("TRIAGE_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: get("TRIAGE_DB_DATABASE").unwrap_or(defaults.database),
            username: get("TRIAGE_DB_USERNAME").unwrap_or(defaults.username),
            password: get("TRIAGE_DB_PASSWORD").unwrap_or(defaults.password),
        }
    }
}

/// A live connection to the ticket store.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open a WebSocket connection, sign in as root, and select the
    /// configured namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "connected to ticket store"
        );

        Ok(Self { db })
    }

    /// The underlying SurrealDB client, for migrations and repository
    /// construction.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_win_over_defaults() {
        let config = DbConfig::from_lookup(|key| match key {
            "TRIAGE_DB_URL" => Some("db.internal:9000".into()),
            "TRIAGE_DB_NAMESPACE" => Some("staging".into()),
            _ => None,
        });

        assert_eq!(config.url, "db.internal:9000");
        assert_eq!(config.namespace, "staging");
        // Untouched fields keep their defaults.
        assert_eq!(config.database, "main");
        assert_eq!(config.username, "root");
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = DbConfig::from_lookup(|_| None);
        let defaults = DbConfig::default();

        assert_eq!(config.url, defaults.url);
        assert_eq!(config.namespace, defaults.namespace);
        assert_eq!(config.database, defaults.database);
    }
}
