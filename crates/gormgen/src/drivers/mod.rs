//! Engine drivers and variant selection.
//!
//! The supported engines form a closed set: a selector string picks one of
//! the [`AnyIntrospector`] variants at construction time, and there is no
//! fallback between them.

pub mod mysql;
pub mod postgres;
pub mod tls;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::DbConfig;
use crate::core::schema::{ColumnMetadata, TableMetadata};
use crate::core::traits::Introspect;
use crate::error::{GenError, Result};

pub use mysql::MysqlIntrospector;
pub use postgres::PostgresIntrospector;

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// MySQL/MariaDB family.
    Mysql,
    /// PostgreSQL family.
    Postgres,
}

impl EngineKind {
    /// Engine identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Mysql => "mysql",
            EngineKind::Postgres => "postgres",
        }
    }
}

impl FromStr for EngineKind {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(EngineKind::Mysql),
            "postgres" | "postgresql" => Ok(EngineKind::Postgres),
            other => Err(GenError::UnsupportedEngine(other.to_string())),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of introspector variants.
pub enum AnyIntrospector {
    Mysql(MysqlIntrospector),
    Postgres(PostgresIntrospector),
}

impl AnyIntrospector {
    /// Build a disconnected introspector from configuration.
    ///
    /// Fails with [`GenError::UnsupportedEngine`] for an unrecognized
    /// engine selector.
    pub fn new(config: &DbConfig, cancel: CancellationToken) -> Result<Self> {
        match config.engine.parse::<EngineKind>()? {
            EngineKind::Mysql => Ok(AnyIntrospector::Mysql(MysqlIntrospector::new(
                config.clone(),
                cancel,
            ))),
            EngineKind::Postgres => Ok(AnyIntrospector::Postgres(PostgresIntrospector::new(
                config.clone(),
                cancel,
            ))),
        }
    }

    /// The engine this introspector targets.
    pub fn engine(&self) -> EngineKind {
        match self {
            AnyIntrospector::Mysql(_) => EngineKind::Mysql,
            AnyIntrospector::Postgres(_) => EngineKind::Postgres,
        }
    }

    /// List available schemas.
    ///
    /// Empty for engines without a schema concept.
    pub async fn schemas(&self) -> Result<Vec<String>> {
        match self {
            AnyIntrospector::Mysql(_) => Ok(Vec::new()),
            AnyIntrospector::Postgres(pg) => pg.schemas().await,
        }
    }

    /// Select the schema subsequent queries target.
    ///
    /// Ignored for engines without a schema concept.
    pub fn set_schema(&mut self, schema: &str) {
        if let AnyIntrospector::Postgres(pg) = self {
            pg.set_schema(schema);
        }
    }

    /// The currently targeted namespace: the selected schema for
    /// PostgreSQL, the database name for MySQL.
    pub fn current_schema(&self, config: &DbConfig) -> String {
        match self {
            AnyIntrospector::Mysql(_) => config.database.clone(),
            AnyIntrospector::Postgres(pg) => pg.current_schema().to_string(),
        }
    }
}

#[async_trait]
impl Introspect for AnyIntrospector {
    async fn connect(&mut self) -> Result<()> {
        match self {
            AnyIntrospector::Mysql(inner) => inner.connect().await,
            AnyIntrospector::Postgres(inner) => inner.connect().await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            AnyIntrospector::Mysql(inner) => inner.close().await,
            AnyIntrospector::Postgres(inner) => inner.close().await,
        }
    }

    async fn tables(&self) -> Result<Vec<String>> {
        match self {
            AnyIntrospector::Mysql(inner) => inner.tables().await,
            AnyIntrospector::Postgres(inner) => inner.tables().await,
        }
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        match self {
            AnyIntrospector::Mysql(inner) => inner.columns(table).await,
            AnyIntrospector::Postgres(inner) => inner.columns(table).await,
        }
    }

    async fn table_metadata(&self, table: &str) -> Result<TableMetadata> {
        match self {
            AnyIntrospector::Mysql(inner) => inner.table_metadata(table).await,
            AnyIntrospector::Postgres(inner) => inner.table_metadata(table).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(engine: &str) -> DbConfig {
        DbConfig {
            engine: engine.to_string(),
            host: "localhost".to_string(),
            port: 5432,
            user: "user".to_string(),
            password: "password".to_string(),
            database: "app".to_string(),
            schema: "public".to_string(),
            ssl_mode: "disable".to_string(),
        }
    }

    #[test]
    fn test_engine_kind_parsing() {
        assert_eq!("mysql".parse::<EngineKind>().unwrap(), EngineKind::Mysql);
        assert_eq!(
            "postgres".parse::<EngineKind>().unwrap(),
            EngineKind::Postgres
        );
        assert_eq!(
            "postgresql".parse::<EngineKind>().unwrap(),
            EngineKind::Postgres
        );
        assert_eq!("MySQL".parse::<EngineKind>().unwrap(), EngineKind::Mysql);
        assert!(matches!(
            "sqlite".parse::<EngineKind>(),
            Err(GenError::UnsupportedEngine(_))
        ));
    }

    #[test]
    fn test_factory_selects_variant() {
        let intro = AnyIntrospector::new(&config("mysql"), CancellationToken::new()).unwrap();
        assert_eq!(intro.engine(), EngineKind::Mysql);

        let intro = AnyIntrospector::new(&config("postgresql"), CancellationToken::new()).unwrap();
        assert_eq!(intro.engine(), EngineKind::Postgres);

        assert!(AnyIntrospector::new(&config("oracle"), CancellationToken::new()).is_err());
    }

    #[tokio::test]
    async fn test_disconnected_queries_fail_with_not_connected() {
        let intro = AnyIntrospector::new(&config("mysql"), CancellationToken::new()).unwrap();
        assert!(matches!(intro.tables().await, Err(GenError::NotConnected)));
        assert!(matches!(
            intro.columns("users").await,
            Err(GenError::NotConnected)
        ));

        let intro = AnyIntrospector::new(&config("postgres"), CancellationToken::new()).unwrap();
        assert!(matches!(
            intro.table_metadata("users").await,
            Err(GenError::NotConnected)
        ));
        assert!(matches!(intro.schemas().await, Err(GenError::NotConnected)));
    }

    #[tokio::test]
    async fn test_close_is_idempotent_when_disconnected() {
        let mut intro = AnyIntrospector::new(&config("mysql"), CancellationToken::new()).unwrap();
        assert!(intro.close().await.is_ok());
        assert!(intro.close().await.is_ok());
    }

    #[tokio::test]
    async fn test_mysql_has_no_schema_concept() {
        let cfg = config("mysql");
        let mut intro = AnyIntrospector::new(&cfg, CancellationToken::new()).unwrap();
        assert!(intro.schemas().await.unwrap().is_empty());
        intro.set_schema("other");
        assert_eq!(intro.current_schema(&cfg), "app");
    }

    #[tokio::test]
    async fn test_postgres_schema_selection() {
        let cfg = config("postgres");
        let mut intro = AnyIntrospector::new(&cfg, CancellationToken::new()).unwrap();
        assert_eq!(intro.current_schema(&cfg), "public");
        intro.set_schema("reporting");
        assert_eq!(intro.current_schema(&cfg), "reporting");
    }
}
