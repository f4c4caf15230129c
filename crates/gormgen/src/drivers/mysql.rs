//! MySQL/MariaDB introspector implementation.
//!
//! Implements the [`Introspect`] trait over the information_schema catalog
//! views. Uses SQLx for connection pooling and async query execution.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::Row;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::core::schema::{ColumnMetadata, TableMetadata};
use crate::core::traits::{run_cancellable, Introspect};
use crate::error::{GenError, Result};
use crate::generator::typemap::parse_enum_values;

/// Connection pool timeout.
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog queries are metadata-only; a small pool suffices.
const POOL_MAX_CONNECTIONS: u32 = 4;

/// MySQL/MariaDB introspector.
pub struct MysqlIntrospector {
    config: DbConfig,
    pool: Option<MySqlPool>,
    cancel: CancellationToken,
}

impl MysqlIntrospector {
    /// Create a disconnected introspector from configuration.
    pub fn new(config: DbConfig, cancel: CancellationToken) -> Self {
        Self {
            config,
            pool: None,
            cancel,
        }
    }

    fn pool(&self) -> Result<&MySqlPool> {
        self.pool.as_ref().ok_or(GenError::NotConnected)
    }

    fn scan_column(row: &MySqlRow) -> Result<ColumnMetadata> {
        let scan = |e: sqlx::Error| GenError::query("scanning MySQL column row", e);

        let name: String = row.try_get("COLUMN_NAME").map_err(scan)?;
        let data_type: String = row.try_get("DATA_TYPE").map_err(scan)?;
        let column_type: String = row.try_get("COLUMN_TYPE").map_err(scan)?;
        let is_nullable: String = row.try_get("IS_NULLABLE").map_err(scan)?;
        let column_key: Option<String> = row.try_get("COLUMN_KEY").map_err(scan)?;
        let extra: Option<String> = row.try_get("EXTRA").map_err(scan)?;
        let column_default: Option<String> = row.try_get("COLUMN_DEFAULT").map_err(scan)?;
        let char_max_length: Option<i64> = row.try_get("CHARACTER_MAXIMUM_LENGTH").map_err(scan)?;
        let numeric_precision: Option<i64> = row.try_get("NUMERIC_PRECISION").map_err(scan)?;
        let numeric_scale: Option<i64> = row.try_get("NUMERIC_SCALE").map_err(scan)?;
        let comment: Option<String> = row.try_get("COLUMN_COMMENT").map_err(scan)?;
        let ordinal_position: i64 = row.try_get("ORDINAL_POSITION").map_err(scan)?;

        let lowered_type = column_type.to_lowercase();

        let enum_values = if data_type.eq_ignore_ascii_case("enum") {
            parse_enum_values(&column_type)
        } else {
            Vec::new()
        };

        Ok(ColumnMetadata {
            name,
            data_type,
            raw_type: column_type,
            is_nullable: is_nullable == "YES",
            is_primary_key: column_key.as_deref() == Some("PRI"),
            is_auto_increment: extra
                .as_deref()
                .is_some_and(|e| e.contains("auto_increment")),
            default_value: column_default,
            enum_values,
            is_unsigned: lowered_type.contains("unsigned"),
            char_max_length,
            numeric_precision,
            numeric_scale,
            comment: comment.unwrap_or_default(),
            ordinal_position: ordinal_position as i32,
        })
    }
}

#[async_trait]
impl Introspect for MysqlIntrospector {
    async fn connect(&mut self) -> Result<()> {
        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .database(&self.config.database)
            .username(&self.config.user)
            .password(&self.config.password)
            .ssl_mode(MySqlSslMode::Preferred);

        let pool = MySqlPoolOptions::new()
            .max_connections(POOL_MAX_CONNECTIONS)
            .acquire_timeout(POOL_CONNECTION_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| GenError::connection("mysql", e))?;

        // Probe before exposing the pool; a failed connect stays disconnected.
        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| GenError::connection("mysql", e))?;

        info!(
            "Connected to MySQL: {}:{}/{}",
            self.config.host, self.config.port, self.config.database
        );

        self.pool = Some(pool);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            debug!("Closed MySQL connection pool");
        }
        Ok(())
    }

    async fn tables(&self) -> Result<Vec<String>> {
        let pool = self.pool()?;

        // CAST to CHAR to handle collation differences where information_schema
        // may return VARBINARY instead of VARCHAR.
        let query = r#"
            SELECT CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
        "#;

        let rows: Vec<MySqlRow> = run_cancellable(&self.cancel, async {
            sqlx::query(query)
                .bind(&self.config.database)
                .fetch_all(pool)
                .await
                .map_err(|e| GenError::query("listing MySQL tables", e))
        })
        .await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get("TABLE_NAME")
                .map_err(|e| GenError::query("scanning MySQL table name", e))?;
            tables.push(name);
        }

        debug!("Found {} table(s) in {}", tables.len(), self.config.database);
        Ok(tables)
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        let pool = self.pool()?;

        let query = r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(DATA_TYPE AS CHAR(255)) AS DATA_TYPE,
                CAST(COLUMN_TYPE AS CHAR(1024)) AS COLUMN_TYPE,
                CAST(IS_NULLABLE AS CHAR(3)) AS IS_NULLABLE,
                CAST(COLUMN_KEY AS CHAR(3)) AS COLUMN_KEY,
                CAST(EXTRA AS CHAR(255)) AS EXTRA,
                CAST(COLUMN_DEFAULT AS CHAR(1024)) AS COLUMN_DEFAULT,
                CAST(CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS CHARACTER_MAXIMUM_LENGTH,
                CAST(NUMERIC_PRECISION AS SIGNED) AS NUMERIC_PRECISION,
                CAST(NUMERIC_SCALE AS SIGNED) AS NUMERIC_SCALE,
                CAST(COLUMN_COMMENT AS CHAR(1024)) AS COLUMN_COMMENT,
                CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
        "#;

        let rows: Vec<MySqlRow> = run_cancellable(&self.cancel, async {
            sqlx::query(query)
                .bind(&self.config.database)
                .bind(table)
                .fetch_all(pool)
                .await
                .map_err(|e| GenError::query(format!("loading columns for table {}", table), e))
        })
        .await?;

        let columns: Vec<ColumnMetadata> = rows
            .iter()
            .map(Self::scan_column)
            .collect::<Result<_>>()?;

        debug!("Loaded {} column(s) for {}", columns.len(), table);
        Ok(columns)
    }

    async fn table_metadata(&self, table: &str) -> Result<TableMetadata> {
        let columns = self.columns(table).await?;

        let pool = self.pool()?;
        let query = r#"
            SELECT CAST(TABLE_COMMENT AS CHAR(2048)) AS TABLE_COMMENT
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        "#;

        let row: Option<MySqlRow> = run_cancellable(&self.cancel, async {
            sqlx::query(query)
                .bind(&self.config.database)
                .bind(table)
                .fetch_optional(pool)
                .await
                .map_err(|e| GenError::query(format!("loading comment for table {}", table), e))
        })
        .await?;

        let comment = match row {
            Some(row) => row
                .try_get::<Option<String>, _>("TABLE_COMMENT")
                .map_err(|e| GenError::query("scanning MySQL table comment", e))?
                .unwrap_or_default(),
            None => String::new(),
        };

        Ok(TableMetadata {
            schema: self.config.database.clone(),
            name: table.to_string(),
            columns,
            comment,
        })
    }
}
