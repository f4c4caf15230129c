//! PostgreSQL introspector implementation.
//!
//! Implements the [`Introspect`] trait over information_schema plus the
//! pg_catalog views (primary keys and comments are not exposed on the
//! portable column view). Uses deadpool-postgres for connection pooling.

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use tokio_postgres::Config as PgConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DbConfig;
use crate::core::schema::{ColumnMetadata, TableMetadata};
use crate::core::traits::{run_cancellable, Introspect};
use crate::error::{GenError, Result};

use super::tls::SslMode;

/// Catalog queries are metadata-only; a small pool suffices.
const POOL_MAX_CONNECTIONS: usize = 4;

/// Namespaces reserved by the engine, excluded from schema listings.
const SYSTEM_SCHEMAS: &[&str] = &["pg_catalog", "information_schema", "pg_toast"];

/// PostgreSQL introspector.
pub struct PostgresIntrospector {
    config: DbConfig,
    pool: Option<Pool>,
    current_schema: String,
    cancel: CancellationToken,
}

impl PostgresIntrospector {
    /// Create a disconnected introspector from configuration.
    pub fn new(config: DbConfig, cancel: CancellationToken) -> Self {
        let current_schema = if config.schema.is_empty() {
            "public".to_string()
        } else {
            config.schema.clone()
        };
        Self {
            config,
            pool: None,
            current_schema,
            cancel,
        }
    }

    /// List available schemas, excluding system-reserved namespaces.
    pub async fn schemas(&self) -> Result<Vec<String>> {
        let client = self.client().await?;

        let query = r#"
            SELECT schema_name::text
            FROM information_schema.schemata
            WHERE schema_name::text <> ALL($1)
            ORDER BY schema_name
        "#;

        let rows = run_cancellable(&self.cancel, async {
            client
                .query(query, &[&SYSTEM_SCHEMAS])
                .await
                .map_err(|e| GenError::query("listing PostgreSQL schemas", e))
        })
        .await?;

        Ok(rows.iter().map(|row| row.get::<_, String>(0)).collect())
    }

    /// Select the schema that subsequent queries target.
    pub fn set_schema(&mut self, schema: &str) {
        self.current_schema = schema.to_string();
    }

    /// The currently selected schema.
    pub fn current_schema(&self) -> &str {
        &self.current_schema
    }

    async fn client(&self) -> Result<Object> {
        let pool = self.pool.as_ref().ok_or(GenError::NotConnected)?;
        pool.get()
            .await
            .map_err(|e| GenError::query("acquiring PostgreSQL connection", e))
    }

    /// Column names that participate in the table's primary key.
    ///
    /// Primary-key roles are not exposed on information_schema.columns, so
    /// this is a separate query against the index catalogs.
    async fn primary_key_columns(&self, table: &str) -> Result<Vec<String>> {
        let client = self.client().await?;
        let qualified = format!("{}.{}", self.current_schema, table);

        let query = r#"
            SELECT a.attname
            FROM pg_index i
            JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey)
            WHERE i.indrelid = $1::regclass AND i.indisprimary
        "#;

        let rows = run_cancellable(&self.cancel, async {
            client.query(query, &[&qualified]).await.map_err(|e| {
                GenError::query(format!("loading primary key for table {}", table), e)
            })
        })
        .await?;

        Ok(rows.iter().map(|row| row.get::<_, String>(0)).collect())
    }

    /// Normalize internal type aliases to common names.
    ///
    /// The portable column view alone does not disambiguate the engine's
    /// internal names (int4, float8, bpchar, ...).
    fn normalize_data_type(data_type: &str, udt_name: &str) -> String {
        match udt_name {
            "int2" => "smallint".to_string(),
            "int4" => "integer".to_string(),
            "int8" => "bigint".to_string(),
            "float4" => "real".to_string(),
            "float8" => "double precision".to_string(),
            "bool" => "boolean".to_string(),
            "varchar" | "bpchar" => "varchar".to_string(),
            "timestamptz" => "timestamptz".to_string(),
            "timestamp" => "timestamp".to_string(),
            "jsonb" => "jsonb".to_string(),
            "json" => "json".to_string(),
            "uuid" => "uuid".to_string(),
            "bytea" => "bytea".to_string(),
            _ => {
                // Array types surface as data_type 'ARRAY' with a
                // '_'-prefixed udt_name.
                if data_type == "ARRAY" {
                    if let Some(elem) = udt_name.strip_prefix('_') {
                        return format!("[]{}", elem);
                    }
                }
                data_type.to_string()
            }
        }
    }

    /// Reconstruct the full raw type with the size/precision suffixes the
    /// normalized view drops.
    fn build_raw_type(
        data_type: &str,
        udt_name: &str,
        char_max_length: Option<i64>,
        numeric_precision: Option<i64>,
        numeric_scale: Option<i64>,
    ) -> String {
        let normalized = Self::normalize_data_type(data_type, udt_name);

        if normalized == "varchar" || normalized == "character varying" {
            if let Some(len) = char_max_length {
                return format!("varchar({})", len);
            }
        }

        if normalized == "numeric" || normalized == "decimal" {
            if let Some(precision) = numeric_precision {
                return match numeric_scale {
                    Some(scale) if scale > 0 => format!("numeric({},{})", precision, scale),
                    _ => format!("numeric({})", precision),
                };
            }
        }

        normalized
    }
}

#[async_trait]
impl Introspect for PostgresIntrospector {
    async fn connect(&mut self) -> Result<()> {
        let mut pg_config = PgConfig::new();
        pg_config.host(&self.config.host);
        pg_config.port(self.config.port);
        pg_config.dbname(&self.config.database);
        pg_config.user(&self.config.user);
        pg_config.password(&self.config.password);

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let ssl_mode = SslMode::parse(&self.config.ssl_mode)?;
        let pool = match ssl_mode.connector()? {
            None => {
                let mgr = Manager::from_config(pg_config, tokio_postgres::NoTls, mgr_config);
                Pool::builder(mgr)
                    .max_size(POOL_MAX_CONNECTIONS)
                    .build()
                    .map_err(|e| GenError::connection("postgres", e))?
            }
            Some(tls) => {
                let mgr = Manager::from_config(pg_config, tls, mgr_config);
                Pool::builder(mgr)
                    .max_size(POOL_MAX_CONNECTIONS)
                    .build()
                    .map_err(|e| GenError::connection("postgres", e))?
            }
        };

        // Probe before exposing the pool; a failed connect stays disconnected.
        let client = pool
            .get()
            .await
            .map_err(|e| GenError::connection("postgres", e))?;
        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| GenError::connection("postgres", e))?;
        drop(client);

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            self.config.host, self.config.port, self.config.database
        );

        self.pool = Some(pool);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            pool.close();
            debug!("Closed PostgreSQL connection pool");
        }
        Ok(())
    }

    async fn tables(&self) -> Result<Vec<String>> {
        let client = self.client().await?;

        let query = r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = $1 AND table_type = 'BASE TABLE'
            ORDER BY table_name
        "#;

        let rows = run_cancellable(&self.cancel, async {
            client
                .query(query, &[&self.current_schema])
                .await
                .map_err(|e| GenError::query("listing PostgreSQL tables", e))
        })
        .await?;

        let tables: Vec<String> = rows.iter().map(|row| row.get::<_, String>(0)).collect();
        debug!(
            "Found {} table(s) in schema {}",
            tables.len(),
            self.current_schema
        );
        Ok(tables)
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnMetadata>> {
        let client = self.client().await?;

        let query = r#"
            SELECT
                c.column_name::text,
                c.data_type::text,
                c.udt_name::text,
                CASE WHEN c.is_nullable = 'YES' THEN true ELSE false END AS is_nullable,
                c.column_default::text,
                c.character_maximum_length::int8,
                c.numeric_precision::int8,
                c.numeric_scale::int8,
                c.ordinal_position::int4,
                COALESCE(pgd.description, '') AS column_comment
            FROM information_schema.columns c
            LEFT JOIN pg_catalog.pg_statio_all_tables st
                ON c.table_schema = st.schemaname AND c.table_name = st.relname
            LEFT JOIN pg_catalog.pg_description pgd
                ON pgd.objoid = st.relid AND pgd.objsubid = c.ordinal_position
            WHERE c.table_schema = $1 AND c.table_name = $2
            ORDER BY c.ordinal_position
        "#;

        let rows = run_cancellable(&self.cancel, async {
            client
                .query(query, &[&self.current_schema, &table])
                .await
                .map_err(|e| GenError::query(format!("loading columns for table {}", table), e))
        })
        .await?;

        let scan = |e: tokio_postgres::Error| GenError::query("scanning PostgreSQL column row", e);

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let column_name: String = row.try_get(0).map_err(scan)?;
            let data_type: String = row.try_get(1).map_err(scan)?;
            let udt_name: String = row.try_get(2).map_err(scan)?;
            let is_nullable: bool = row.try_get(3).map_err(scan)?;
            let column_default: Option<String> = row.try_get(4).map_err(scan)?;
            let char_max_length: Option<i64> = row.try_get(5).map_err(scan)?;
            let numeric_precision: Option<i64> = row.try_get(6).map_err(scan)?;
            let numeric_scale: Option<i64> = row.try_get(7).map_err(scan)?;
            let ordinal_position: i32 = row.try_get(8).map_err(scan)?;
            let comment: String = row.try_get(9).map_err(scan)?;

            let raw_type = Self::build_raw_type(
                &data_type,
                &udt_name,
                char_max_length,
                numeric_precision,
                numeric_scale,
            );

            // serial/bigserial columns surface as a nextval() default.
            let is_auto_increment = column_default
                .as_deref()
                .is_some_and(|d| d.contains("nextval"));

            columns.push(ColumnMetadata {
                name: column_name,
                data_type: Self::normalize_data_type(&data_type, &udt_name),
                raw_type,
                is_nullable,
                is_primary_key: false,
                is_auto_increment,
                default_value: column_default,
                enum_values: Vec::new(),
                is_unsigned: false,
                char_max_length,
                numeric_precision,
                numeric_scale,
                comment,
                ordinal_position,
            });
        }

        let pk_columns = self.primary_key_columns(table).await?;
        for column in &mut columns {
            if pk_columns.contains(&column.name) {
                column.is_primary_key = true;
            }
        }

        debug!("Loaded {} column(s) for {}", columns.len(), table);
        Ok(columns)
    }

    async fn table_metadata(&self, table: &str) -> Result<TableMetadata> {
        let columns = self.columns(table).await?;

        let client = self.client().await?;
        let qualified = format!("{}.{}", self.current_schema, table);

        let row = run_cancellable(&self.cancel, async {
            client
                .query_opt(
                    "SELECT obj_description($1::regclass, 'pg_class')",
                    &[&qualified],
                )
                .await
                .map_err(|e| GenError::query(format!("loading comment for table {}", table), e))
        })
        .await?;

        let comment = row
            .and_then(|row| row.get::<_, Option<String>>(0))
            .unwrap_or_default();

        Ok(TableMetadata {
            schema: self.current_schema.clone(),
            name: table.to_string(),
            columns,
            comment,
        })
    }
}
