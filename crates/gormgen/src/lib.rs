//! # gormgen
//!
//! Generate Go GORM model structs from live MySQL and PostgreSQL schemas.
//!
//! This library provides the core introspection and code-generation
//! pipeline:
//!
//! - **Introspection** of catalog metadata for MySQL and PostgreSQL
//! - **Type mapping** from engine types to Go types with import detection
//! - **Tag assembly** (primary key, auto-increment, column, type, default,
//!   nullability) in the fixed order GORM tooling expects
//! - **Naming normalization** (acronym-aware exported identifiers, table
//!   singularization)
//! - **Generation** of one model file per table, with batch support
//!
//! ## Example
//!
//! ```rust,no_run
//! use gormgen::{DbConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> gormgen::Result<()> {
//!     let session = Session::new();
//!     session
//!         .connect(DbConfig {
//!             engine: "mysql".to_string(),
//!             host: "localhost".to_string(),
//!             port: 3306,
//!             user: "root".to_string(),
//!             password: "secret".to_string(),
//!             database: "app".to_string(),
//!             schema: String::new(),
//!             ssl_mode: "disable".to_string(),
//!         })
//!         .await?;
//!
//!     let code = session.preview("users").await?;
//!     println!("{}", code);
//!     session.disconnect().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod generator;
pub mod session;

// Re-exports for convenient access
pub use crate::config::{Config, DbConfig, GeneratorConfig};
pub use crate::core::schema::{ColumnMetadata, TableMetadata};
pub use crate::core::traits::Introspect;
pub use crate::drivers::{AnyIntrospector, EngineKind, MysqlIntrospector, PostgresIntrospector};
pub use crate::error::{GenError, Result};
pub use crate::generator::{BatchResult, GeneratedSource, Generator};
pub use crate::session::{ColumnInfo, ConnectionStatus, Session};
