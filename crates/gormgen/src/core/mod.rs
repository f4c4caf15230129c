//! Core types shared across the introspection and generation layers.

pub mod schema;
pub mod traits;

pub use schema::{ColumnMetadata, TableMetadata};
pub use traits::Introspect;
