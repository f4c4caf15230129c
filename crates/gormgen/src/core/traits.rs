//! Core trait for engine-agnostic schema introspection.
//!
//! [`Introspect`] is the capability set the generator consumes: session
//! control plus the three catalog reads. Engine variants live in the
//! `drivers` module and are selected at construction time from a
//! configuration value; there is no fallback between variants.

use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::core::schema::{ColumnMetadata, TableMetadata};
use crate::error::{GenError, Result};

/// Read-only schema introspection for one database engine.
///
/// All query operations fail with [`GenError::NotConnected`] until
/// [`connect`](Introspect::connect) has succeeded. Query failures are
/// wrapped with operation context and surfaced immediately; there are no
/// retries — the remedy for a transient engine error is an explicit
/// reconnect by the caller.
#[async_trait]
pub trait Introspect: Send + Sync {
    /// Establish the engine session.
    ///
    /// Fails with [`GenError::Connection`] if the handshake or
    /// authentication fails, leaving the introspector disconnected.
    async fn connect(&mut self) -> Result<()>;

    /// Release the session. Idempotent if already closed.
    async fn close(&mut self) -> Result<()>;

    /// List base-table names in lexicographic order.
    ///
    /// Views and system catalogs are excluded.
    async fn tables(&self) -> Result<Vec<String>>;

    /// Fetch column metadata for a table, in ordinal order.
    async fn columns(&self, table: &str) -> Result<Vec<ColumnMetadata>>;

    /// Fetch full table metadata (columns plus table-level comment).
    async fn table_metadata(&self, table: &str) -> Result<TableMetadata>;
}

/// Race a catalog query against a cancellation token.
///
/// Cancellation surfaces as [`GenError::Cancelled`], distinct from a query
/// failure, so callers can tell an aborted introspection from a broken one.
pub(crate) async fn run_cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GenError::Cancelled),
        res = fut => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_cancellable_passes_through() {
        let token = CancellationToken::new();
        let result = run_cancellable(&token, async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_run_cancellable_cancelled_token_wins() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<i32> = run_cancellable(&token, async {
            tokio::task::yield_now().await;
            Ok(1)
        })
        .await;
        assert!(matches!(result, Err(GenError::Cancelled)));
    }
}
