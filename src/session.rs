//! Scoped database sessions.
//!
//! A [`SessionProvider`] hands out one [`DatabaseSession`] per request. The helpers
//! [`read_only`] and [`transaction`] own the session for the duration of a unit of work and
//! release it on every exit path: `transaction` commits on success and rolls back on any
//! failure (including a failed commit) before the error is returned.

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::SalesDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// One checked-out connection.
#[async_trait]
pub trait DatabaseSession: Send {
    /// Open an explicit transaction.
    async fn begin(&mut self) -> Result<(), SalesDbError>;

    /// Executes a single row-returning statement and returns the result set.
    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SalesDbError>;

    /// Executes a single DML statement and returns the number of rows affected.
    async fn execute_dml(&mut self, query: &str, params: &[RowValues])
    -> Result<usize, SalesDbError>;

    async fn commit(&mut self) -> Result<(), SalesDbError>;

    async fn rollback(&mut self) -> Result<(), SalesDbError>;
}

/// Source of per-request sessions. Shared by every request; holds no per-request state.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, SalesDbError>;

    /// Stop handing out sessions and drop idle connections.
    fn close(&self) {}
}

/// Run `work` on a fresh session without a transaction. Nothing is rolled back.
///
/// # Errors
/// Returns the acquire error or whatever `work` returns.
pub async fn read_only<T, E, F>(provider: &dyn SessionProvider, work: F) -> Result<T, E>
where
    E: From<SalesDbError>,
    F: for<'s> FnOnce(&'s mut dyn DatabaseSession) -> BoxFuture<'s, Result<T, E>>,
{
    let mut session = provider.acquire().await?;
    work(session.as_mut()).await
}

/// Run `work` inside a transaction on a fresh session.
///
/// # Errors
/// Returns the acquire/begin error, the error from `work`, or the commit error. In the last
/// two cases the transaction has been rolled back.
pub async fn transaction<T, E, F>(provider: &dyn SessionProvider, work: F) -> Result<T, E>
where
    E: From<SalesDbError>,
    F: for<'s> FnOnce(&'s mut dyn DatabaseSession) -> BoxFuture<'s, Result<T, E>>,
{
    let mut session = provider.acquire().await?;
    session.begin().await?;

    match work(session.as_mut()).await {
        Ok(value) => match session.commit().await {
            Ok(()) => Ok(value),
            Err(commit_err) => {
                tracing::warn!("commit failed, rolling back: {commit_err}");
                rollback_quietly(session.as_mut()).await;
                Err(commit_err.into())
            }
        },
        Err(err) => {
            rollback_quietly(session.as_mut()).await;
            Err(err)
        }
    }
}

async fn rollback_quietly(session: &mut dyn DatabaseSession) {
    if let Err(e) = session.rollback().await {
        // the pool's pre-ping rolls back anything still open on next checkout
        tracing::error!("rollback failed: {e}");
    }
}
