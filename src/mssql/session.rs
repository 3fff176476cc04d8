use async_trait::async_trait;
use deadpool::managed::Object;

use super::config::{MssqlManager, MssqlOptions, MssqlPool};
use super::executor::{execute_dml, execute_select};
use super::transaction::Tx;
use crate::error::SalesDbError;
use crate::results::ResultSet;
use crate::session::{DatabaseSession, SessionProvider};
use crate::types::RowValues;

/// Session provider backed by the SQL Server pool.
///
/// Built once at startup and shared through application state; [`SessionProvider::close`]
/// releases the pool at shutdown.
#[derive(Clone)]
pub struct MssqlSessionProvider {
    pool: MssqlPool,
}

impl std::fmt::Debug for MssqlSessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlSessionProvider")
            .field("status", &self.pool.status())
            .finish()
    }
}

impl MssqlSessionProvider {
    /// Build the pool described by `options`.
    ///
    /// # Errors
    /// Returns `SalesDbError::ConfigError` if the pool cannot be configured.
    pub fn new(options: &MssqlOptions) -> Result<Self, SalesDbError> {
        let pool = options.build_pool()?;
        tracing::info!(
            pool_size = options.pool_size,
            max_overflow = options.max_overflow,
            "SQL Server pool configured"
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl SessionProvider for MssqlSessionProvider {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, SalesDbError> {
        let conn = self.pool.get().await.map_err(|e| {
            tracing::error!("could not check out a SQL Server connection: {e}");
            SalesDbError::from(e)
        })?;
        Ok(Box::new(MssqlSession {
            conn,
            tx: Tx::default(),
        }))
    }

    fn close(&self) {
        self.pool.close();
    }
}

/// A pooled SQL Server connection checked out for one request.
pub struct MssqlSession {
    conn: Object<MssqlManager>,
    tx: Tx,
}

#[async_trait]
impl DatabaseSession for MssqlSession {
    async fn begin(&mut self) -> Result<(), SalesDbError> {
        self.tx.begin(&mut self.conn).await
    }

    async fn execute_select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SalesDbError> {
        execute_select(&mut self.conn, query, params).await
    }

    async fn execute_dml(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<usize, SalesDbError> {
        execute_dml(&mut self.conn, query, params).await
    }

    async fn commit(&mut self) -> Result<(), SalesDbError> {
        self.tx.commit(&mut self.conn).await
    }

    async fn rollback(&mut self) -> Result<(), SalesDbError> {
        self.tx.rollback(&mut self.conn).await
    }
}
