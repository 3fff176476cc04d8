use super::client::MssqlClient;
use super::executor::execute_batch;
use crate::error::SalesDbError;

const BEGIN_SQL: &str = "BEGIN TRANSACTION";
const COMMIT_SQL: &str = "COMMIT TRANSACTION";
// a procedure that failed may already have rolled the transaction back
const ROLLBACK_SQL: &str = "IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION";

/// Transaction bookkeeping for one pooled SQL Server connection.
///
/// Dropping the owning connection mid-transaction is tolerated: the pool's pre-ping rolls
/// back whatever is still open before the connection is handed out again.
#[derive(Debug, Default)]
pub struct Tx {
    open: bool,
}

impl Tx {
    /// Begin a new transaction.
    ///
    /// # Errors
    ///
    /// Returns `SalesDbError::ExecutionError` if a transaction is already open, or the driver
    /// error if issuing BEGIN fails.
    pub async fn begin(&mut self, client: &mut MssqlClient) -> Result<(), SalesDbError> {
        if self.open {
            return Err(SalesDbError::ExecutionError(
                "transaction already open on this session".to_string(),
            ));
        }
        execute_batch(client, BEGIN_SQL).await?;
        self.open = true;
        Ok(())
    }

    /// Commit the transaction. A no-op when none is open.
    ///
    /// # Errors
    ///
    /// Returns the driver error if COMMIT fails; the transaction is then still open.
    pub async fn commit(&mut self, client: &mut MssqlClient) -> Result<(), SalesDbError> {
        if self.open {
            execute_batch(client, COMMIT_SQL).await?;
            self.open = false;
        }
        Ok(())
    }

    /// Roll back the transaction. A no-op when none is open.
    ///
    /// # Errors
    ///
    /// Returns the driver error if ROLLBACK fails.
    pub async fn rollback(&mut self, client: &mut MssqlClient) -> Result<(), SalesDbError> {
        if self.open {
            self.open = false;
            execute_batch(client, ROLLBACK_SQL).await?;
        }
        Ok(())
    }
}
