use thiserror::Error;

/// Errors raised while talking to SQL Server or shaping its rows.
///
/// Driver errors are carried transparently so their text reaches the caller verbatim.
#[derive(Debug, Error)]
pub enum SalesDbError {
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[error("Connection pool error: {0}")]
    PoolError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Row mapping error: {0}")]
    MappingError(String),
}

impl From<deadpool::managed::PoolError<tiberius::error::Error>> for SalesDbError {
    fn from(err: deadpool::managed::PoolError<tiberius::error::Error>) -> Self {
        match err {
            deadpool::managed::PoolError::Backend(e) => SalesDbError::MssqlError(e),
            other => SalesDbError::PoolError(other.to_string()),
        }
    }
}
