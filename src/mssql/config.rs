use std::fmt;
use std::time::Duration;

use deadpool::managed::{Manager, Metrics, Pool, RecycleError, RecycleResult};
use tiberius::{AuthMethod, Config as TiberiusConfig};

use super::client::{MssqlClient, connect};
use crate::error::SalesDbError;

/// Connection pool handing out SQL Server clients.
pub type MssqlPool = Pool<MssqlManager>;

const DEFAULT_PORT: u16 = 1433;

/// Runs on every checkout of a previously used connection: undoes work an abandoned
/// request left open, then proves the connection is alive.
const PRE_PING_SQL: &str = "IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION; SELECT 1";

/// Options for configuring an MSSQL pool.
#[derive(Clone)]
pub struct MssqlOptions {
    pub server: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: Option<u16>,
    pub instance_name: Option<String>,
    /// ADO.NET connection string; replaces the discrete fields above when present.
    pub connection_string: Option<String>,
    pub trust_cert: bool,
    /// Connections kept for steady load.
    pub pool_size: usize,
    /// Extra connections allowed above `pool_size` under burst.
    pub max_overflow: usize,
    /// Upper bound on waiting for a free connection or opening a new one.
    pub timeout: Duration,
}

impl fmt::Debug for MssqlOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlOptions")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("port", &self.port)
            .field("instance_name", &self.instance_name)
            .field("connection_string", &self.connection_string.as_ref().map(|_| "<redacted>"))
            .field("trust_cert", &self.trust_cert)
            .field("pool_size", &self.pool_size)
            .field("max_overflow", &self.max_overflow)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl MssqlOptions {
    #[must_use]
    pub fn new(server: String, database: String, user: String, password: String) -> Self {
        Self {
            server,
            database,
            user,
            password,
            port: None,
            instance_name: None,
            connection_string: None,
            trust_cert: true,
            pool_size: 10,
            max_overflow: 20,
            timeout: Duration::from_secs(30),
        }
    }

    /// Options taken entirely from an ADO.NET connection string.
    #[must_use]
    pub fn from_connection_string(connection_string: String) -> Self {
        Self {
            connection_string: Some(connection_string),
            ..Self::new(String::new(), String::new(), String::new(), String::new())
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_instance_name(mut self, instance_name: Option<String>) -> Self {
        self.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn with_pool(mut self, pool_size: usize, max_overflow: usize) -> Self {
        self.pool_size = pool_size;
        self.max_overflow = max_overflow;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_trust_cert(mut self, trust_cert: bool) -> Self {
        self.trust_cert = trust_cert;
        self
    }

    /// deadpool has a single bound, so overflow is folded into it.
    #[must_use]
    pub fn max_connections(&self) -> usize {
        (self.pool_size + self.max_overflow).max(1)
    }

    /// Build the tiberius connection configuration.
    ///
    /// # Errors
    /// Returns `SalesDbError::ConfigError` if the connection string cannot be parsed.
    pub fn tiberius_config(&self) -> Result<TiberiusConfig, SalesDbError> {
        if let Some(ado) = &self.connection_string {
            let mut config = TiberiusConfig::from_ado_string(ado).map_err(|e| {
                SalesDbError::ConfigError(format!("invalid SQL Server connection string: {e}"))
            })?;
            if self.trust_cert {
                config.trust_cert();
            }
            return Ok(config);
        }

        if self.server.is_empty() {
            return Err(SalesDbError::ConfigError(
                "SQL Server host is required".to_string(),
            ));
        }

        let mut config = TiberiusConfig::new();
        config.host(&self.server);
        config.database(&self.database);
        config.port(self.port.unwrap_or(DEFAULT_PORT));
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        if let Some(instance) = &self.instance_name {
            config.instance_name(instance);
        }
        if self.trust_cert {
            config.trust_cert();
        }
        Ok(config)
    }

    /// Build the pool. No connection is opened until the first checkout.
    ///
    /// # Errors
    /// Returns `SalesDbError::ConfigError` if the configuration or pool cannot be built.
    pub fn build_pool(&self) -> Result<MssqlPool, SalesDbError> {
        let manager = MssqlManager {
            config: self.tiberius_config()?,
            use_browser: self.instance_name.is_some(),
        };

        Pool::builder(manager)
            .max_size(self.max_connections())
            .wait_timeout(Some(self.timeout))
            .create_timeout(Some(self.timeout))
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                SalesDbError::ConfigError(format!("Failed to create SQL Server pool: {e}"))
            })
    }
}

/// Manager for SQL Server connections (used with deadpool)
pub struct MssqlManager {
    config: TiberiusConfig,
    use_browser: bool,
}

impl fmt::Debug for MssqlManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlManager")
            .field("addr", &self.config.get_addr())
            .field("use_browser", &self.use_browser)
            .finish()
    }
}

impl Manager for MssqlManager {
    type Type = MssqlClient;
    type Error = tiberius::error::Error;

    async fn create(&self) -> Result<MssqlClient, tiberius::error::Error> {
        connect(self.config.clone(), self.use_browser).await
    }

    async fn recycle(
        &self,
        client: &mut MssqlClient,
        _metrics: &Metrics,
    ) -> RecycleResult<tiberius::error::Error> {
        let stream = client
            .simple_query(PRE_PING_SQL)
            .await
            .map_err(RecycleError::Backend)?;
        stream.into_results().await.map_err(|e| {
            tracing::warn!("discarding SQL Server connection that failed pre-ping: {e}");
            RecycleError::Backend(e)
        })?;
        Ok(())
    }
}
