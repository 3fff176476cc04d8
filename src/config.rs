use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::http::HttpServerConfig;
use crate::mssql::MssqlOptions;

/// Process configuration, read once at startup from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "HTTP API over the Northwind sales database")]
pub struct Args {
    /// Address the HTTP server binds to
    #[arg(long, env = "SALES_API_BIND", default_value = "0.0.0.0:8000")]
    pub bind: String,

    /// ADO.NET connection string; overrides the discrete --db-* settings
    #[arg(long, env = "SALES_API_DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "SALES_API_DB_HOST", default_value = "localhost")]
    pub db_host: String,

    #[arg(long, env = "SALES_API_DB_PORT")]
    pub db_port: Option<u16>,

    #[arg(long, env = "SALES_API_DB_NAME", default_value = "Northwind")]
    pub db_name: String,

    #[arg(long, env = "SALES_API_DB_USER", default_value = "sa")]
    pub db_user: String,

    #[arg(long, env = "SALES_API_DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Named SQL Server instance, resolved through SQL Browser
    #[arg(long, env = "SALES_API_DB_INSTANCE")]
    pub db_instance: Option<String>,

    /// Accept the server certificate without validation (self-signed installs)
    #[arg(
        long,
        env = "SALES_API_DB_TRUST_CERT",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub db_trust_cert: bool,

    /// Connections kept in the pool
    #[arg(long, env = "SALES_API_DB_POOL_SIZE", default_value_t = 10)]
    pub pool_size: usize,

    /// Extra connections allowed above --pool-size
    #[arg(long, env = "SALES_API_DB_MAX_OVERFLOW", default_value_t = 20)]
    pub max_overflow: usize,

    /// Seconds to wait for a pooled connection
    #[arg(long, env = "SALES_API_DB_POOL_TIMEOUT_SECS", default_value_t = 30)]
    pub pool_timeout_secs: u64,

    /// Directory served under /ui; created if missing
    #[arg(long, env = "SALES_API_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl Args {
    #[must_use]
    pub fn mssql_options(&self) -> MssqlOptions {
        let base = match &self.database_url {
            Some(url) => MssqlOptions::from_connection_string(url.clone()),
            None => MssqlOptions::new(
                self.db_host.clone(),
                self.db_name.clone(),
                self.db_user.clone(),
                self.db_password.clone(),
            )
            .with_port(self.db_port)
            .with_instance_name(self.db_instance.clone()),
        };
        base.with_trust_cert(self.db_trust_cert)
            .with_pool(self.pool_size, self.max_overflow)
            .with_timeout(Duration::from_secs(self.pool_timeout_secs))
    }

    #[must_use]
    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            bind: self.bind.clone(),
            static_dir: self.static_dir.clone(),
            ..HttpServerConfig::default()
        }
    }
}
