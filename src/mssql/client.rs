use tiberius::{Client, Config, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// Type alias for SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Open a single SQL Server connection.
///
/// Named instances are resolved through the SQL Browser service; everything else connects
/// straight to `host:port`.
///
/// # Errors
/// Returns the driver error if the TCP connect or the TDS login fails.
pub async fn connect(config: Config, use_browser: bool) -> Result<MssqlClient, tiberius::error::Error> {
    let tcp = if use_browser {
        TcpStream::connect_named(&config).await?
    } else {
        TcpStream::connect(config.get_addr()).await?
    };
    tcp.set_nodelay(true)?;

    Client::connect(config, tcp.compat_write()).await
}
