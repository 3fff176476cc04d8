use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use northwind_sales_api::config::Args;
use northwind_sales_api::http::serve;
use northwind_sales_api::mssql::MssqlSessionProvider;
use northwind_sales_api::session::SessionProvider;
use northwind_sales_api::SalesDbError;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Database(#[from] SalesDbError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .init();

    let options = args.mssql_options();
    tracing::debug!("database options: {options:?}");

    let sessions: Arc<dyn SessionProvider> = Arc::new(MssqlSessionProvider::new(&options)?);
    serve(args.http_config(), sessions).await?;
    Ok(())
}
