//! Backend entry point: tracing init, configuration, server startup.

mod server;

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use server::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    server::run(config).await
}
