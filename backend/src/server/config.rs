//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

/// Environment variable naming the listen address.
const BIND_ADDR_VAR: &str = "BIND_ADDR";
/// Environment variable naming the PostgreSQL connection string.
const DATABASE_URL_VAR: &str = "DATABASE_URL";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9090";

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: String,
    pub(crate) pool_max_size: u32,
}

impl ServerConfig {
    /// Construct a server configuration from explicit values.
    pub fn new(bind_addr: SocketAddr, database_url: impl Into<String>) -> Self {
        Self {
            bind_addr,
            database_url: database_url.into(),
            pool_max_size: 10,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` is required; `BIND_ADDR` falls back to `0.0.0.0:9090`.
    pub fn from_env() -> std::io::Result<Self> {
        let raw_addr =
            std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = raw_addr.parse().map_err(|err| {
            std::io::Error::other(format!("{BIND_ADDR_VAR} is not a socket address: {err}"))
        })?;

        let database_url = std::env::var(DATABASE_URL_VAR)
            .map_err(|_| std::io::Error::other(format!("{DATABASE_URL_VAR} must be set")))?;

        Ok(Self::new(bind_addr, database_url))
    }

    /// Override the connection pool size.
    pub fn with_pool_max_size(mut self, pool_max_size: u32) -> Self {
        self.pool_max_size = pool_max_size;
        self
    }

    /// The socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
