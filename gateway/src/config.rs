//! Gateway configuration from the environment.

use std::net::SocketAddr;

use url::Url;

const BIND_ADDR_VAR: &str = "GATEWAY_BIND_ADDR";
const BACKEND_URL_VAR: &str = "BACKEND_URL";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Gateway runtime configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub backend_url: Url,
}

impl GatewayConfig {
    /// Construct a configuration from explicit values.
    pub fn new(bind_addr: SocketAddr, backend_url: Url) -> Self {
        Self {
            bind_addr,
            backend_url,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `BACKEND_URL` is required; `GATEWAY_BIND_ADDR` falls back to
    /// `0.0.0.0:8080`.
    pub fn from_env() -> std::io::Result<Self> {
        let raw_addr =
            std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = raw_addr.parse().map_err(|err| {
            std::io::Error::other(format!("{BIND_ADDR_VAR} is not a socket address: {err}"))
        })?;

        let raw_url = std::env::var(BACKEND_URL_VAR)
            .map_err(|_| std::io::Error::other(format!("{BACKEND_URL_VAR} must be set")))?;
        let backend_url: Url = raw_url.parse().map_err(|err| {
            std::io::Error::other(format!("{BACKEND_URL_VAR} is not a valid URL: {err}"))
        })?;

        Ok(Self::new(bind_addr, backend_url))
    }
}
