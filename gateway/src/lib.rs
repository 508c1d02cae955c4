//! Validating gateway in front of the item-sharing backend.
//!
//! Checks request shape (identity header, body invariants, enum and range
//! parameters) and forwards everything that passes, unchanged.

pub mod config;
pub mod error;
pub mod forward;
pub mod identity;
pub mod routes;
pub mod validation;

pub use config::GatewayConfig;
pub use forward::Forwarder;
