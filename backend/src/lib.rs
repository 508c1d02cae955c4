//! Item-sharing backend: domain services, REST adapter, and PostgreSQL
//! persistence.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
