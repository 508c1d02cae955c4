//! Domain layer: entities, driving service ports, and driven repository
//! ports.
//!
//! Everything here is transport and storage agnostic. Inbound adapters map
//! domain values to JSON bodies; the persistence layer implements the
//! repository ports against PostgreSQL.

pub mod booking;
pub mod booking_service;
pub mod error;
pub mod item;
pub mod item_service;
pub mod page;
pub mod ports;
pub mod request;
pub mod request_service;
pub mod user;
pub mod user_service;

pub use self::booking_service::{BookingService, BookingServiceImpl};
pub use self::error::{Error, ErrorCode};
pub use self::item_service::{ItemService, ItemServiceImpl};
pub use self::page::Page;
pub use self::request_service::{RequestService, RequestServiceImpl};
pub use self::user_service::{UserService, UserServiceImpl};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
