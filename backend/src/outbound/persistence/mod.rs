//! PostgreSQL persistence adapters for the repository ports.

mod diesel_booking_repository;
mod diesel_comment_repository;
mod diesel_item_repository;
mod diesel_request_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_request_repository::DieselRequestRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
