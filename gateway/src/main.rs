//! Gateway entry point: tracing init, configuration, server startup.

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use gateway::routes::{bookings, items, requests, users};
use gateway::{Forwarder, GatewayConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    let config = GatewayConfig::from_env()?;
    let forwarder = web::Data::new(Forwarder::new(config.backend_url.clone()));

    info!(addr = %config.bind_addr, backend = %config.backend_url, "starting gateway");
    HttpServer::new(move || {
        // Literal routes before their parameterised siblings, as on the
        // backend.
        App::new()
            .app_data(forwarder.clone())
            .service(users::create_user)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user)
            .service(items::create_item)
            .service(items::search_items)
            .service(items::list_items)
            .service(items::get_item)
            .service(items::update_item)
            .service(items::delete_item)
            .service(items::add_comment)
            .service(bookings::create_booking)
            .service(bookings::list_owner_bookings)
            .service(bookings::list_bookings)
            .service(bookings::get_booking)
            .service(bookings::update_booking_status)
            .service(requests::create_request)
            .service(requests::list_all_requests)
            .service(requests::list_own_requests)
            .service(requests::get_request)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
