//! Server construction: state wiring, migrations, and app assembly.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::domain::{
    BookingServiceImpl, ItemServiceImpl, RequestServiceImpl, UserServiceImpl,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{bookings, items, requests, users};
use backend::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselCommentRepository, DieselItemRepository,
    DieselRequestRepository, DieselUserRepository, PoolConfig,
};
use backend::Trace;
#[cfg(debug_assertions)]
use backend::ApiDoc;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Wire Diesel repositories and domain services into the handler state.
fn build_http_state(pool: &DbPool) -> HttpState {
    let user_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let item_repo = Arc::new(DieselItemRepository::new(pool.clone()));
    let booking_repo = Arc::new(DieselBookingRepository::new(pool.clone()));
    let comment_repo = Arc::new(DieselCommentRepository::new(pool.clone()));
    let request_repo = Arc::new(DieselRequestRepository::new(pool.clone()));

    HttpState::new(
        Arc::new(UserServiceImpl::new(user_repo.clone())),
        Arc::new(ItemServiceImpl::new(
            item_repo.clone(),
            user_repo.clone(),
            booking_repo.clone(),
            comment_repo,
            request_repo.clone(),
        )),
        Arc::new(BookingServiceImpl::new(
            booking_repo,
            user_repo.clone(),
            item_repo.clone(),
        )),
        Arc::new(RequestServiceImpl::new(request_repo, user_repo, item_repo)),
    )
}

/// Assemble the actix application. Literal routes (`/items/search`,
/// `/bookings/owner`, `/requests/all`) are registered ahead of their
/// parameterised siblings so they match first.
fn build_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(state)
        .wrap(Trace)
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
        .service(requests::get_request);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Apply pending migrations on a blocking thread.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;

        let mut conn = diesel::PgConnection::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
        Ok(())
    })
    .await
    .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
}

/// Run the server until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    run_migrations(config.database_url.clone()).await?;

    let pool = DbPool::new(
        PoolConfig::new(&config.database_url).with_max_size(config.pool_max_size),
    )
    .await
    .map_err(|err| std::io::Error::other(err.to_string()))?;

    let state = web::Data::new(build_http_state(&pool));

    info!(addr = %config.bind_addr, "starting server");
    HttpServer::new(move || build_app(state.clone()))
        .bind(config.bind_addr)?
        .run()
        .await
}
