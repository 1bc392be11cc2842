pub mod attendance;
pub mod extract;
pub mod registrations;
pub mod workshops;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Upper bound for request bodies, materials included.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/workshops",
            get(workshops::list).post(workshops::create),
        )
        .route(
            "/api/workshops/:id",
            get(workshops::get)
                .put(workshops::update)
                .delete(workshops::delete),
        )
        .route(
            "/api/workshops/materials/:filename",
            get(workshops::material),
        )
        .route("/api/registrations", post(registrations::register))
        .route(
            "/api/registrations/:workshop_id",
            delete(registrations::unregister),
        )
        .route(
            "/api/registrations/workshops/:username",
            get(registrations::workshops),
        )
        .route("/api/attendance/mark", post(attendance::mark))
        .route(
            "/api/attendance/workshop/:workshop_id",
            get(attendance::by_workshop),
        )
        .route(
            "/api/attendance/workshop/:workshop_id/participants",
            get(attendance::participants),
        )
        .route("/api/attendance/user/:username", get(attendance::by_user))
        .with_state(state)
        // layers are in reverse order
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}
