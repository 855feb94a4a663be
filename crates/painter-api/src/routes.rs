use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::paintings;

/// Full HTTP surface. Cross-origin requests are allowed from
/// `frontend_origin` only; other origins get no `Access-Control-Allow-Origin`.
pub fn build_router(state: AppState, frontend_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([frontend_origin]))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/painting/{user_id}", get(paintings::get_painting))
        // Shape data has no size cap.
        .route(
            "/api/painting",
            post(paintings::save_painting).layer(DefaultBodyLimit::disable()),
        )
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
