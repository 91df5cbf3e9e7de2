mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{Router, middleware as axum_middleware, routing::post};

pub use state::{CSRF_HEADER, HttpState, generate_csrf_token};

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/submit", post(handlers::submit))
        .route("/leaderboard", post(handlers::leaderboard))
        .route("/chart", post(handlers::chart))
        .route("/records", post(handlers::records))
        .route("/factors_get", post(handlers::factors_get))
        .route("/factors_replace", post(handlers::factors_replace))
        .route("/export_csv", post(handlers::export_csv))
        .route("/settings_get", post(handlers::settings_get))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_csrf,
        ));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
}
