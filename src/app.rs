use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/panel", get(handlers::panel))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}
