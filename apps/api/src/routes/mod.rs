pub mod health;

use axum::{routing::get, Router};

use crate::outreach::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/",
            get(handlers::index_page).post(handlers::handle_outreach),
        )
        .with_state(state)
}
