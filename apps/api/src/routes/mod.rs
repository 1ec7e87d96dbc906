pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/signup", post(auth::handle_signup))
        .route("/login", post(auth::handle_login))
        .route("/logout", get(auth::handle_logout).post(auth::handle_logout))
        .route("/forgot", post(auth::handle_forgot))
        .route("/dashboard", get(auth::handle_dashboard))
        // Résumé analysis
        .route("/analyze", post(analysis::handle_analyze))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
