use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tap", post(handlers::tap))
        .route("/reset", post(handlers::reset_form))
        .route("/api/state", get(handlers::get_state))
        .route("/api/phrases", get(handlers::get_phrases))
        .route("/api/phrase", post(handlers::select_phrase))
        .route("/api/click", post(handlers::click))
        .route("/api/press", post(handlers::press))
        .route("/api/key", post(handlers::key))
        .route("/api/reset/session", post(handlers::reset_session))
        .route("/api/reset/all", post(handlers::reset_all))
        .with_state(state)
}
