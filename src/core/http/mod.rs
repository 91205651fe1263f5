use axum::{Router, routing::get};

use crate::AppState;

pub(crate) mod handlers;

pub use handlers::health;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
