use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::app::docs;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(crate::core::http::routes())
        .nest("/notes", crate::notes::http::routes())
        .route(docs::SWAGGER_UI_PATH, get(docs::swagger_ui))
        .route(docs::OPENAPI_JSON_PATH, get(docs::openapi_spec))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
