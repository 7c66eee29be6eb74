use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::features::looks::handlers;
use crate::features::looks::services::LookService;
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Create routes for the looks feature
pub fn routes(service: Arc<LookService>) -> Router {
    Router::new()
        .route(
            "/looks",
            get(handlers::list_looks)
                .post(handlers::create_look)
                // Allow body size up to MAX_UPLOAD_SIZE + buffer for multipart overhead
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 1024 * 1024)),
        )
        .route(
            "/looks/{id}",
            get(handlers::get_look)
                .put(handlers::update_look)
                .delete(handlers::delete_look),
        )
        .with_state(service)
}
