use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::removal::handlers;
use crate::modules::segmentation::BackgroundRemover;
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Create routes for the background-removal utility
pub fn routes(remover: Arc<BackgroundRemover>) -> Router {
    Router::new()
        .route(
            "/remove-bg",
            post(handlers::remove_background)
                // Allow body size up to MAX_UPLOAD_SIZE + buffer for multipart overhead
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 1024 * 1024)),
        )
        .with_state(remover)
}
