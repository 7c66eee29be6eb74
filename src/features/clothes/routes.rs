use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::clothes::handlers;
use crate::features::clothes::services::ClothService;
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Create routes for the clothes feature
pub fn routes(service: Arc<ClothService>) -> Router {
    Router::new()
        .route(
            "/clothes",
            get(handlers::list_clothes)
                .post(handlers::create_cloth)
                // Allow body size up to MAX_UPLOAD_SIZE + buffer for multipart overhead
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 1024 * 1024)),
        )
        .route("/clothes/seed", post(handlers::seed_clothes))
        .route(
            "/clothes/{id}",
            get(handlers::get_cloth).delete(handlers::delete_cloth),
        )
        .with_state(service)
}
