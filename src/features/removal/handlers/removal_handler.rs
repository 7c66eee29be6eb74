use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::removal::dtos::RemoveBackgroundDto;
use crate::modules::segmentation::BackgroundRemover;
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Remove the background from an uploaded image
///
/// Standalone utility: image in, `image/png` bytes out, nothing persisted.
/// When no segmentation backend is available the image comes back as
/// opaque RGBA (no actual removal).
#[utoipa::path(
    post,
    path = "/remove-bg",
    request_body(
        content = RemoveBackgroundDto,
        content_type = "multipart/form-data",
        description = "Image to process",
    ),
    responses(
        (status = 200, description = "Processed PNG image", body = Vec<u8>, content_type = "image/png"),
        (status = 400, description = "Undecodable image")
    ),
    tag = "utils"
)]
pub async fn remove_background(
    State(remover): State<Arc<BackgroundRemover>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name == "file" {
            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;
            file_data = Some(data.to_vec());
        } else {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;
    if file_data.len() > MAX_UPLOAD_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_UPLOAD_SIZE,
            MAX_UPLOAD_SIZE / 1024 / 1024
        )));
    }

    let img = image::load_from_memory(&file_data)
        .map_err(|_| AppError::InvalidImage("Could not read image file".to_string()))?;

    let out = remover.process(&img);

    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(out)
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to encode image: {}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, "image/png")],
        buf.into_inner(),
    ))
}
