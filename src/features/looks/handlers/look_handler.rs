use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::looks::dtos::{CreateLookDto, LookResponseDto, UpdateLookDto};
use crate::features::looks::services::LookService;
use crate::shared::constants::MAX_UPLOAD_SIZE;
use crate::shared::types::{ApiResponse, Meta};

/// List looks, newest first
#[utoipa::path(
    get,
    path = "/looks",
    responses(
        (status = 200, description = "List of looks", body = ApiResponse<Vec<LookResponseDto>>),
    ),
    tag = "looks"
)]
pub async fn list_looks(
    State(service): State<Arc<LookService>>,
) -> Result<Json<ApiResponse<Vec<LookResponseDto>>>> {
    let looks = service.list().await?;
    let total = looks.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(looks),
        None,
        Some(Meta { total }),
    )))
}

/// Get a look by id
#[utoipa::path(
    get,
    path = "/looks/{id}",
    params(
        ("id" = i64, Path, description = "Look id")
    ),
    responses(
        (status = 200, description = "Look found", body = ApiResponse<LookResponseDto>),
        (status = 404, description = "Look not found")
    ),
    tag = "looks"
)]
pub async fn get_look(
    State(service): State<Arc<LookService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<LookResponseDto>>> {
    let look = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(look), None, None)))
}

/// Create a look from a multipart upload
///
/// Accepts multipart/form-data with:
/// - `file`: the collage image (required)
/// - `cloth_ids`: member ids as a JSON array string or comma list (required)
/// - `title`: optional outfit title
#[utoipa::path(
    post,
    path = "/looks",
    request_body(
        content = CreateLookDto,
        content_type = "multipart/form-data",
        description = "Look creation form",
    ),
    responses(
        (status = 200, description = "Look created", body = ApiResponse<LookResponseDto>),
        (status = 400, description = "Empty, malformed, or unknown cloth_ids; undecodable image")
    ),
    tag = "looks"
)]
pub async fn create_look(
    State(service): State<Arc<LookService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<LookResponseDto>>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut cloth_ids: Option<String> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            "cloth_ids" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read cloth_ids field: {}", e))
                })?;
                cloth_ids = Some(text);
            }
            "title" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read title field: {}", e))
                })?;
                if !text.is_empty() {
                    title = Some(text);
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;
    let cloth_ids =
        cloth_ids.ok_or_else(|| AppError::BadRequest("cloth_ids is required".to_string()))?;

    if file_data.len() > MAX_UPLOAD_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_UPLOAD_SIZE,
            MAX_UPLOAD_SIZE / 1024 / 1024
        )));
    }

    let look = service.create(title, &cloth_ids, &file_data).await?;
    Ok(Json(ApiResponse::success(Some(look), None, None)))
}

/// Update a look's title
#[utoipa::path(
    put,
    path = "/looks/{id}",
    params(
        ("id" = i64, Path, description = "Look id")
    ),
    request_body = UpdateLookDto,
    responses(
        (status = 200, description = "Look updated", body = ApiResponse<LookResponseDto>),
        (status = 404, description = "Look not found")
    ),
    tag = "looks"
)]
pub async fn update_look(
    State(service): State<Arc<LookService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateLookDto>,
) -> Result<Json<ApiResponse<LookResponseDto>>> {
    let look = service.update(id, dto.title).await?;
    Ok(Json(ApiResponse::success(Some(look), None, None)))
}

/// Delete a look, its collage file, and its association rows
#[utoipa::path(
    delete,
    path = "/looks/{id}",
    params(
        ("id" = i64, Path, description = "Look id")
    ),
    responses(
        (status = 204, description = "Look deleted"),
        (status = 404, description = "Look not found")
    ),
    tag = "looks"
)]
pub async fn delete_look(
    State(service): State<Arc<LookService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    if !service.delete(id).await? {
        return Err(AppError::NotFound(format!("Look {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
