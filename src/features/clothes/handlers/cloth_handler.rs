use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::clothes::dtos::{ClothResponseDto, SeedResponseDto, UploadClothDto};
use crate::features::clothes::services::ClothService;
use crate::shared::constants::MAX_UPLOAD_SIZE;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing clothes
#[derive(Debug, Deserialize)]
pub struct ListClothesQuery {
    /// Optional category filter: top | bottom | shoes | accessory
    pub category: Option<String>,
}

/// List clothing items, optionally filtered by category
#[utoipa::path(
    get,
    path = "/clothes",
    params(
        ("category" = Option<String>, Query, description = "top | bottom | shoes | accessory")
    ),
    responses(
        (status = 200, description = "List of clothing items", body = ApiResponse<Vec<ClothResponseDto>>),
        (status = 400, description = "Invalid category filter")
    ),
    tag = "clothes"
)]
pub async fn list_clothes(
    State(service): State<Arc<ClothService>>,
    Query(query): Query<ListClothesQuery>,
) -> Result<Json<ApiResponse<Vec<ClothResponseDto>>>> {
    let clothes = service.list(query.category.as_deref()).await?;
    let total = clothes.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(clothes),
        None,
        Some(Meta { total }),
    )))
}

/// Get a clothing item by id
#[utoipa::path(
    get,
    path = "/clothes/{id}",
    params(
        ("id" = i64, Path, description = "Clothing item id")
    ),
    responses(
        (status = 200, description = "Clothing item found", body = ApiResponse<ClothResponseDto>),
        (status = 404, description = "Clothing item not found")
    ),
    tag = "clothes"
)]
pub async fn get_cloth(
    State(service): State<Arc<ClothService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ClothResponseDto>>> {
    let cloth = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(cloth), None, None)))
}

/// Create a clothing item from a multipart upload
///
/// Accepts multipart/form-data with:
/// - `name`: display name (required)
/// - `category`: top | bottom | shoes | accessory (required)
/// - `file`: the image (required)
#[utoipa::path(
    post,
    path = "/clothes",
    request_body(
        content = UploadClothDto,
        content_type = "multipart/form-data",
        description = "Clothing upload form",
    ),
    responses(
        (status = 200, description = "Clothing item created", body = ApiResponse<ClothResponseDto>),
        (status = 400, description = "Invalid category or undecodable image")
    ),
    tag = "clothes"
)]
pub async fn create_cloth(
    State(service): State<Arc<ClothService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ClothResponseDto>>> {
    let mut name: Option<String> = None;
    let mut category: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read name field: {}", e))
                })?;
                name = Some(text);
            }
            "category" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read category field: {}", e))
                })?;
                category = Some(text);
            }
            "file" => {
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let name = name.ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;
    let category =
        category.ok_or_else(|| AppError::BadRequest("category is required".to_string()))?;
    let file_data = file_data.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;

    if file_data.len() > MAX_UPLOAD_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            MAX_UPLOAD_SIZE,
            MAX_UPLOAD_SIZE / 1024 / 1024
        )));
    }

    let cloth = service.create(&name, &category, &file_data).await?;
    Ok(Json(ApiResponse::success(Some(cloth), None, None)))
}

/// Delete a clothing item and its backing file
#[utoipa::path(
    delete,
    path = "/clothes/{id}",
    params(
        ("id" = i64, Path, description = "Clothing item id")
    ),
    responses(
        (status = 204, description = "Clothing item deleted"),
        (status = 404, description = "Clothing item not found")
    ),
    tag = "clothes"
)]
pub async fn delete_cloth(
    State(service): State<Arc<ClothService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    if !service.delete(id).await? {
        return Err(AppError::NotFound(format!("Cloth {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Import clothing rows for image files already in the media directory
///
/// Categories are guessed from filename keywords; files already referenced
/// by a cloth row are skipped.
#[utoipa::path(
    post,
    path = "/clothes/seed",
    responses(
        (status = 200, description = "Seed import finished", body = ApiResponse<SeedResponseDto>),
    ),
    tag = "clothes"
)]
pub async fn seed_clothes(
    State(service): State<Arc<ClothService>>,
) -> Result<Json<ApiResponse<SeedResponseDto>>> {
    let created = service.seed_from_media().await?;
    Ok(Json(ApiResponse::success(
        Some(SeedResponseDto { created }),
        None,
        None,
    )))
}
