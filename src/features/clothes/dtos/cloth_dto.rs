use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::clothes::models::{Cloth, ClothCategory};

/// Response DTO for a clothing item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClothResponseDto {
    pub id: i64,
    pub name: String,
    pub category: ClothCategory,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Cloth> for ClothResponseDto {
    fn from(c: Cloth) -> Self {
        Self {
            id: c.id,
            name: c.name,
            category: c.category,
            image_url: c.image_url,
            created_at: c.created_at,
        }
    }
}

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadClothDto {
    /// Display name for the item
    #[schema(example = "Blue denim jacket")]
    pub name: String,
    /// Category: top | bottom | shoes | accessory
    #[schema(example = "top")]
    pub category: String,
    /// The image to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for the bulk seed import
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeedResponseDto {
    /// Number of new clothing rows created from unreferenced media files
    pub created: i64,
}
