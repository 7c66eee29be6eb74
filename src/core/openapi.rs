use utoipa::{Modify, OpenApi};

use crate::features::clothes::{dtos as clothes_dtos, handlers as clothes_handlers, models};
use crate::features::looks::{dtos as looks_dtos, handlers as looks_handlers};
use crate::features::removal::{dtos as removal_dtos, handlers as removal_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Clothes
        clothes_handlers::list_clothes,
        clothes_handlers::get_cloth,
        clothes_handlers::create_cloth,
        clothes_handlers::delete_cloth,
        clothes_handlers::seed_clothes,
        // Looks
        looks_handlers::list_looks,
        looks_handlers::get_look,
        looks_handlers::create_look,
        looks_handlers::update_look,
        looks_handlers::delete_look,
        // Utilities
        removal_handlers::remove_background,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Clothes
            models::ClothCategory,
            clothes_dtos::ClothResponseDto,
            clothes_dtos::UploadClothDto,
            clothes_dtos::SeedResponseDto,
            ApiResponse<Vec<clothes_dtos::ClothResponseDto>>,
            ApiResponse<clothes_dtos::ClothResponseDto>,
            ApiResponse<clothes_dtos::SeedResponseDto>,
            // Looks
            looks_dtos::LookResponseDto,
            looks_dtos::CreateLookDto,
            looks_dtos::UpdateLookDto,
            ApiResponse<Vec<looks_dtos::LookResponseDto>>,
            ApiResponse<looks_dtos::LookResponseDto>,
            // Utilities
            removal_dtos::RemoveBackgroundDto,
        )
    ),
    tags(
        (name = "clothes", description = "Clothing item catalogue"),
        (name = "looks", description = "Saved outfits composed of clothing items"),
        (name = "utils", description = "Standalone image utilities"),
    ),
    info(
        title = "Looksy API",
        version = "0.1.0",
        description = "Wardrobe catalogue API documentation",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
