use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::clothes::dtos::ClothResponseDto;
use crate::features::looks::models::Look;

/// Response DTO for a look, embedding its member clothing items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LookResponseDto {
    pub id: i64,
    pub title: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub clothes: Vec<ClothResponseDto>,
}

impl LookResponseDto {
    pub fn from_parts(look: Look, clothes: Vec<ClothResponseDto>) -> Self {
        Self {
            id: look.id,
            title: look.title,
            image_url: look.image_url,
            created_at: look.created_at,
            clothes,
        }
    }
}

/// Create request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateLookDto {
    /// The collage image to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Member clothing ids, as a JSON array string ("[1,2]") or comma list ("1,2")
    #[schema(example = "[1,2,3]")]
    pub cloth_ids: String,
    /// Optional title for the outfit
    pub title: Option<String>,
}

/// Request DTO for updating a look's title
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLookDto {
    pub title: Option<String>,
}

/// Parse the caller-supplied clothing id list.
///
/// Accepts a JSON array string (`"[1,2,3]"`) or a comma-separated list
/// (`"1,2,3"`). Duplicates are dropped, first occurrence wins.
pub fn parse_cloth_ids(raw: &str) -> Result<Vec<i64>, String> {
    let trimmed = raw.trim();
    let ids: Vec<i64> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|_| {
            "cloth_ids must be a JSON list like '[1,2]' or a comma list like '1,2'".to_string()
        })?
    } else {
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i64>()
                    .map_err(|_| format!("Invalid cloth id '{}'", s))
            })
            .collect::<Result<_, _>>()?
    };

    let mut seen = HashSet::new();
    Ok(ids.into_iter().filter(|id| seen.insert(*id)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array_form() {
        assert_eq!(parse_cloth_ids("[1,2,3]").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_cloth_ids("  [4] ").unwrap(), vec![4]);
        assert_eq!(parse_cloth_ids("[]").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn parses_comma_list_form() {
        assert_eq!(parse_cloth_ids("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_cloth_ids(" 7 , 8 ").unwrap(), vec![7, 8]);
        assert_eq!(parse_cloth_ids("5").unwrap(), vec![5]);
        // Dangling separators are tolerated
        assert_eq!(parse_cloth_ids("1,2,").unwrap(), vec![1, 2]);
        assert_eq!(parse_cloth_ids("").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn both_encodings_are_equivalent() {
        assert_eq!(
            parse_cloth_ids("[1,2,3]").unwrap(),
            parse_cloth_ids("1,2,3").unwrap()
        );
    }

    #[test]
    fn duplicates_are_dropped() {
        assert_eq!(parse_cloth_ids("[1,2,1,3,2]").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_cloth_ids("1,1,2").unwrap(), vec![1, 2]);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(parse_cloth_ids("[1,2").is_err());
        assert!(parse_cloth_ids("[\"a\"]").is_err());
        assert!(parse_cloth_ids("1,two,3").is_err());
        assert!(parse_cloth_ids("abc").is_err());
    }
}
