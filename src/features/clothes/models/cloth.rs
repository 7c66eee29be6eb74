use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Clothing category, stored as TEXT in the clothes table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClothCategory {
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl ClothCategory {
    /// Parse a category value supplied at the API boundary
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "shoes" => Some(Self::Shoes),
            "accessory" => Some(Self::Accessory),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClothCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClothCategory::Top => write!(f, "top"),
            ClothCategory::Bottom => write!(f, "bottom"),
            ClothCategory::Shoes => write!(f, "shoes"),
            ClothCategory::Accessory => write!(f, "accessory"),
        }
    }
}

/// Database model for a clothing item
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Cloth {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub image_url: String,
    pub category: ClothCategory,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_all_valid_categories() {
        assert_eq!(ClothCategory::parse("top"), Some(ClothCategory::Top));
        assert_eq!(ClothCategory::parse("bottom"), Some(ClothCategory::Bottom));
        assert_eq!(ClothCategory::parse("shoes"), Some(ClothCategory::Shoes));
        assert_eq!(
            ClothCategory::parse("accessory"),
            Some(ClothCategory::Accessory)
        );
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(ClothCategory::parse("hat"), None);
        assert_eq!(ClothCategory::parse("TOP"), None);
        assert_eq!(ClothCategory::parse(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for category in [
            ClothCategory::Top,
            ClothCategory::Bottom,
            ClothCategory::Shoes,
            ClothCategory::Accessory,
        ] {
            assert_eq!(ClothCategory::parse(&category.to_string()), Some(category));
        }
    }
}
