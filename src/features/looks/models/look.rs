use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a look (saved outfit)
///
/// Membership in the look lives in the `look_clothes` join table.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Look {
    pub id: i64,
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}
