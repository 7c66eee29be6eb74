use std::fs;
use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::clothes::dtos::ClothResponseDto;
use crate::features::clothes::models::{Cloth, ClothCategory};
use crate::modules::media::MediaStore;
use crate::shared::constants::MEDIA_URL_PREFIX;

const SELECT_CLOTH: &str = "SELECT id, user_id, name, image_url, category, created_at FROM clothes";

/// Service for clothing item operations
pub struct ClothService {
    pool: SqlitePool,
    store: Arc<MediaStore>,
}

impl ClothService {
    pub fn new(pool: SqlitePool, store: Arc<MediaStore>) -> Self {
        Self { pool, store }
    }

    fn parse_category(category: &str) -> Result<ClothCategory> {
        ClothCategory::parse(category).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid category '{}'. Valid values: top, bottom, shoes, accessory",
                category
            ))
        })
    }

    /// List clothing items, newest first, optionally filtered by category
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<ClothResponseDto>> {
        let clothes = match category {
            Some(raw) => {
                let category = Self::parse_category(raw)?;
                sqlx::query_as::<_, Cloth>(&format!(
                    "{} WHERE category = ? ORDER BY created_at DESC, id DESC",
                    SELECT_CLOTH
                ))
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Cloth>(&format!(
                    "{} ORDER BY created_at DESC, id DESC",
                    SELECT_CLOTH
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(clothes.into_iter().map(Into::into).collect())
    }

    /// Get a single clothing item by id
    pub async fn get(&self, id: i64) -> Result<ClothResponseDto> {
        let cloth = sqlx::query_as::<_, Cloth>(&format!("{} WHERE id = ?", SELECT_CLOTH))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        cloth
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Cloth {} not found", id)))
    }

    /// Create a clothing item from an uploaded image
    ///
    /// Category validation happens before any file I/O; an invalid category
    /// leaves no file and no row behind.
    pub async fn create(
        &self,
        name: &str,
        category: &str,
        image_content: &[u8],
    ) -> Result<ClothResponseDto> {
        let category = Self::parse_category(category)?;
        let image_url = self.store.save(image_content)?;

        let cloth = sqlx::query_as::<_, Cloth>(
            "INSERT INTO clothes (user_id, name, image_url, category, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, user_id, name, image_url, category, created_at",
        )
        .bind(None::<i64>)
        .bind(name)
        .bind(&image_url)
        .bind(category)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert cloth: {:?}", e);
            AppError::Database(e)
        })?;

        info!("Cloth created: id={}, category={}", cloth.id, cloth.category);
        Ok(cloth.into())
    }

    /// Delete a clothing item, best-effort removing its backing file first
    ///
    /// Returns `false` when the id does not exist. File cleanup failure
    /// never aborts the row deletion.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let cloth = sqlx::query_as::<_, Cloth>(&format!("{} WHERE id = ?", SELECT_CLOTH))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(cloth) = cloth else {
            return Ok(false);
        };

        let cleanup = self.store.delete(&cloth.image_url);
        debug!("Cloth {} file cleanup: {:?}", id, cleanup);

        sqlx::query("DELETE FROM clothes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!("Cloth deleted: id={}", id);
        Ok(true)
    }

    /// Bulk import: create rows for image files already sitting in the
    /// media directory but not yet referenced by any cloth.
    ///
    /// The category is guessed from filename keywords; this is a
    /// convenience for pre-populated directories, not a correctness path.
    pub async fn seed_from_media(&self) -> Result<i64> {
        let entries = fs::read_dir(self.store.media_dir())
            .map_err(|e| AppError::Internal(format!("Failed to read media directory: {}", e)))?;

        let mut files: Vec<String> = entries
            .flatten()
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|f| is_image_filename(f))
            .collect();
        files.sort();

        let mut created = 0i64;
        for filename in files {
            let image_url = format!("{}{}", MEDIA_URL_PREFIX, filename);
            let existing: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM clothes WHERE image_url = ?")
                    .bind(&image_url)
                    .fetch_optional(&self.pool)
                    .await?;
            if existing.is_some() {
                continue;
            }

            let name = filename
                .rsplit_once('.')
                .map(|(stem, _)| stem)
                .unwrap_or(&filename);
            let category = guess_category(name);

            sqlx::query(
                "INSERT INTO clothes (user_id, name, image_url, category, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(None::<i64>)
            .bind(name)
            .bind(&image_url)
            .bind(category)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
            created += 1;
        }

        info!("Seed import finished: {} new clothes", created);
        Ok(created)
    }
}

fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

/// Best-effort category guess from a filename stem
fn guess_category(name: &str) -> ClothCategory {
    const SHOES: &[&str] = &["shoe", "sneaker", "boot", "sandal", "heel", "slipper"];
    const BOTTOM: &[&str] = &["pant", "jean", "skirt", "short", "trouser", "tight", "legging"];
    const ACCESSORY: &[&str] = &[
        "belt", "cap", "hat", "beanie", "scarf", "bag", "necklace", "jewel", "accessor",
    ];

    let s = name.to_lowercase();
    if SHOES.iter().any(|w| s.contains(w)) {
        return ClothCategory::Shoes;
    }
    if BOTTOM.iter().any(|w| s.contains(w)) {
        return ClothCategory::Bottom;
    }
    if ACCESSORY.iter().any(|w| s.contains(w)) {
        return ClothCategory::Accessory;
    }
    ClothCategory::Top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_test_pool, create_test_store, sample_png_bytes};

    async fn service() -> (ClothService, tempfile::TempDir) {
        let pool = create_test_pool().await;
        let (store, dir) = create_test_store();
        (ClothService::new(pool, Arc::new(store)), dir)
    }

    #[tokio::test]
    async fn category_filter_includes_matching_and_excludes_others() {
        let (svc, _dir) = service().await;
        let tee = svc
            .create("tee", "top", &sample_png_bytes())
            .await
            .unwrap();
        let boots = svc
            .create("boots", "shoes", &sample_png_bytes())
            .await
            .unwrap();

        let tops = svc.list(Some("top")).await.unwrap();
        assert!(tops.iter().any(|c| c.id == tee.id));
        assert!(tops.iter().all(|c| c.id != boots.id));

        let shoes = svc.list(Some("shoes")).await.unwrap();
        assert!(shoes.iter().any(|c| c.id == boots.id));
        assert!(shoes.iter().all(|c| c.id != tee.id));

        let all = svc.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn list_rejects_invalid_category_filter() {
        let (svc, _dir) = service().await;
        let err = svc.list(Some("hat")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_with_invalid_category_writes_nothing() {
        let (svc, _dir) = service().await;
        let err = svc
            .create("mystery", "hat", &sample_png_bytes())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // No file written (category check runs before file I/O)
        assert_eq!(fs::read_dir(svc.store.media_dir()).unwrap().count(), 0);
        // No row inserted
        assert!(svc.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_undecodable_image_fails() {
        let (svc, _dir) = service().await;
        let err = svc.create("tee", "top", b"not an image").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidImage(_)));
        assert!(svc.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn created_image_url_resolves_to_rgba_png() {
        let (svc, _dir) = service().await;
        let cloth = svc
            .create("tee", "top", &sample_png_bytes())
            .await
            .unwrap();

        let filename = cloth.image_url.rsplit('/').next().unwrap();
        let decoded = image::open(svc.store.media_dir().join(filename)).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (svc, _dir) = service().await;
        let err = svc.get(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_not_found_safe_and_removes_file() {
        let (svc, _dir) = service().await;
        assert!(!svc.delete(42).await.unwrap());

        let cloth = svc
            .create("tee", "top", &sample_png_bytes())
            .await
            .unwrap();
        assert!(svc.delete(cloth.id).await.unwrap());
        assert!(svc.list(None).await.unwrap().is_empty());
        assert_eq!(fs::read_dir(svc.store.media_dir()).unwrap().count(), 0);

        // Second delete of the same id reports nothing to delete
        assert!(!svc.delete(cloth.id).await.unwrap());
    }

    #[tokio::test]
    async fn seed_imports_unreferenced_files_once() {
        let (svc, _dir) = service().await;
        fs::write(
            svc.store.media_dir().join("red-sneaker.png"),
            sample_png_bytes(),
        )
        .unwrap();
        fs::write(
            svc.store.media_dir().join("denim-jeans.jpg"),
            sample_png_bytes(),
        )
        .unwrap();
        fs::write(svc.store.media_dir().join("notes.txt"), b"skip me").unwrap();

        assert_eq!(svc.seed_from_media().await.unwrap(), 2);
        let all = svc.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all
            .iter()
            .any(|c| c.name == "red-sneaker" && c.category == ClothCategory::Shoes));
        assert!(all
            .iter()
            .any(|c| c.name == "denim-jeans" && c.category == ClothCategory::Bottom));

        // Re-running creates nothing new
        assert_eq!(svc.seed_from_media().await.unwrap(), 0);
    }

    #[test]
    fn guess_category_keyword_mapping() {
        assert_eq!(guess_category("white-sneaker"), ClothCategory::Shoes);
        assert_eq!(guess_category("leather boots"), ClothCategory::Shoes);
        assert_eq!(guess_category("Ripped Jeans"), ClothCategory::Bottom);
        assert_eq!(guess_category("summer-skirt"), ClothCategory::Bottom);
        assert_eq!(guess_category("wool scarf"), ClothCategory::Accessory);
        assert_eq!(guess_category("tote bag"), ClothCategory::Accessory);
        assert_eq!(guess_category("plain shirt"), ClothCategory::Top);
        assert_eq!(guess_category(""), ClothCategory::Top);
    }
}
