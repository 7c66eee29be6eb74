use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::clothes::models::Cloth;
use crate::features::looks::dtos::{parse_cloth_ids, LookResponseDto};
use crate::features::looks::models::Look;
use crate::modules::media::MediaStore;

const SELECT_LOOK: &str = "SELECT id, user_id, title, image_url, created_at FROM looks";

/// Service for look (outfit) operations
pub struct LookService {
    pool: SqlitePool,
    store: Arc<MediaStore>,
}

impl LookService {
    pub fn new(pool: SqlitePool, store: Arc<MediaStore>) -> Self {
        Self { pool, store }
    }

    /// List looks, newest first, healing stale collage references on the way
    pub async fn list(&self) -> Result<Vec<LookResponseDto>> {
        let looks = sqlx::query_as::<_, Look>(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_LOOK
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(looks.len());
        for look in looks {
            out.push(self.to_response(look).await?);
        }
        Ok(out)
    }

    /// Get a single look by id
    pub async fn get(&self, id: i64) -> Result<LookResponseDto> {
        let look = sqlx::query_as::<_, Look>(&format!("{} WHERE id = ?", SELECT_LOOK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Look {} not found", id)))?;

        self.to_response(look).await
    }

    /// Create a look from a collage upload and a clothing id list
    ///
    /// Every referenced id must already exist; the look row and its
    /// association rows are inserted in one transaction.
    pub async fn create(
        &self,
        title: Option<String>,
        cloth_ids_raw: &str,
        collage: &[u8],
    ) -> Result<LookResponseDto> {
        let ids = parse_cloth_ids(cloth_ids_raw).map_err(AppError::Validation)?;
        if ids.is_empty() {
            return Err(AppError::Validation(
                "cloth_ids must not be empty".to_string(),
            ));
        }

        let missing = self.missing_ids(&ids).await?;
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid cloth_ids: {:?}",
                missing
            )));
        }

        let image_url = self.store.save(collage)?;

        let mut tx = self.pool.begin().await?;
        let look = sqlx::query_as::<_, Look>(
            "INSERT INTO looks (user_id, title, image_url, created_at) \
             VALUES (?, ?, ?, ?) RETURNING id, user_id, title, image_url, created_at",
        )
        .bind(None::<i64>)
        .bind(&title)
        .bind(&image_url)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for cloth_id in &ids {
            sqlx::query("INSERT INTO look_clothes (look_id, cloth_id) VALUES (?, ?)")
                .bind(look.id)
                .bind(cloth_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!("Look created: id={}, members={}", look.id, ids.len());
        self.to_response(look).await
    }

    /// Update a look's title
    pub async fn update(&self, id: i64, title: Option<String>) -> Result<LookResponseDto> {
        let mut look = sqlx::query_as::<_, Look>(&format!("{} WHERE id = ?", SELECT_LOOK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Look {} not found", id)))?;

        sqlx::query("UPDATE looks SET title = ? WHERE id = ?")
            .bind(&title)
            .bind(id)
            .execute(&self.pool)
            .await?;
        look.title = title;

        self.to_response(look).await
    }

    /// Delete a look, best-effort removing its collage file first
    ///
    /// Association rows are removed by the join table's cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let look = sqlx::query_as::<_, Look>(&format!("{} WHERE id = ?", SELECT_LOOK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(look) = look else {
            return Ok(false);
        };

        let cleanup = self.store.delete(&look.image_url);
        debug!("Look {} file cleanup: {:?}", id, cleanup);

        sqlx::query("DELETE FROM looks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!("Look deleted: id={}", id);
        Ok(true)
    }

    /// Referenced ids with no matching cloth row, in input order
    async fn missing_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        let mut qb = sqlx::QueryBuilder::<sqlx::Sqlite>::new("SELECT id FROM clothes WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        qb.push(")");

        let found: Vec<i64> = qb.build_query_scalar().fetch_all(&self.pool).await?;
        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    /// Build the response projection, healing the collage reference and
    /// persisting the fix so later reads take the no-op path
    async fn to_response(&self, mut look: Look) -> Result<LookResponseDto> {
        if let Some(fixed) = self.store.heal(&look.image_url) {
            sqlx::query("UPDATE looks SET image_url = ? WHERE id = ?")
                .bind(&fixed)
                .bind(look.id)
                .execute(&self.pool)
                .await?;
            look.image_url = fixed;
        }

        let clothes = sqlx::query_as::<_, Cloth>(
            "SELECT c.id, c.user_id, c.name, c.image_url, c.category, c.created_at \
             FROM clothes c \
             JOIN look_clothes lc ON lc.cloth_id = c.id \
             WHERE lc.look_id = ? \
             ORDER BY c.id",
        )
        .bind(look.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(LookResponseDto::from_parts(
            look,
            clothes.into_iter().map(Into::into).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::clothes::services::ClothService;
    use crate::shared::test_helpers::{create_test_pool, create_test_store, sample_png_bytes};

    struct Fixture {
        looks: LookService,
        clothes: ClothService,
        pool: SqlitePool,
        store: Arc<MediaStore>,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let pool = create_test_pool().await;
        let (store, dir) = create_test_store();
        let store = Arc::new(store);
        Fixture {
            looks: LookService::new(pool.clone(), Arc::clone(&store)),
            clothes: ClothService::new(pool.clone(), Arc::clone(&store)),
            pool,
            store,
            _dir: dir,
        }
    }

    async fn seed_clothes(f: &Fixture, count: usize) -> Vec<i64> {
        let mut ids = Vec::new();
        for i in 0..count {
            let cloth = f
                .clothes
                .create(&format!("item-{}", i), "top", &sample_png_bytes())
                .await
                .unwrap();
            ids.push(cloth.id);
        }
        ids
    }

    async fn association_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM look_clothes")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn json_and_comma_encodings_create_equivalent_membership() {
        let f = fixture().await;
        let ids = seed_clothes(&f, 3).await;
        let json_form = format!("[{},{},{}]", ids[0], ids[1], ids[2]);
        let comma_form = format!("{},{},{}", ids[0], ids[1], ids[2]);

        let a = f
            .looks
            .create(None, &json_form, &sample_png_bytes())
            .await
            .unwrap();
        let b = f
            .looks
            .create(None, &comma_form, &sample_png_bytes())
            .await
            .unwrap();

        let members_a: Vec<i64> = a.clothes.iter().map(|c| c.id).collect();
        let members_b: Vec<i64> = b.clothes.iter().map(|c| c.id).collect();
        assert_eq!(members_a, members_b);
        assert_eq!(members_a, ids);
    }

    #[tokio::test]
    async fn create_rejects_empty_and_malformed_id_lists() {
        let f = fixture().await;
        for raw in ["", "[]", " , ", "[1,2", "one,two"] {
            let err = f
                .looks
                .create(None, raw, &sample_png_bytes())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "input {:?}", raw);
        }
    }

    #[tokio::test]
    async fn create_with_missing_reference_names_them_and_leaves_no_state() {
        let f = fixture().await;
        let ids = seed_clothes(&f, 2).await;

        let raw = format!("[{},{},99]", ids[0], ids[1]);
        let err = f
            .looks
            .create(None, &raw, &sample_png_bytes())
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("[99]"), "message: {}", msg),
            other => panic!("expected Validation, got {:?}", other),
        }

        // No look row, no association rows, no collage file
        assert!(f.looks.list().await.unwrap().is_empty());
        assert_eq!(association_count(&f.pool).await, 0);
        // Only the two cloth images exist in the store
        assert_eq!(
            std::fs::read_dir(f.store.media_dir()).unwrap().count(),
            2
        );
    }

    #[tokio::test]
    async fn get_and_update_round_trip() {
        let f = fixture().await;
        let ids = seed_clothes(&f, 1).await;
        let created = f
            .looks
            .create(Some("rainy day".to_string()), &format!("{}", ids[0]), &sample_png_bytes())
            .await
            .unwrap();

        let fetched = f.looks.get(created.id).await.unwrap();
        assert_eq!(fetched.title.as_deref(), Some("rainy day"));
        assert_eq!(fetched.clothes.len(), 1);

        let updated = f
            .looks
            .update(created.id, Some("sunny day".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.title.as_deref(), Some("sunny day"));

        let err = f.looks.update(999, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_not_found_safe_and_cascades_associations() {
        let f = fixture().await;
        assert!(!f.looks.delete(7).await.unwrap());

        let ids = seed_clothes(&f, 2).await;
        let look = f
            .looks
            .create(None, &format!("{},{}", ids[0], ids[1]), &sample_png_bytes())
            .await
            .unwrap();
        assert_eq!(association_count(&f.pool).await, 2);

        assert!(f.looks.delete(look.id).await.unwrap());
        assert_eq!(association_count(&f.pool).await, 0);
        assert!(f.looks.list().await.unwrap().is_empty());
        // Cloth rows are untouched by a look deletion
        assert_eq!(f.clothes.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn read_paths_heal_stale_references_idempotently() {
        let f = fixture().await;
        let ids = seed_clothes(&f, 1).await;
        let look = f
            .looks
            .create(None, &format!("{}", ids[0]), &sample_png_bytes())
            .await
            .unwrap();

        // Simulate extension drift: the stored file becomes a .jpg
        let filename = look.image_url.rsplit('/').next().unwrap().to_string();
        let stem = filename.rsplit_once('.').unwrap().0;
        std::fs::rename(
            f.store.media_dir().join(&filename),
            f.store.media_dir().join(format!("{}.jpg", stem)),
        )
        .unwrap();

        let healed_url = format!("/media/{}.jpg", stem);
        let first = f.looks.get(look.id).await.unwrap();
        assert_eq!(first.image_url, healed_url);

        // Healed reference is persisted
        let stored: String = sqlx::query_scalar("SELECT image_url FROM looks WHERE id = ?")
            .bind(look.id)
            .fetch_one(&f.pool)
            .await
            .unwrap();
        assert_eq!(stored, healed_url);

        // Second read takes the no-op path and yields the same reference
        let second = f.looks.get(look.id).await.unwrap();
        assert_eq!(second.image_url, healed_url);
    }

    #[tokio::test]
    async fn unresolvable_reference_is_returned_unchanged() {
        let f = fixture().await;
        let ids = seed_clothes(&f, 1).await;
        let look = f
            .looks
            .create(None, &format!("{}", ids[0]), &sample_png_bytes())
            .await
            .unwrap();

        // Remove the collage entirely; no same-stem candidate remains
        let filename = look.image_url.rsplit('/').next().unwrap().to_string();
        std::fs::remove_file(f.store.media_dir().join(&filename)).unwrap();

        let fetched = f.looks.get(look.id).await.unwrap();
        assert_eq!(fetched.image_url, look.image_url);
    }
}
