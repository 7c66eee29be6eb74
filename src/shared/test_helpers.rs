#[cfg(test)]
use crate::modules::media::MediaStore;

#[cfg(test)]
use sqlx::SqlitePool;

/// In-memory database with the full schema applied.
///
/// Single-connection pool: each `sqlite::memory:` connection is its own
/// database, so the pool must not hand out more than one.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

/// Media store backed by a scratch directory. Keep the TempDir alive for
/// the duration of the test; dropping it removes the directory.
#[cfg(test)]
pub fn create_test_store() -> (MediaStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = MediaStore::new(dir.path()).expect("failed to create media store");
    (store, dir)
}

/// A small valid PNG with an alpha channel.
#[cfg(test)]
pub fn sample_png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([120, 20, 200, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("failed to encode test image");
    buf.into_inner()
}
