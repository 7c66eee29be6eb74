//! Local content-directory store for uploaded images.
//!
//! Uploads are normalized to RGBA PNG under a collision-resistant random
//! filename and referenced by a `/media/...` relative URL. Removal is
//! best-effort: database state, not file presence, is the source of truth.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::constants::MEDIA_URL_PREFIX;

/// Extensions probed when healing a stale image reference, in order.
const HEAL_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".JPG", ".JPEG", ".PNG"];

/// Outcome of a best-effort file removal.
///
/// Callers treat all three as success; the distinction exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCleanup {
    /// The backing file existed and was removed
    Deleted,
    /// No backing file was present
    Missing,
    /// Removal was attempted and failed; logged, never propagated
    Failed,
}

pub struct MediaStore {
    media_dir: PathBuf,
}

impl MediaStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let media_dir = dir.into();
        fs::create_dir_all(&media_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create media directory: {}", e)))?;
        Ok(Self { media_dir })
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Decode `content`, normalize to RGBA PNG, and store it under a
    /// random filename. Returns the relative URL of the stored file.
    pub fn save(&self, content: &[u8]) -> Result<String> {
        let img = image::load_from_memory(content).map_err(|_| {
            AppError::InvalidImage("Could not read image file (JPG/PNG supported)".to_string())
        })?;
        let rgba = img.to_rgba8();

        let filename = format!("{}.png", Uuid::new_v4().simple());
        let path = self.media_dir.join(&filename);

        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| AppError::Internal(format!("Failed to encode image: {}", e)))?;
        fs::write(&path, buf.into_inner())
            .map_err(|e| AppError::Internal(format!("Failed to write image file: {}", e)))?;

        debug!("Stored media file: {}", filename);
        Ok(format!("{}{}", MEDIA_URL_PREFIX, filename))
    }

    /// Remove the file behind a stored reference, best-effort.
    ///
    /// Missing files and OS-level failures are not errors: file presence is
    /// not guaranteed to match database state.
    pub fn delete(&self, image_url: &str) -> FileCleanup {
        let Some(path) = self.path_for(image_url) else {
            return FileCleanup::Missing;
        };
        if !path.exists() {
            return FileCleanup::Missing;
        }
        match fs::remove_file(&path) {
            Ok(()) => FileCleanup::Deleted,
            Err(e) => {
                warn!("Failed to remove media file {:?}: {}", path, e);
                FileCleanup::Failed
            }
        }
    }

    /// Repair a reference whose exact filename is gone but whose stem
    /// survives under another extension.
    ///
    /// Returns the corrected URL on the first extension match, `None` when
    /// the reference already resolves or no candidate exists. Safe to call
    /// repeatedly: a healed reference resolves exactly and takes the no-op
    /// path.
    pub fn heal(&self, image_url: &str) -> Option<String> {
        let url = image_url.trim();
        if url.is_empty() {
            return None;
        }
        let filename = url.rsplit('/').next()?;
        if filename.is_empty() {
            return None;
        }

        if self.media_dir.join(filename).exists() {
            return None;
        }

        let stem = match filename.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => filename,
        };
        for ext in HEAL_EXTENSIONS {
            let candidate = format!("{}{}", stem, ext);
            if self.media_dir.join(&candidate).exists() {
                debug!("Healed media reference {} -> {}", filename, candidate);
                return Some(format!("{}{}", MEDIA_URL_PREFIX, candidate));
            }
        }
        None
    }

    fn path_for(&self, image_url: &str) -> Option<PathBuf> {
        let url = image_url.trim();
        if !url.starts_with(MEDIA_URL_PREFIX) {
            return None;
        }
        let filename = url.rsplit('/').next()?;
        if filename.is_empty() {
            return None;
        }
        Some(self.media_dir.join(filename))
    }
}
