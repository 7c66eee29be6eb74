/// URL prefix under which the content directory is served
pub const MEDIA_URL_PREFIX: &str = "/media/";

/// Maximum accepted upload size in bytes (10MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;
