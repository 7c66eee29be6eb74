use std::sync::Arc;

use image::{imageops::FilterType, DynamicImage, RgbaImage};
use tracing::warn;

use super::backend::SegmentationBackend;

/// Maximum bounding box fed to the segmentation backend. Larger uploads are
/// downscaled first to bound memory and inference latency.
const MAX_DIMENSION: u32 = 2048;

/// Background removal with an always-succeeding fallback.
///
/// The backend is chosen once at startup and injected; when it is absent or
/// a call fails, the input is returned as plain RGBA (no actual removal)
/// with a logged warning. `process` never fails outward.
pub struct BackgroundRemover {
    backend: Option<Arc<dyn SegmentationBackend>>,
}

impl BackgroundRemover {
    pub fn new(backend: Option<Arc<dyn SegmentationBackend>>) -> Self {
        Self { backend }
    }

    pub fn process(&self, image: &DynamicImage) -> RgbaImage {
        let bounded = if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
            image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
        } else {
            image.clone()
        };

        match &self.backend {
            Some(backend) => match backend.segment(&bounded) {
                Ok(out) => out,
                Err(e) => {
                    warn!(
                        "Segmentation failed, falling back to plain RGBA conversion: {}",
                        e
                    );
                    bounded.to_rgba8()
                }
            },
            None => {
                warn!("No segmentation backend available; returning image without removal");
                bounded.to_rgba8()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::segmentation::SegmentationError;
    use image::Rgba;

    struct TransparentStub;

    impl SegmentationBackend for TransparentStub {
        fn segment(&self, image: &DynamicImage) -> Result<RgbaImage, SegmentationError> {
            Ok(RgbaImage::from_pixel(
                image.width(),
                image.height(),
                Rgba([0, 0, 0, 0]),
            ))
        }
    }

    struct FailingStub;

    impl SegmentationBackend for FailingStub {
        fn segment(&self, _image: &DynamicImage) -> Result<RgbaImage, SegmentationError> {
            Err(SegmentationError::Inference("stub failure".to_string()))
        }
    }

    fn opaque_input(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(w, h, image::Rgb([10, 20, 30])))
    }

    #[test]
    fn uses_backend_output_when_it_succeeds() {
        let remover = BackgroundRemover::new(Some(Arc::new(TransparentStub)));
        let out = remover.process(&opaque_input(4, 4));
        assert!(out.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn backend_failure_collapses_to_opaque_fallback() {
        let remover = BackgroundRemover::new(Some(Arc::new(FailingStub)));
        let out = remover.process(&opaque_input(4, 4));
        assert_eq!(out.dimensions(), (4, 4));
        assert!(out.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn missing_backend_collapses_to_opaque_fallback() {
        let remover = BackgroundRemover::new(None);
        let out = remover.process(&opaque_input(3, 5));
        assert_eq!(out.dimensions(), (3, 5));
        assert!(out.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn oversized_input_is_bounded() {
        let remover = BackgroundRemover::new(None);
        let out = remover.process(&opaque_input(4096, 1024));
        assert!(out.width() <= 2048 && out.height() <= 2048);
        // Aspect ratio preserved by the bounding-box resize
        assert_eq!(out.width(), 2048);
        assert_eq!(out.height(), 512);
    }
}
