use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GrayImage, RgbaImage};
use parking_lot::Mutex;
use thiserror::Error;

/// Model variants probed at startup, in preference order.
const MODEL_VARIANTS: &[&str] = &["u2net.onnx", "u2netp.onnx", "silueta.onnx"];

/// Side length of the square proxy fed to the saliency model.
const PROXY_SIZE: u32 = 320;

#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("tensor conversion failed: {0}")]
    Tensor(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// A backend able to separate a subject from its background.
pub trait SegmentationBackend: Send + Sync {
    /// Segment `image`, returning an RGBA image whose alpha channel encodes
    /// subject opacity (background pixels transparent).
    fn segment(&self, image: &DynamicImage) -> Result<RgbaImage, SegmentationError>;
}

/// ONNX Runtime saliency backend (U²-Net family).
pub struct OnnxBackend {
    session: Mutex<ort::session::Session>,
    model_name: String,
}

impl OnnxBackend {
    /// Try the known model variants under `models_dir` in order and wrap
    /// the first session that loads. Called once at startup; `None` means
    /// no variant is usable and callers run without real removal.
    pub fn init(models_dir: &Path) -> Option<Self> {
        for name in MODEL_VARIANTS {
            let path = models_dir.join(name);
            if !path.exists() {
                tracing::debug!("Segmentation model not found: {:?}", path);
                continue;
            }
            match Self::load_session(&path) {
                Ok(session) => {
                    tracing::info!("Loaded segmentation model '{}' from {:?}", name, path);
                    return Some(Self {
                        session: Mutex::new(session),
                        model_name: name.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to load segmentation model '{}': {}", name, e);
                }
            }
        }
        None
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn load_session(onnx_path: &Path) -> Result<ort::session::Session, String> {
        ort::session::Session::builder()
            .and_then(|b| b.with_intra_threads(2))
            .and_then(|b| b.commit_from_file(onnx_path))
            .map_err(|e| format!("ONNX session load error: {}", e))
    }
}

impl SegmentationBackend for OnnxBackend {
    fn segment(&self, image: &DynamicImage) -> Result<RgbaImage, SegmentationError> {
        let (w, h) = (image.width(), image.height());
        let proxy = image.resize_exact(PROXY_SIZE, PROXY_SIZE, FilterType::Triangle);
        let rgb = proxy.to_rgb8();

        // NCHW tensor, ImageNet-normalized
        let side = PROXY_SIZE as usize;
        let mut input = ndarray::Array4::<f32>::zeros((1, 3, side, side));
        let mean = [0.485f32, 0.456, 0.406];
        let std = [0.229f32, 0.224, 0.225];
        for y in 0..side {
            for x in 0..side {
                let p = rgb.get_pixel(x as u32, y as u32);
                for c in 0..3 {
                    input[[0, c, y, x]] = (p[c] as f32 / 255.0 - mean[c]) / std[c];
                }
            }
        }

        let input_tensor = ort::value::Tensor::from_array(input)
            .map_err(|e| SegmentationError::Tensor(e.to_string()))?;
        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| SegmentationError::Inference(e.to_string()))?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| SegmentationError::Inference(e.to_string()))?;
        if data.len() < side * side {
            return Err(SegmentationError::Inference(format!(
                "saliency output too small: {} values",
                data.len()
            )));
        }
        let saliency = &data[..side * side];

        // Min-max normalize the saliency map into an 8-bit mask
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in saliency {
            min = min.min(v);
            max = max.max(v);
        }
        let range = (max - min).max(f32::EPSILON);
        let mask_pixels: Vec<u8> = saliency
            .iter()
            .map(|&v| (((v - min) / range) * 255.0) as u8)
            .collect();
        let mask = GrayImage::from_raw(PROXY_SIZE, PROXY_SIZE, mask_pixels).ok_or_else(|| {
            SegmentationError::Inference("mask buffer size mismatch".to_string())
        })?;

        // Upsample the mask to the input size and apply as alpha
        let mask = image::imageops::resize(&mask, w, h, FilterType::Triangle);
        let mut rgba = image.to_rgba8();
        for (pixel, m) in rgba.pixels_mut().zip(mask.pixels()) {
            pixel[3] = m[0];
        }

        Ok(rgba)
    }
}
