//! Segmentation module - background removal for clothing photos
//!
//! The ONNX backend is optional; `BackgroundRemover` degrades to an
//! alpha-channel passthrough when no model session could be initialized.

mod backend;
mod remover;

pub use backend::{OnnxBackend, SegmentationBackend, SegmentationError};
pub use remover::BackgroundRemover;
