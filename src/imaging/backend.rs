//! Image writing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the single seam between the save node and the
//! encoders. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use a recording
//! mock so the counter and failure logic can be exercised without encoding.

use super::params::WriteParams;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Unsupported image layout: {0}")]
    UnsupportedLayout(String),
}

impl From<image::ImageError> for BackendError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::Encode(other.to_string()),
        }
    }
}

impl From<png::EncodingError> for BackendError {
    fn from(e: png::EncodingError) -> Self {
        match e {
            png::EncodingError::IoError(io) => BackendError::Io(io),
            other => BackendError::Encode(other.to_string()),
        }
    }
}

/// Trait for image writing backends.
pub trait ImageBackend: Send + Sync {
    /// Encode `image` and write it to `params.output`.
    fn write(&self, image: &DynamicImage, params: &WriteParams) -> Result<(), BackendError>;
}
