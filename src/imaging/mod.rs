//! Image encoding — pure Rust, zero system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Tensor → pixels** | `ndarray` views into `image` buffers |
//! | **PNG + prompt text** | `png` encoder `tEXt` chunks |
//! | **JPEG + DPI** | `JpegEncoder` with JFIF pixel density |
//! | **GIF / TIFF / BMP** | `image` crate encoders |
//!
//! The module is split into:
//! - **Convert**: Pure functions between float tensors and 8-bit images (unit testable)
//! - **Parameters**: Data structures describing a write and the per-format option matrix
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod convert;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use convert::{image_to_tensor, stack_batch, tensor_to_image};
pub use params::{
    ALLOWED_EXTENSIONS, Dpi, EncodeOptions, Extension, OutputFormat, Quality, WriteParams,
};
pub use rust_backend::RustBackend;
