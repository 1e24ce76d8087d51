//! Conversions between float sample tensors and 8-bit images.
//!
//! Host tensors are `(height, width, channel)` with samples in `[0, 1]`.
//! Going to 8-bit scales by 255, clamps, then truncates.

use super::backend::BackendError;
use crate::value::ImageBatch;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{Array3, ArrayView3, Axis};

/// Convert one `(height, width, channel)` tensor to an 8-bit image.
///
/// Channel counts map to layouts: 1 → gray, 2 → gray+alpha, 3 → RGB,
/// 4 → RGBA. Anything else is rejected.
pub fn tensor_to_image(tensor: ArrayView3<'_, f32>) -> Result<DynamicImage, BackendError> {
    let (height, width, channels) = tensor.dim();
    let (w, h) = (
        u32::try_from(width).map_err(|_| too_large(width, height))?,
        u32::try_from(height).map_err(|_| too_large(width, height))?,
    );
    // Logical iteration order is row-major (h, w, c) regardless of memory layout.
    let raw: Vec<u8> = tensor.iter().copied().map(to_u8).collect();

    let img = match channels {
        1 => GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        n => {
            return Err(BackendError::UnsupportedLayout(format!(
                "{n} channels (expected 1, 2, 3 or 4)"
            )));
        }
    };
    img.ok_or_else(|| too_large(width, height))
}

fn too_large(width: usize, height: usize) -> BackendError {
    BackendError::UnsupportedLayout(format!("{width}x{height} does not fit an image buffer"))
}

/// Scale a `[0, 1]` sample to `[0, 255]` with clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// Convert a decoded image to a `(height, width, 3)` RGB tensor in `[0, 1]`.
pub fn image_to_tensor(img: &DynamicImage) -> Array3<f32> {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    Array3::from_shape_fn((h as usize, w as usize, 3), |(y, x, c)| {
        f32::from(rgb.get_pixel(x as u32, y as u32)[c]) / 255.0
    })
}

/// Stack equally-sized tensors into a batch.
pub fn stack_batch(images: &[Array3<f32>]) -> Result<ImageBatch, BackendError> {
    let views: Vec<ArrayView3<'_, f32>> = images.iter().map(|i| i.view()).collect();
    if views.is_empty() {
        return Ok(ImageBatch::zeros((0, 0, 0, 3)));
    }
    ndarray::stack(Axis(0), &views).map_err(|e| {
        BackendError::UnsupportedLayout(format!("images in a batch must share dimensions: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn to_u8_scales_and_truncates() {
        assert_eq!(to_u8(0.0), 0);
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(0.5), 127);
    }

    #[test]
    fn to_u8_clamps_out_of_range() {
        assert_eq!(to_u8(-0.5), 0);
        assert_eq!(to_u8(3.0), 255);
    }

    #[test]
    fn rgb_tensor_becomes_rgb_image() {
        let t = array![[[1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0]]];
        let img = tensor_to_image(t.view()).unwrap();
        let rgb = img.as_rgb8().expect("rgb layout");
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [0, 255, 0]);
    }

    #[test]
    fn single_channel_becomes_gray() {
        let t = Array3::<f32>::ones((2, 2, 1));
        let img = tensor_to_image(t.view()).unwrap();
        assert!(img.as_luma8().is_some());
    }

    #[test]
    fn four_channels_become_rgba() {
        let t = Array3::<f32>::zeros((1, 1, 4));
        let img = tensor_to_image(t.view()).unwrap();
        assert!(img.as_rgba8().is_some());
    }

    #[test]
    fn five_channels_are_rejected() {
        let t = Array3::<f32>::zeros((1, 1, 5));
        assert!(matches!(
            tensor_to_image(t.view()),
            Err(BackendError::UnsupportedLayout(_))
        ));
    }

    #[test]
    fn transposed_views_follow_logical_order() {
        // Build (w, h, c) then swap to (h, w, c) so memory order differs from logical order.
        let mut t = Array3::<f32>::zeros((2, 1, 3));
        t[[1, 0, 2]] = 1.0;
        let mut view = t.view();
        view.swap_axes(0, 1);
        let img = tensor_to_image(view).unwrap();
        assert_eq!(img.as_rgb8().unwrap().get_pixel(1, 0).0, [0, 0, 255]);
    }

    #[test]
    fn image_round_trips_through_tensor() {
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(2, 1, image::Rgb([255, 0, 255]));
        let tensor = image_to_tensor(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(tensor.dim(), (2, 3, 3));
        assert_eq!(tensor[[1, 2, 0]], 1.0);
        assert_eq!(tensor[[1, 2, 1]], 0.0);
    }

    #[test]
    fn stack_rejects_mismatched_sizes() {
        let a = Array3::<f32>::zeros((2, 2, 3));
        let b = Array3::<f32>::zeros((3, 2, 3));
        assert!(stack_batch(&[a, b]).is_err());
    }

    #[test]
    fn stack_builds_batch_dimension() {
        let a = Array3::<f32>::zeros((2, 2, 3));
        let batch = stack_batch(&[a.clone(), a]).unwrap();
        assert_eq!(batch.dim(), (2, 2, 2, 3));
    }
}
