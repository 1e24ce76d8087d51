//! Pure Rust image writing backend.
//!
//! ## Crate mapping
//!
//! | Format | Crate / function |
//! |---|---|
//! | PNG (+ `tEXt` metadata) | `png::Encoder` with `add_text_chunk` |
//! | JPEG (+ JFIF density) | `image::codecs::jpeg::JpegEncoder` |
//! | GIF | `image` crate, written as RGBA |
//! | TIFF, BMP | `image` crate |
//!
//! Every format is encoded into a buffer first, so a file only appears once
//! its encoder has succeeded.

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, WriteParams};
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{ColorType, DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;

/// Backend using the `image` and `png` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// PNG through the `png` crate so prompt text can ride along as `tEXt` chunks.
fn encode_png(img: &DynamicImage, params: &WriteParams) -> Result<Vec<u8>, BackendError> {
    let (color, data) = match img.color() {
        ColorType::L8 => (png::ColorType::Grayscale, img.to_luma8().into_raw()),
        ColorType::La8 => (png::ColorType::GrayscaleAlpha, img.to_luma_alpha8().into_raw()),
        ColorType::Rgba8 => (png::ColorType::Rgba, img.to_rgba8().into_raw()),
        _ => (png::ColorType::Rgb, img.to_rgb8().into_raw()),
    };

    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, img.width(), img.height());
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(if params.optimize {
        png::Compression::Best
    } else {
        png::Compression::Default
    });
    for (keyword, text) in &params.text {
        encoder.add_text_chunk(keyword.clone(), text.clone())?;
    }
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&data)?;
    png_writer.finish()?;
    Ok(buf)
}

fn encode_jpeg(img: &DynamicImage, params: &WriteParams) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let quality = params.quality.unwrap_or_default().value();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    if let Some(dpi) = params.dpi {
        encoder.set_pixel_density(PixelDensity::dpi(dpi.value()));
    }
    img.write_with_encoder(encoder)?;
    Ok(buf)
}

fn encode_with_format(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, BackendError> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, format)?;
    Ok(cursor.into_inner())
}

impl ImageBackend for RustBackend {
    /// Encodes fully in memory, then writes the file in one go. An encoder
    /// error leaves nothing on disk.
    fn write(&self, image: &DynamicImage, params: &WriteParams) -> Result<(), BackendError> {
        let bytes = match params.format {
            OutputFormat::Png => encode_png(image, params)?,
            OutputFormat::Jpeg => encode_jpeg(image, params)?,
            // GIF frames are palettized from RGBA.
            OutputFormat::Gif => {
                encode_with_format(&DynamicImage::ImageRgba8(image.to_rgba8()), ImageFormat::Gif)?
            }
            OutputFormat::Tiff => encode_with_format(image, ImageFormat::Tiff)?,
            OutputFormat::Bmp => encode_with_format(image, ImageFormat::Bmp)?,
        };
        fs::write(&params.output, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::{Dpi, Quality};
    use image::{GrayAlphaImage, ImageReader, Rgb, RgbImage};
    use std::fs::File;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_image() -> DynamicImage {
        let mut img = RgbImage::new(8, 6);
        img.put_pixel(3, 2, Rgb([200, 10, 40]));
        DynamicImage::ImageRgb8(img)
    }

    fn params(path: &Path, format: OutputFormat) -> WriteParams {
        WriteParams {
            output: path.to_path_buf(),
            format,
            quality: Some(Quality::new(90)),
            dpi: Some(Dpi::new(300)),
            optimize: true,
            text: Vec::new(),
        }
    }

    fn read_png_text(path: &Path) -> Vec<(String, String)> {
        let decoder = png::Decoder::new(File::open(path).unwrap());
        let reader = decoder.read_info().unwrap();
        reader
            .info()
            .uncompressed_latin1_text
            .iter()
            .map(|chunk| (chunk.keyword.clone(), chunk.text.clone()))
            .collect()
    }

    #[test]
    fn png_is_written_with_text_chunk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let mut p = params(&path, OutputFormat::Png);
        p.text = vec![("prompt".into(), "\"a red fox\"".into())];

        RustBackend::new().write(&test_image(), &p).unwrap();

        assert_eq!(
            read_png_text(&path),
            vec![("prompt".to_string(), "\"a red fox\"".to_string())]
        );
        let decoded = ImageReader::open(&path).unwrap().decode().unwrap();
        assert_eq!(decoded.to_rgb8().get_pixel(3, 2).0, [200, 10, 40]);
    }

    #[test]
    fn png_without_text_has_no_chunks() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.png");
        RustBackend::new()
            .write(&test_image(), &params(&path, OutputFormat::Png))
            .unwrap();
        assert!(read_png_text(&path).is_empty());
    }

    #[test]
    fn jpeg_decodes_with_same_dimensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.jpg");
        RustBackend::new()
            .write(&test_image(), &params(&path, OutputFormat::Jpeg))
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(image::image_dimensions(&path).unwrap(), (8, 6));
    }

    #[test]
    fn gif_tiff_and_bmp_are_decodable() {
        let tmp = TempDir::new().unwrap();
        for (name, format, expected) in [
            ("out.gif", OutputFormat::Gif, ImageFormat::Gif),
            ("out.tiff", OutputFormat::Tiff, ImageFormat::Tiff),
            ("out.bmp", OutputFormat::Bmp, ImageFormat::Bmp),
        ] {
            let path = tmp.path().join(name);
            RustBackend::new()
                .write(&test_image(), &params(&path, format))
                .unwrap();
            let reader = ImageReader::open(&path)
                .unwrap()
                .with_guessed_format()
                .unwrap();
            assert_eq!(reader.format(), Some(expected), "{name}");
            assert_eq!(reader.into_dimensions().unwrap(), (8, 6), "{name}");
        }
    }

    #[test]
    fn write_into_missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("out.png");
        let result = RustBackend::new().write(&test_image(), &params(&path, OutputFormat::Png));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn failed_encode_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gray.tiff");
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::new(2, 2));

        let result = RustBackend::new().write(&img, &params(&path, OutputFormat::Tiff));

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn empty_image_leaves_no_file() {
        let tmp = TempDir::new().unwrap();
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        for (name, format) in [
            ("empty.png", OutputFormat::Png),
            ("empty.jpg", OutputFormat::Jpeg),
            ("empty.tiff", OutputFormat::Tiff),
        ] {
            let path = tmp.path().join(name);
            assert!(
                RustBackend::new().write(&empty, &params(&path, format)).is_err(),
                "{name}"
            );
            assert!(!path.exists(), "{name}");
        }
    }
}
