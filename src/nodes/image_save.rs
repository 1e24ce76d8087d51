//! Batch image saver with auto-incrementing filenames.
//!
//! Each call:
//!
//! 1. Aborts with no result when the output path is blank.
//! 2. Creates the output directory (and parents) if it is missing.
//! 3. Scans the directory once for files matching the
//!    [`FilenamePattern`] and starts counting at `max + 1`.
//! 4. Validates the extension, falling back to `png` with a warning.
//! 5. Writes the batch in order. The counter only advances after a
//!    successful write, so a failed image leaves its number for the next one.
//!
//! Per-image failures are logged and skipped; the returned list holds only
//! the files actually written.

use super::{InputSpec, Inputs, Node, NodeError, NodeSchema, OutputSpec};
use crate::imaging::{
    ALLOWED_EXTENSIONS, BackendError, Dpi, EncodeOptions, Extension, ImageBackend, Quality,
    RustBackend, WriteParams, tensor_to_image,
};
use crate::naming::FilenamePattern;
use crate::value::{ImageBatch, SlotType, Value};
use ndarray::ArrayView3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Naming and encoding settings for one save call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveOptions {
    /// Target directory. Blank means "no result".
    pub output_path: String,
    pub filename_prefix: String,
    pub filename_delimiter: String,
    /// Minimum digits in the counter (1-9).
    pub filename_number_padding: usize,
    /// Put the counter before the prefix (`0001_Pixit.png`).
    pub filename_number_start: bool,
    /// One of `png, jpg, jpeg, gif, tiff, bmp`; anything else saves as PNG.
    pub extension: String,
    pub dpi: u32,
    pub quality: u32,
    pub optimize_image: bool,
    /// Embedded as a `prompt` text field in PNG output when non-blank.
    pub prompt: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            output_path: String::new(),
            filename_prefix: "Pixit".to_string(),
            filename_delimiter: "_".to_string(),
            filename_number_padding: 4,
            filename_number_start: false,
            extension: "png".to_string(),
            dpi: 300,
            quality: 95,
            optimize_image: true,
            prompt: String::new(),
        }
    }
}

impl SaveOptions {
    /// Padding is clamped to 1-9 digits.
    fn pattern(&self) -> FilenamePattern {
        FilenamePattern::new(
            &self.filename_prefix,
            &self.filename_delimiter,
            self.filename_number_padding.clamp(1, 9),
            self.filename_number_start,
        )
    }

    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            quality: Quality::new(self.quality),
            dpi: Dpi::new(self.dpi),
            optimize: self.optimize_image,
            prompt: json_prompt(&self.prompt),
        }
    }
}

/// JSON-encode a prompt for the PNG `prompt` field.
///
/// Non-ASCII characters are written as `\uXXXX` escapes (UTF-16 surrogate
/// pairs outside the BMP) so the value fits a Latin-1 `tEXt` chunk. Returns
/// `None` for a blank prompt.
pub fn json_prompt(prompt: &str) -> Option<String> {
    if prompt.trim().is_empty() {
        return None;
    }
    let json = serde_json::Value::from(prompt).to_string();
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Some(out)
}

/// Saves image batches to disk.
pub struct ImageSave<B = RustBackend> {
    backend: B,
}

impl ImageSave {
    pub fn new() -> Self {
        Self {
            backend: RustBackend::new(),
        }
    }
}

impl Default for ImageSave {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImageBackend> ImageSave<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Save every image in `images`, returning the absolute paths written.
    ///
    /// Returns `None` when the output path is blank or the output directory
    /// cannot be created or listed.
    pub fn save_images(&self, images: &ImageBatch, opts: &SaveOptions) -> Option<Vec<PathBuf>> {
        if opts.output_path.trim().is_empty() {
            error!("Please define an output path");
            return None;
        }
        let dir = Path::new(&opts.output_path);
        if !dir.exists() {
            warn!(
                "The path `{}` specified doesn't exist! Creating directory.",
                dir.display()
            );
            if let Err(e) = fs::create_dir_all(dir) {
                error!("Unable to create directory `{}`: {e}", dir.display());
                return None;
            }
        }

        let pattern = opts.pattern();
        let mut counter = match pattern.next_counter(dir) {
            Ok(counter) => counter,
            Err(e) => {
                error!("Unable to list `{}`: {e}", dir.display());
                return None;
            }
        };

        let (extension, fell_back) = Extension::parse_or_png(&opts.extension);
        if fell_back {
            let mut valid: Vec<String> =
                ALLOWED_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();
            valid.sort();
            warn!(
                "The extension `{}` is not valid. The valid formats are: {}",
                opts.extension,
                valid.join(", ")
            );
        }
        let suffix = extension.to_string();
        let encode = opts.encode_options();

        let mut output_files = Vec::new();
        for (index, image) in images.outer_iter().enumerate() {
            let file = pattern.format(counter, &suffix);
            match self.save_one(image, &dir.join(&file), &extension, &encode) {
                Ok(path) => {
                    info!("Image file saved to: {}", path.display());
                    counter += 1;
                    output_files.push(path);
                }
                Err(BackendError::Io(e)) => {
                    error!(index, "Unable to save file to: {}: {e}", dir.join(&file).display());
                }
                Err(e) => {
                    error!(index, "Unable to save file due to the following error: {e}");
                }
            }
        }
        Some(output_files)
    }

    fn save_one(
        &self,
        image: ArrayView3<'_, f32>,
        target: &Path,
        extension: &Extension,
        encode: &EncodeOptions,
    ) -> Result<PathBuf, BackendError> {
        let output = std::path::absolute(target)?;
        let img = tensor_to_image(image)?;
        let params = WriteParams::for_extension(output.clone(), extension, encode);
        self.backend.write(&img, &params)?;
        Ok(output)
    }
}

fn flag(inputs: &Inputs, name: &str) -> Result<bool, NodeError> {
    Ok(inputs.get_str(name)? == "true")
}

fn unsigned(inputs: &Inputs, name: &str) -> Result<u32, NodeError> {
    Ok(inputs.get_int(name)?.clamp(0, i64::from(u32::MAX)) as u32)
}

impl<B: ImageBackend> Node for ImageSave<B> {
    fn schema(&self) -> NodeSchema {
        let defaults = SaveOptions::default();
        NodeSchema {
            required: vec![
                InputSpec::new("images", SlotType::Image),
                InputSpec::string("output_path", &defaults.output_path),
                InputSpec::string("filename_prefix", &defaults.filename_prefix),
                InputSpec::string("filename_delimiter", &defaults.filename_delimiter),
                InputSpec::int("filename_number_padding", 4, 1, 9),
                InputSpec::combo("filename_number_start", &["false", "true"]),
                InputSpec::combo("extension", ALLOWED_EXTENSIONS),
                InputSpec::int("dpi", 300, 1, 2400),
                InputSpec::int("quality", 95, 1, 100),
                InputSpec::combo("optimize_image", &["true", "false"]),
                InputSpec::string("prompt", &defaults.prompt),
            ],
            optional: Vec::new(),
            outputs: vec![OutputSpec::new(SlotType::String)],
            category: None,
            output_node: true,
        }
    }

    fn execute(&self, inputs: &Inputs) -> Result<Vec<Value>, NodeError> {
        let images = inputs.get_images("images")?;
        let opts = SaveOptions {
            output_path: inputs.get_str("output_path")?.to_string(),
            filename_prefix: inputs.get_str("filename_prefix")?.to_string(),
            filename_delimiter: inputs.get_str("filename_delimiter")?.to_string(),
            filename_number_padding: unsigned(inputs, "filename_number_padding")? as usize,
            filename_number_start: flag(inputs, "filename_number_start")?,
            extension: inputs.get_str("extension")?.to_string(),
            dpi: unsigned(inputs, "dpi")?,
            quality: unsigned(inputs, "quality")?,
            optimize_image: flag(inputs, "optimize_image")?,
            prompt: inputs.get_str("prompt")?.to_string(),
        };
        Ok(match self.save_images(images, &opts) {
            Some(paths) => vec![Value::Strings(
                paths
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
            )],
            None => Vec::new(),
        })
    }
}
