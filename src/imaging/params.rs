//! Parameter types for image writes.
//!
//! These structs describe *what* to write, not *how* to write it. They are the
//! interface between the [`ImageSave`](crate::nodes::ImageSave) node (which
//! decides filenames and per-format options) and the
//! [`backend`](super::backend) (which does the actual encoding). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing the save logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`Dpi`] — Print density (1–2400, default 300). Clamped on construction.
//! - [`OutputFormat`] — The raster encoder a write goes through.
//! - [`Extension`] — A validated file extension from the allow-list, with PNG fallback.
//! - [`WriteParams`] — Full specification for one file write.

use std::fmt;
use std::path::PathBuf;

/// Extensions accepted by the image saver, in the order the host lists them.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "tiff", "bmp"];

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Dots per inch written into formats that carry a density header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dpi(pub u16);

impl Dpi {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 2400) as u16)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self(300)
    }
}

/// Encoder selected for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
    Tiff,
    Bmp,
}

impl OutputFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

/// A file extension that passed the allow-list.
///
/// Keeps the spelling the caller asked for (`jpg` and `jpeg` both map to
/// [`OutputFormat::Jpeg`] but produce different suffixes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    suffix: String,
    format: OutputFormat,
}

impl Extension {
    /// Validate `requested` against [`ALLOWED_EXTENSIONS`].
    ///
    /// Matching is case-sensitive. Returns `None` for anything outside the list.
    pub fn parse(requested: &str) -> Option<Self> {
        OutputFormat::from_extension(requested).map(|format| Self {
            suffix: requested.to_string(),
            format,
        })
    }

    /// Validate `requested`, substituting `png` when it is not allowed.
    ///
    /// The second element is `true` when the fallback was taken so the caller
    /// can warn about it.
    pub fn parse_or_png(requested: &str) -> (Self, bool) {
        match Self::parse(requested) {
            Some(ext) => (ext, false),
            None => (Self::png(), true),
        }
    }

    pub fn png() -> Self {
        Self {
            suffix: "png".to_string(),
            format: OutputFormat::Png,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.suffix)
    }
}

/// Parameters for writing one image to disk.
///
/// Fields a format does not support are left at `None`/empty by
/// [`WriteParams::for_extension`], so a backend can write whatever it is
/// handed without re-deciding the per-format rules.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteParams {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Option<Quality>,
    pub dpi: Option<Dpi>,
    pub optimize: bool,
    /// `(keyword, text)` pairs for PNG `tEXt` chunks.
    pub text: Vec<(String, String)>,
}

/// The user-facing encoding knobs, before the per-format matrix is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    pub quality: Quality,
    pub dpi: Dpi,
    pub optimize: bool,
    /// Already JSON-encoded prompt, or `None` when no prompt was supplied.
    pub prompt: Option<String>,
}

impl WriteParams {
    /// Apply the per-format option matrix:
    ///
    /// | format | quality | dpi | optimize | prompt text |
    /// |---|---|---|---|---|
    /// | jpeg | yes | yes | yes | no |
    /// | tiff | yes | no | yes | no |
    /// | bmp | no | no | no | no |
    /// | png / gif | no | no | yes | yes (PNG only carries it) |
    pub fn for_extension(output: PathBuf, ext: &Extension, opts: &EncodeOptions) -> Self {
        let prompt_text = || {
            opts.prompt
                .iter()
                .map(|p| ("prompt".to_string(), p.clone()))
                .collect::<Vec<_>>()
        };
        let format = ext.format();
        match format {
            OutputFormat::Jpeg => Self {
                output,
                format,
                quality: Some(opts.quality),
                dpi: Some(opts.dpi),
                optimize: opts.optimize,
                text: Vec::new(),
            },
            OutputFormat::Bmp => Self {
                output,
                format,
                quality: None,
                dpi: None,
                optimize: false,
                text: Vec::new(),
            },
            OutputFormat::Tiff => Self {
                output,
                format,
                quality: Some(opts.quality),
                dpi: None,
                optimize: opts.optimize,
                text: Vec::new(),
            },
            OutputFormat::Png | OutputFormat::Gif => Self {
                output,
                format,
                quality: None,
                dpi: None,
                optimize: opts.optimize,
                text: prompt_text(),
            },
        }
    }
}
