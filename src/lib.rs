//! pagediff
//!
//! Renders one page from each of two documents and produces an RGBA image in
//! which every pixel whose RGB samples differ between the two renders is
//! painted semi-transparent red. Unchanged pixels stay fully transparent, so
//! the result can be laid over either render.
//!
//! # Backends
//!
//! - **PDF** (`pdf` feature, default): pages rasterized with `hayro`
//! - **Raster images**: PNG, PNM/PAM, JPEG, BMP, GIF and TIFF files are
//!   treated as one-page documents
//!
//! # Example
//!
//! ```no_run
//! use pagediff::{OutputTarget, RenderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RenderConfig { scale: 2.0 };
//! let diff = pagediff::diff_pages("before.pdf", 0, "after.pdf", 0, &config)?;
//! OutputTarget::parse("diff.png")?.write(&diff)?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod error;
pub use error::{DiffError, Error, Result};

pub mod rendering;
pub use rendering::diff::{compare, DiffSummary, DIFF_MARK};
pub use rendering::encode::{Destination, OutputFormat, OutputTarget};
pub use rendering::PixelBuffer;

// Raster image files as single-page documents
pub mod bitmap;

#[cfg(feature = "pdf")]
pub mod pdf;

/// Rendering configuration shared by all document backends
///
/// # Examples
///
/// ```
/// let cfg = pagediff::RenderConfig::default();
/// assert_eq!(cfg.scale, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Render scale factor; 1.0 renders PDF pages at 72 dpi
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::ConfigError(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// An opened document that can rasterize its pages
pub trait Document {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Rasterize the zero-based `page` to an opaque RGB buffer
    fn rasterize(&self, page: usize) -> Result<PixelBuffer>;
}

/// Open `path` with the backend matching its extension.
pub fn open_document(path: &Path, config: &RenderConfig) -> Result<Box<dyn Document>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if ext == "pdf" {
        return open_pdf(path, config);
    }
    if image::ImageFormat::from_path(path).is_ok() {
        return Ok(Box::new(bitmap::BitmapDocument::open(path)?));
    }
    Err(Error::UnsupportedDocument(path.display().to_string()))
}

#[cfg(feature = "pdf")]
fn open_pdf(path: &Path, config: &RenderConfig) -> Result<Box<dyn Document>> {
    Ok(Box::new(pdf::PdfDocument::open(path, config)?))
}

#[cfg(not(feature = "pdf"))]
fn open_pdf(path: &Path, _config: &RenderConfig) -> Result<Box<dyn Document>> {
    Err(Error::UnsupportedDocument(format!(
        "{} (built without the `pdf` feature)",
        path.display()
    )))
}

/// Render `page1` of `file1` and `page2` of `file2`, then diff the renders.
///
/// Both documents are opened before either page is rasterized, so a bad
/// second path is reported without rendering anything.
pub fn diff_pages(
    file1: impl AsRef<Path>,
    page1: usize,
    file2: impl AsRef<Path>,
    page2: usize,
    config: &RenderConfig,
) -> Result<PixelBuffer> {
    config.validate()?;
    let doc1 = open_document(file1.as_ref(), config)?;
    let doc2 = open_document(file2.as_ref(), config)?;

    let pix1 = doc1.rasterize(page1)?;
    let pix2 = doc2.rasterize(page2)?;

    Ok(compare(&pix1, &pix2)?)
}
