//! Error types for document rendering, diffing and encoding

use thiserror::Error;

/// Result type alias for pagediff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the diff compositor and pixel buffer validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The two inputs do not share width and height
    #[error("input widths and heights must be equal: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(u32, u32, u32, u32),

    /// An input has fewer than three channels and cannot be compared as RGB
    #[error("expected at least 3 channels for RGB comparison, got {0}")]
    UnsupportedChannels(u8),

    /// Width, stride, channel count and sample length are inconsistent
    #[error("invalid pixel buffer layout: {0}")]
    InvalidLayout(String),
}

/// Errors that can occur while producing a page diff
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or parse a document
    #[error("Failed to open document {path}: {reason}")]
    OpenError { path: String, reason: String },

    /// No backend handles this kind of document
    #[error("Unsupported document type: {0}")]
    UnsupportedDocument(String),

    /// Requested page does not exist
    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    /// Failed to rasterize a page
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Comparison of the two renders failed
    #[error("Could not compare images: {0}")]
    Diff(#[from] DiffError),

    /// The output argument does not name a known encoding
    #[error("Could not infer type of output file: {0}")]
    UnknownOutputFormat(String),

    /// Failed to encode or write the diff image
    #[error("Failed to write {format} output to {destination}: {reason}")]
    EncodeError {
        format: String,
        destination: String,
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
