//! Errors raised while writing rendered images.

use thiserror::Error;

/// Errors that can occur when an image leaves the renderer.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Expected {expected} pixels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;
