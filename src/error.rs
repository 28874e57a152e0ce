//! Render errors.

use std::path::PathBuf;

/// Errors that can abort a render.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Canvas must be at least 1x1, got {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Failed to create file {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
