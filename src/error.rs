use crate::constants::{
    EXIT_CONFIG_ERROR, EXIT_FILE_FAILURES, EXIT_MISSING_DEPENDENCY, MAX_QUALITY,
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("JPEG encoding error: {0}")]
    JpegEncoding(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Cannot use --in-place with --out. Choose one.")]
    ConflictingOutput,

    #[error("Cannot use --in-place with --webp: in-place mode only re-encodes in the original format")]
    InPlaceConversion,

    #[error("Invalid quality value: {0}. Must be between 0 and {}", MAX_QUALITY)]
    InvalidQuality(u8),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Path {path} is not under root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Failed to create output directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} support is not available in this build")]
    MissingDependency(String),
}

impl OptimizeError {
    /// Configuration errors are detected before any file is touched.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            OptimizeError::RootNotFound(_)
                | OptimizeError::RootNotDirectory(_)
                | OptimizeError::ConflictingOutput
                | OptimizeError::InPlaceConversion
                | OptimizeError::InvalidQuality(_)
        )
    }

    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_config_error() {
            EXIT_CONFIG_ERROR
        } else if matches!(self, OptimizeError::MissingDependency(_)) {
            EXIT_MISSING_DEPENDENCY
        } else {
            EXIT_FILE_FAILURES
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
