//! Image format handling for the optimizer.
//!
//! `SourceFormat` is the codec family of a scanned file, `TargetFormat` is
//! what the run writes: the same family again, or WebP.

use crate::constants::{SUPPORTED_IMAGE_EXTENSIONS, WEBP_EXTENSION};
use crate::error::{OptimizeError, Result};
use std::fmt;
use std::path::Path;

/// Codec family of an input file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.jpg` / `.jpeg`
    Jpeg,
    /// `.png`
    Png,
}

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            "png" => Some(SourceFormat::Png),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| OptimizeError::UnsupportedFormat(path.display().to_string()))
    }

    pub fn is_jpeg_family(&self) -> bool {
        matches!(self, SourceFormat::Jpeg)
    }
}

/// Output codec selected for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFormat {
    /// Re-encode each file in its own codec family.
    #[default]
    Original,
    /// Convert every file to lossy WebP.
    WebP,
}

impl TargetFormat {
    pub fn from_webp_flag(webp: bool) -> Self {
        if webp {
            TargetFormat::WebP
        } else {
            TargetFormat::Original
        }
    }

    /// Replacement extension, if this target changes it.
    pub fn extension_override(&self) -> Option<&'static str> {
        match self {
            TargetFormat::Original => None,
            TargetFormat::WebP => Some(WEBP_EXTENSION),
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFormat::Original => write!(f, "original"),
            TargetFormat::WebP => write!(f, "WebP"),
        }
    }
}

/// True when the extension of `path` is one the scanner accepts, ignoring case.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}
