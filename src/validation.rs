use crate::constants::{DEFAULT_OUTPUT_DIR, MAX_QUALITY};
use crate::error::{OptimizeError, Result};
use crate::formats::TargetFormat;
use std::env;
use std::path::{Path, PathBuf};

/// Check that the root exists and is a directory, and return it canonicalized.
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(OptimizeError::RootNotFound(absolute_for_display(root)));
    }
    if !root.is_dir() {
        return Err(OptimizeError::RootNotDirectory(absolute_for_display(root)));
    }

    root.canonicalize()
        .map_err(|_| OptimizeError::RootNotFound(root.to_path_buf()))
}

/// `--in-place` cannot be combined with a custom `--out`. Passing the
/// default name explicitly is allowed.
pub fn validate_output_choice(in_place: bool, output_name: &str) -> Result<()> {
    if in_place && output_name != DEFAULT_OUTPUT_DIR {
        return Err(OptimizeError::ConflictingOutput);
    }
    Ok(())
}

pub fn validate_target(in_place: bool, target: TargetFormat) -> Result<()> {
    if in_place && target != TargetFormat::Original {
        return Err(OptimizeError::InPlaceConversion);
    }
    Ok(())
}

/// Zero is a valid, if extreme, setting for both lossy encoders.
pub fn validate_quality(quality: u8) -> Result<()> {
    if quality > MAX_QUALITY {
        return Err(OptimizeError::InvalidQuality(quality));
    }
    Ok(())
}

fn absolute_for_display(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
