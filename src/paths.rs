use crate::error::{OptimizeError, Result};
use crate::formats::TargetFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a run writes its output, relative to the scanned root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    output_dir: PathBuf,
    in_place: bool,
}

impl OutputLayout {
    /// Overwrite sources where they are.
    pub fn in_place(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            output_dir: root.clone(),
            root,
            in_place: true,
        }
    }

    /// Mirror the tree under `root.join(output_name)`. An absolute
    /// `output_name` replaces the root, as with [`Path::join`].
    pub fn mirrored(root: impl Into<PathBuf>, output_name: impl AsRef<Path>) -> Self {
        let root = root.into();
        Self {
            output_dir: root.join(output_name),
            root,
            in_place: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_in_place(&self) -> bool {
        self.in_place
    }

    /// Directory the scanner has to skip, if any.
    pub fn excluded_dir(&self) -> Option<&Path> {
        if self.in_place {
            None
        } else {
            Some(&self.output_dir)
        }
    }

    /// Destination for `source`. Pure; nothing is created on disk.
    pub fn destination(&self, source: &Path, target: TargetFormat) -> Result<PathBuf> {
        if self.in_place {
            return Ok(source.to_path_buf());
        }

        let relative = source
            .strip_prefix(&self.root)
            .map_err(|_| OptimizeError::OutsideRoot {
                path: source.to_path_buf(),
                root: self.root.clone(),
            })?;
        let destination = self.output_dir.join(relative);

        Ok(match target.extension_override() {
            Some(ext) => destination.with_extension(ext),
            None => destination,
        })
    }

    /// [`Self::destination`] plus creation of its parent directories.
    pub fn prepare_destination(&self, source: &Path, target: TargetFormat) -> Result<PathBuf> {
        let destination = self.destination(source, target)?;
        ensure_parent_dir(&destination)?;
        Ok(destination)
    }
}

/// Create every missing directory above `path`. Existing directories are fine.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OptimizeError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mirrored_destination() {
        let layout = OutputLayout::mirrored("/root", "optimized");
        let dest = layout
            .destination(Path::new("/root/a/b/c.png"), TargetFormat::Original)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/root/optimized/a/b/c.png"));
    }

    #[test]
    fn test_webp_replaces_extension() {
        let layout = OutputLayout::mirrored("/root", "optimized");
        let dest = layout
            .destination(Path::new("/root/a/b/c.png"), TargetFormat::WebP)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/root/optimized/a/b/c.webp"));

        let dest = layout
            .destination(Path::new("/root/holiday.v2.JPEG"), TargetFormat::WebP)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/root/optimized/holiday.v2.webp"));
    }

    #[test]
    fn test_in_place_destination_is_source() {
        let layout = OutputLayout::in_place("/root");
        let source = Path::new("/root/a/c.jpg");
        assert_eq!(
            layout.destination(source, TargetFormat::Original).unwrap(),
            source
        );
        assert!(layout.excluded_dir().is_none());
        assert_eq!(layout.output_dir(), Path::new("/root"));
    }

    #[test]
    fn test_absolute_output_name() {
        let layout = OutputLayout::mirrored("/root", "/elsewhere/out");
        assert_eq!(layout.output_dir(), Path::new("/elsewhere/out"));
        let dest = layout
            .destination(Path::new("/root/x/y.jpg"), TargetFormat::Original)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/elsewhere/out/x/y.jpg"));
    }

    #[test]
    fn test_source_outside_root() {
        let layout = OutputLayout::mirrored("/root", "optimized");
        let result = layout.destination(Path::new("/other/c.png"), TargetFormat::Original);
        assert!(matches!(result, Err(OptimizeError::OutsideRoot { .. })));
    }

    #[test]
    fn test_prepare_destination_creates_parents_idempotently() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let layout = OutputLayout::mirrored(root, "optimized");
        let source = root.join("a/b/c.png");

        let first = layout
            .prepare_destination(&source, TargetFormat::Original)
            .unwrap();
        assert!(root.join("optimized/a/b").is_dir());

        let second = layout
            .prepare_destination(&source, TargetFormat::Original)
            .unwrap();
        assert_eq!(first, second);
        assert!(!first.exists());
    }

    #[test]
    fn test_ensure_parent_dir_reports_io_cause() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("taken");
        fs::write(&blocker, b"file, not a directory").unwrap();

        let err = ensure_parent_dir(&blocker.join("sub/photo.jpg")).unwrap_err();
        match err {
            OptimizeError::DirectoryCreationFailed { path, source } => {
                assert_eq!(path, blocker.join("sub"));
                assert!(!source.to_string().is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ensure_parent_dir_without_parent() {
        assert!(ensure_parent_dir(Path::new("bare.jpg")).is_ok());
    }
}
