use crate::error::Result;
use crate::formats::has_supported_extension;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Recursive image discovery under a root directory.
///
/// Each call to [`Scanner::candidates`] starts a fresh traversal, so the same
/// scanner can be walked again after a run has written output.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    excluded: Option<PathBuf>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: None,
        }
    }

    /// Skip everything at or below `dir`. Used for the output directory when
    /// not writing in place.
    pub fn exclude(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded = Some(dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every file below the root, unfiltered by extension.
    ///
    /// Excluded subtrees are pruned rather than filtered, so the walker never
    /// descends into them.
    pub fn entries(&self) -> impl Iterator<Item = Result<DirEntry>> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) if is_regular_file(&entry) => Some(Ok(entry)),
                Ok(_) => None,
                Err(e) => Some(Err(e.into())),
            })
    }

    /// Supported images below the root. Order is unspecified.
    pub fn candidates(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        self.entries().filter_map(|entry| match entry {
            Ok(entry) if is_candidate(entry.path()) => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
    }

    fn is_excluded(&self, path: &Path) -> bool {
        match &self.excluded {
            Some(dir) => path.starts_with(dir),
            None => false,
        }
    }
}

/// Filtering predicate applied to walked files.
pub fn is_candidate(path: &Path) -> bool {
    has_supported_extension(path)
}

// Symlinks count when they resolve to a regular file.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink() && entry.path().is_file()
}
