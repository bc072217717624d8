//! Notebook file discovery.
//!
//! Lists the notebooks directly inside each configured root, skipping the
//! executed copies a docs build leaves next to their sources.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use nbgallery_shared::{GallerySettings, GalleryError, Result};

/// Finds candidate notebook files under a set of directory roots.
#[derive(Debug, Clone)]
pub struct NotebookScanner {
    roots: Vec<PathBuf>,
    extension: String,
    skip_suffix: String,
}

impl NotebookScanner {
    /// Scanner over explicit roots.
    pub fn new(
        roots: Vec<PathBuf>,
        extension: impl Into<String>,
        skip_suffix: impl Into<String>,
    ) -> Self {
        Self {
            roots,
            extension: extension.into(),
            skip_suffix: skip_suffix.into(),
        }
    }

    /// Scanner over the notebook directories of a gallery configuration.
    pub fn from_settings(settings: &GallerySettings) -> Self {
        Self::new(
            settings.notebook_dirs.clone(),
            settings.extension.clone(),
            settings.skip_suffix.clone(),
        )
    }

    /// Notebook paths across all roots, sorted by path.
    ///
    /// A root that does not exist contributes nothing.
    #[instrument(skip(self), fields(roots = self.roots.len()))]
    pub fn scan(&self) -> Result<std::vec::IntoIter<PathBuf>> {
        let mut paths = Vec::new();
        for root in &self.roots {
            self.scan_root(root, &mut paths)?;
        }
        paths.sort();

        debug!(count = paths.len(), "notebooks found");
        Ok(paths.into_iter())
    }

    fn scan_root(&self, root: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "notebook root missing, skipping");
                return Ok(());
            }
            Err(e) => return Err(GalleryError::io(root, e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| GalleryError::io(root, e))?;
            let path = entry.path();
            if path.is_file() && self.is_candidate(&path) {
                paths.push(path);
            }
        }
        Ok(())
    }

    fn is_candidate(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.extension);
        let derived = !self.skip_suffix.is_empty()
            && path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(&self.skip_suffix));
        has_extension && !derived
    }
}
