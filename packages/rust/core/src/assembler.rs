//! Gallery assembler.
//!
//! Groups staged images into ordered sections, renders the page, and commits
//! thumbnails and page to disk once everything has been derived.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use nbgallery_shared::{GalleryError, GallerySettings, Result, Section, SectionTable};

use crate::extract::StagedImage;

/// Metadata for a single file written by a build.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ArtifactMeta {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// A rendered gallery that has not been written yet.
#[derive(Debug, Clone)]
pub struct AssembledGallery {
    /// Non-empty sections in page order.
    pub sections: Vec<Section>,
    /// The complete page text.
    pub page: String,
}

/// Group images by section, in section table order.
///
/// Images keep their encounter order within a section; sections without
/// images are left out.
pub fn group_sections(staged: &[StagedImage], table: &SectionTable) -> Vec<Section> {
    table
        .ordered_titles()
        .into_iter()
        .filter_map(|title| {
            let images: Vec<_> = staged
                .iter()
                .filter(|s| s.section == title)
                .map(|s| s.image.clone())
                .collect();
            (!images.is_empty()).then(|| Section {
                title: title.to_string(),
                images,
            })
        })
        .collect()
}

/// Group and render the page for a set of staged images.
#[instrument(skip_all, fields(images = staged.len()))]
pub fn assemble(settings: &GallerySettings, staged: &[StagedImage]) -> AssembledGallery {
    let sections = group_sections(staged, &settings.sections);
    let page = nbgallery_render::render_page(&settings.page_title, &sections);

    debug!(sections = sections.len(), "gallery assembled");
    AssembledGallery { sections, page }
}

/// Write every thumbnail, then the page.
///
/// Each file is written to a temporary sibling and renamed into place.
/// Thumbnails sharing a path are written once, with the last one winning.
#[instrument(skip_all, fields(images = staged.len(), page = %settings.page_path.display()))]
pub fn commit(
    settings: &GallerySettings,
    staged: &[StagedImage],
    page: &str,
) -> Result<Vec<ArtifactMeta>> {
    let mut thumbnails: BTreeMap<PathBuf, &[u8]> = BTreeMap::new();
    for s in staged {
        let path = settings.gallery_dir.join(&s.image.thumbnail);
        if thumbnails.insert(path.clone(), &s.thumbnail_png).is_some() {
            warn!(
                path = %path.display(),
                source = %s.source.display(),
                "duplicate thumbnail path, later image replaces earlier one"
            );
        }
    }

    let mut metas = Vec::with_capacity(thumbnails.len() + 1);
    for (path, bytes) in thumbnails {
        metas.push(write_atomic(&path, bytes)?);
    }
    metas.push(write_atomic(&settings.page_path, page.as_bytes())?);

    info!(count = metas.len(), "gallery artifacts written");
    Ok(metas)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write `bytes` to `path` via a temporary file in the same directory.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<ArtifactMeta> {
    let parent = path
        .parent()
        .ok_or_else(|| GalleryError::io(path, std::io::ErrorKind::InvalidInput.into()))?;
    std::fs::create_dir_all(parent).map_err(|e| GalleryError::io(parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = parent.join(format!(".{file_name}.tmp"));

    if let Err(e) = std::fs::write(&temp, bytes) {
        let _ = std::fs::remove_file(&temp);
        return Err(GalleryError::io(&temp, e));
    }
    std::fs::rename(&temp, path).map_err(|e| GalleryError::io(path, e))?;

    let hash = format!("{:x}", Sha256::digest(bytes));
    debug!(path = %path.display(), size = bytes.len(), "wrote artifact");

    Ok(ArtifactMeta {
        path: path.to_path_buf(),
        sha256: hash,
        size_bytes: bytes.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
