//! Lazy extraction of gallery images from scanned notebooks.
//!
//! [`GalleryImages`] pulls one notebook at a time from the scanner, turns
//! each of its markers into a [`StagedImage`], and yields them in scan order,
//! then cell order, then output order. Nothing is written to disk here.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use nbgallery_notebook::{NotebookScanner, detect_markers, parse_notebook};
use nbgallery_shared::{GalleryImage, GallerySettings, NotebookRecord, Result};

use crate::anchor::sanitize;
use crate::category::classify;
use crate::thumbnail::ThumbnailGenerator;
use crate::title::resolve_title;

/// A fully derived gallery image whose thumbnail has not been written yet.
#[derive(Debug, Clone)]
pub struct StagedImage {
    /// The card as it appears on the page.
    pub image: GalleryImage,
    /// Section title the image is grouped under.
    pub section: String,
    /// Notebook the image was extracted from.
    pub source: PathBuf,
    /// Encoded PNG thumbnail.
    pub thumbnail_png: Vec<u8>,
}

/// Iterator over every gallery image in the configured notebooks.
///
/// Yields `Err` at most once; iteration stops after the first failure so
/// later notebooks are never read.
pub struct GalleryImages<'s> {
    settings: &'s GallerySettings,
    generator: ThumbnailGenerator,
    notebooks: std::vec::IntoIter<PathBuf>,
    pending: VecDeque<StagedImage>,
    notebooks_read: usize,
    failed: bool,
}

impl<'s> GalleryImages<'s> {
    /// Scan the configured notebook directories and prepare to extract.
    pub fn new(settings: &'s GallerySettings) -> Result<Self> {
        let notebooks = NotebookScanner::from_settings(settings).scan()?;
        Ok(Self::from_paths(settings, notebooks.collect()))
    }

    /// Extract from an explicit, already ordered list of notebooks.
    pub fn from_paths(settings: &'s GallerySettings, notebooks: Vec<PathBuf>) -> Self {
        Self {
            settings,
            generator: ThumbnailGenerator::new(settings.thumbnail),
            notebooks: notebooks.into_iter(),
            pending: VecDeque::new(),
            notebooks_read: 0,
            failed: false,
        }
    }

    /// Number of notebooks processed so far.
    pub fn notebooks_read(&self) -> usize {
        self.notebooks_read
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract_notebook(&self, path: &Path) -> Result<Vec<StagedImage>> {
        let settings = self.settings;
        let record = NotebookRecord::new(path, &settings.source_dir, &settings.examples_dir);
        let notebook = parse_notebook(path)?;

        let mut staged = Vec::new();
        for marker in detect_markers(&notebook) {
            let title = resolve_title(marker.preceding);
            let anchor = sanitize(&title);
            let (category, section) = classify(marker.category, &settings.sections, path)?;
            let thumbnail_png = self.generator.encode(&marker.payload, path)?;

            let image = GalleryImage {
                thumbnail: settings
                    .thumbnails_dir
                    .join(format!("{}-{anchor}.png", record.stem)),
                target: link_target(&record, &anchor, settings),
                title,
                category,
            };
            debug!(title = %image.title, target = %image.target, "staged gallery image");

            staged.push(StagedImage {
                image,
                section: section.to_string(),
                source: path.to_path_buf(),
                thumbnail_png,
            });
        }

        Ok(staged)
    }
}

impl Iterator for GalleryImages<'_> {
    type Item = Result<StagedImage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(image) = self.pending.pop_front() {
                return Some(Ok(image));
            }
            if self.failed {
                return None;
            }

            let path = self.notebooks.next()?;
            self.notebooks_read += 1;
            match self.extract_notebook(&path) {
                Ok(images) => self.pending.extend(images),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Site link for an image anchor.
///
/// Example notebooks are embedded in the reference page named after them;
/// any other notebook is rendered at its own path.
pub fn link_target(record: &NotebookRecord, anchor: &str, settings: &GallerySettings) -> String {
    if record.in_examples {
        format!(
            "{}/{}.{}#{anchor}",
            settings.reference_prefix, record.stem, settings.reference_extension
        )
    } else {
        let page = record.relative_path.with_extension("");
        let page = page
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("/{page}#{anchor}")
    }
}
