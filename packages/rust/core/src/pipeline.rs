//! End-to-end gallery build: scan → extract → thumbnail → group → render → write.
//!
//! Every image is derived in memory before anything touches the output
//! directory, so a failure part-way through leaves the previous gallery intact.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use nbgallery_shared::{GallerySettings, Result, Section};

use crate::assembler::{self, ArtifactMeta};
use crate::extract::{GalleryImages, StagedImage};

/// Result of a completed build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Notebooks read.
    pub notebooks: usize,
    /// Gallery images placed on the page.
    pub images: usize,
    /// Section titles with their image counts, in page order.
    pub sections: Vec<(String, usize)>,
    /// Files written, thumbnails first and the page last.
    pub artifacts: Vec<ArtifactMeta>,
    /// The written page.
    pub page_path: PathBuf,
    pub elapsed: Duration,
}

/// Result of a dry run.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub notebooks: usize,
    /// Sections as they would be rendered.
    pub sections: Vec<Section>,
    pub elapsed: Duration,
}

impl ScanReport {
    pub fn image_count(&self) -> usize {
        self.sections.iter().map(|s| s.images.len()).sum()
    }
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each image has been extracted and thumbnailed.
    fn image_staged(&self, title: &str, current: usize);
    /// Called for every file written.
    fn artifact_written(&self, artifact: &ArtifactMeta);
    /// Called when the build completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn image_staged(&self, _title: &str, _current: usize) {}
    fn artifact_written(&self, _artifact: &ArtifactMeta) {}
    fn done(&self, _report: &BuildReport) {}
}

/// Run the full build and write the gallery.
///
/// 1. Scan notebook directories
/// 2. Extract and thumbnail every marked image
/// 3. Group into sections and render the page
/// 4. Write thumbnails, then the page
#[instrument(skip_all, fields(source = %settings.source_dir.display()))]
pub fn build_gallery(
    settings: &GallerySettings,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    let start = Instant::now();
    info!(page = %settings.page_path.display(), "starting gallery build");

    let (notebooks, staged) = stage_images(settings, progress)?;

    progress.phase("Rendering gallery page");
    let gallery = assembler::assemble(settings, &staged);

    progress.phase("Writing gallery");
    let artifacts = assembler::commit(settings, &staged, &gallery.page)?;
    for artifact in &artifacts {
        progress.artifact_written(artifact);
    }

    let report = BuildReport {
        notebooks,
        images: staged.len(),
        sections: gallery
            .sections
            .iter()
            .map(|s| (s.title.clone(), s.images.len()))
            .collect(),
        artifacts,
        page_path: settings.page_path.clone(),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        notebooks = report.notebooks,
        images = report.images,
        sections = report.sections.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "gallery build complete"
    );

    Ok(report)
}

/// Derive the gallery without writing anything.
#[instrument(skip_all, fields(source = %settings.source_dir.display()))]
pub fn scan_gallery(
    settings: &GallerySettings,
    progress: &dyn ProgressReporter,
) -> Result<ScanReport> {
    let start = Instant::now();
    let (notebooks, staged) = stage_images(settings, progress)?;
    let sections = assembler::group_sections(&staged, &settings.sections);

    info!(
        notebooks,
        images = staged.len(),
        sections = sections.len(),
        "gallery scan complete"
    );

    Ok(ScanReport {
        notebooks,
        sections,
        elapsed: start.elapsed(),
    })
}

/// Drain the extractor, stopping at the first error.
fn stage_images(
    settings: &GallerySettings,
    progress: &dyn ProgressReporter,
) -> Result<(usize, Vec<StagedImage>)> {
    progress.phase("Scanning notebooks");
    let mut images = GalleryImages::new(settings)?;

    progress.phase("Extracting gallery images");
    let mut staged = Vec::new();
    for image in images.by_ref() {
        let image = image?;
        progress.image_staged(&image.image.title, staged.len() + 1);
        staged.push(image);
    }

    Ok((images.notebooks_read(), staged))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
