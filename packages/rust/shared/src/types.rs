//! Core domain types for the notebook gallery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The closed vocabulary of gallery tags.
///
/// Declaration order is significant: it fixes the order of sections on the
/// rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Points,
    Lines,
    Paths,
    Areas,
    Bars,
    Distributions,
    Tiles,
    Variations,
    Maps,
    Labels,
    Themes,
    Elaborate,
}

impl Category {
    /// Every category, in section order.
    pub const ALL: [Category; 12] = [
        Category::Points,
        Category::Lines,
        Category::Paths,
        Category::Areas,
        Category::Bars,
        Category::Distributions,
        Category::Tiles,
        Category::Variations,
        Category::Maps,
        Category::Labels,
        Category::Themes,
        Category::Elaborate,
    ];

    /// The tag as written in a marker line.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Points => "points",
            Category::Lines => "lines",
            Category::Paths => "paths",
            Category::Areas => "areas",
            Category::Bars => "bars",
            Category::Distributions => "distributions",
            Category::Tiles => "tiles",
            Category::Variations => "variations",
            Category::Maps => "maps",
            Category::Labels => "labels",
            Category::Themes => "themes",
            Category::Elaborate => "elaborate",
        }
    }

    /// Built-in section title for this category.
    pub fn default_section(self) -> &'static str {
        match self {
            Category::Points => "Scatter Plots",
            Category::Lines | Category::Paths => "Lines and Paths",
            Category::Areas => "Area Plots",
            Category::Bars => "Bar Plots",
            Category::Distributions => "Distributions",
            Category::Tiles => "Tiles",
            Category::Variations => "Variation Plots",
            Category::Maps => "Maps",
            Category::Labels | Category::Themes => "Look & Feel",
            Category::Elaborate => "Elaborate Graphics",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag that is not part of the [`Category`] vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gallery tag: {0}")]
pub struct ParseCategoryError(pub String);

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SectionTable
// ---------------------------------------------------------------------------

/// Total mapping from [`Category`] to section title.
///
/// Built from the defaults plus optional overrides, so every category always
/// has a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    titles: BTreeMap<Category, String>,
}

impl SectionTable {
    /// Build a table from the built-in titles, replacing any overridden ones.
    pub fn with_overrides(overrides: &BTreeMap<Category, String>) -> Self {
        let titles = Category::ALL
            .into_iter()
            .map(|c| {
                let title = overrides
                    .get(&c)
                    .cloned()
                    .unwrap_or_else(|| c.default_section().to_string());
                (c, title)
            })
            .collect();
        Self { titles }
    }

    /// Section title for a category.
    pub fn title(&self, category: Category) -> &str {
        // Every category is inserted by the constructor.
        self.titles
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.default_section())
    }

    /// Distinct section titles in page order.
    pub fn ordered_titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = Vec::new();
        for category in Category::ALL {
            let title = self.title(category);
            if !titles.contains(&title) {
                titles.push(title);
            }
        }
        titles
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self::with_overrides(&BTreeMap::new())
    }
}

// ---------------------------------------------------------------------------
// ThumbnailSize
// ---------------------------------------------------------------------------

/// Nominal on-page thumbnail size and the density multiplier applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSize {
    /// Nominal display width in CSS pixels.
    pub width: u32,
    /// Nominal display height in CSS pixels.
    pub height: u32,
    /// Pixel density multiplier for high-DPI screens.
    pub scale: u32,
}

impl ThumbnailSize {
    /// The bounding box generated thumbnails must fit inside.
    pub fn bounding_box(&self) -> (u32, u32) {
        (
            self.width.saturating_mul(self.scale),
            self.height.saturating_mul(self.scale),
        )
    }
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self {
            width: 294,
            height: 210,
            scale: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// NotebookRecord
// ---------------------------------------------------------------------------

/// A notebook file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookRecord {
    /// Path to the notebook on disk.
    pub path: PathBuf,
    /// File name without extension (`geom_point` for `geom_point.ipynb`).
    pub stem: String,
    /// Path relative to the documentation source directory.
    pub relative_path: PathBuf,
    /// Whether the notebook lives under the reference examples directory.
    pub in_examples: bool,
}

impl NotebookRecord {
    /// Describe `path` relative to the documentation source tree.
    pub fn new(path: &Path, source_dir: &Path, examples_dir: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative_path = path
            .strip_prefix(source_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());

        Self {
            path: path.to_path_buf(),
            stem,
            relative_path,
            in_examples: path.starts_with(examples_dir),
        }
    }
}

// ---------------------------------------------------------------------------
// GalleryImage / Section
// ---------------------------------------------------------------------------

/// One card on the gallery page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    /// Thumbnail path relative to the gallery page (`thumbnails/<stem>-<anchor>.png`).
    pub thumbnail: PathBuf,
    /// Caption shown above the thumbnail.
    pub title: String,
    /// Site-absolute link target, always starting with `/`.
    pub target: String,
    /// Tag taken from the marker line.
    pub category: Category,
}

/// A titled group of gallery images, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub images: Vec<GalleryImage>,
}
