//! Gallery configuration.
//!
//! Project config lives in `nbgallery.toml` next to the documentation
//! sources. CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};
use crate::types::{Category, SectionTable, ThumbnailSize};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "nbgallery.toml";

// ---------------------------------------------------------------------------
// Config structs (matching nbgallery.toml schema)
// ---------------------------------------------------------------------------

/// Top-level gallery config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Notebook naming conventions.
    #[serde(default)]
    pub notebooks: NotebooksConfig,

    /// Thumbnail sizing.
    #[serde(default)]
    pub thumbnail: ThumbnailSize,

    /// Rendered page settings.
    #[serde(default)]
    pub page: PageConfig,

    /// Section title overrides keyed by category tag.
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Documentation source root, relative to the config file.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Directories scanned for notebooks, relative to `source_dir`.
    #[serde(default = "default_notebook_dirs")]
    pub notebook_dirs: Vec<String>,

    /// Notebooks under this directory link to their reference page.
    #[serde(default = "default_examples_dir")]
    pub examples_dir: String,

    /// Gallery output directory, relative to `source_dir`.
    #[serde(default = "default_gallery_dir")]
    pub gallery_dir: String,

    /// Thumbnail directory, relative to `gallery_dir`.
    #[serde(default = "default_thumbnails_dir")]
    pub thumbnails_dir: String,

    /// Rendered page file name, relative to `gallery_dir`.
    #[serde(default = "default_page")]
    pub page: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            notebook_dirs: default_notebook_dirs(),
            examples_dir: default_examples_dir(),
            gallery_dir: default_gallery_dir(),
            thumbnails_dir: default_thumbnails_dir(),
            page: default_page(),
        }
    }
}

fn default_source_dir() -> String {
    "source".into()
}
fn default_notebook_dirs() -> Vec<String> {
    vec!["reference/examples".into(), "tutorials".into()]
}
fn default_examples_dir() -> String {
    "reference/examples".into()
}
fn default_gallery_dir() -> String {
    "gallery".into()
}
fn default_thumbnails_dir() -> String {
    "thumbnails".into()
}
fn default_page() -> String {
    "index.qmd".into()
}

/// `[notebooks]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebooksConfig {
    /// Notebook file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Files ending with this suffix are executed copies and are skipped.
    #[serde(default = "default_skip_suffix")]
    pub skip_suffix: String,

    /// Extension of the reference page an example notebook is embedded in.
    #[serde(default = "default_reference_extension")]
    pub reference_extension: String,

    /// Site path of the reference pages.
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
}

impl Default for NotebooksConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            skip_suffix: default_skip_suffix(),
            reference_extension: default_reference_extension(),
            reference_prefix: default_reference_prefix(),
        }
    }
}

fn default_extension() -> String {
    "ipynb".into()
}
fn default_skip_suffix() -> String {
    ".out.ipynb".into()
}
fn default_reference_extension() -> String {
    "qmd".into()
}
fn default_reference_prefix() -> String {
    "/reference".into()
}

/// `[page]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Title written to the page metadata.
    #[serde(default = "default_page_title")]
    pub title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_page_title(),
        }
    }
}

fn default_page_title() -> String {
    "Gallery".into()
}

// ---------------------------------------------------------------------------
// Gallery settings (runtime, resolved against a base directory)
// ---------------------------------------------------------------------------

/// Runtime gallery settings with every path resolved.
///
/// This is the value the pipeline runs against; it is built per invocation
/// so independent configurations can coexist.
#[derive(Debug, Clone)]
pub struct GallerySettings {
    /// Documentation source root.
    pub source_dir: PathBuf,
    /// Directories scanned for notebooks.
    pub notebook_dirs: Vec<PathBuf>,
    /// Reference examples directory.
    pub examples_dir: PathBuf,
    /// Directory holding the rendered page.
    pub gallery_dir: PathBuf,
    /// Thumbnail directory, relative to `gallery_dir`.
    pub thumbnails_dir: PathBuf,
    /// Rendered page path.
    pub page_path: PathBuf,
    /// Notebook file extension, without the dot.
    pub extension: String,
    /// Suffix marking executed notebook copies.
    pub skip_suffix: String,
    /// Extension of reference pages.
    pub reference_extension: String,
    /// Site path of reference pages.
    pub reference_prefix: String,
    /// Thumbnail sizing.
    pub thumbnail: ThumbnailSize,
    /// Page title.
    pub page_title: String,
    /// Category to section mapping.
    pub sections: SectionTable,
}

impl GallerySettings {
    /// Resolve a config against `base_dir` (the directory holding the config file).
    pub fn resolve(config: &AppConfig, base_dir: &Path) -> Result<Self> {
        let paths = &config.paths;
        let source_dir = base_dir.join(&paths.source_dir);
        let gallery_dir = source_dir.join(&paths.gallery_dir);

        if config.thumbnail.width == 0 || config.thumbnail.height == 0 || config.thumbnail.scale == 0
        {
            return Err(GalleryError::config(
                "thumbnail width, height and scale must all be positive",
            ));
        }
        let size = config.thumbnail;
        if size.width.checked_mul(size.scale).is_none()
            || size.height.checked_mul(size.scale).is_none()
        {
            return Err(GalleryError::config(format!(
                "thumbnail box {}x{} at scale {} is too large",
                size.width, size.height, size.scale
            )));
        }
        if config.notebooks.extension.is_empty() {
            return Err(GalleryError::config("notebook extension must not be empty"));
        }

        let mut overrides = BTreeMap::new();
        for (tag, title) in &config.sections {
            let category: Category = tag.parse().map_err(|_| {
                GalleryError::config(format!("unknown category '{tag}' in [sections]"))
            })?;
            overrides.insert(category, title.clone());
        }

        Ok(Self {
            notebook_dirs: paths
                .notebook_dirs
                .iter()
                .map(|d| source_dir.join(d))
                .collect(),
            examples_dir: source_dir.join(&paths.examples_dir),
            thumbnails_dir: PathBuf::from(&paths.thumbnails_dir),
            page_path: gallery_dir.join(&paths.page),
            gallery_dir,
            source_dir,
            extension: config.notebooks.extension.clone(),
            skip_suffix: config.notebooks.skip_suffix.clone(),
            reference_extension: config.notebooks.reference_extension.clone(),
            reference_prefix: config
                .notebooks
                .reference_prefix
                .trim_end_matches('/')
                .to_string(),
            thumbnail: config.thumbnail,
            page_title: config.page.title.clone(),
            sections: SectionTable::with_overrides(&overrides),
        })
    }

    /// Default settings for a documentation tree rooted at `source_dir`.
    pub fn for_source_dir(source_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut config = AppConfig::default();
        config.paths.source_dir = ".".into();
        let mut settings = Self::resolve(&config, &source_dir.into())?;
        settings.source_dir = normalize_dot(&settings.source_dir);
        settings.notebook_dirs = settings.notebook_dirs.iter().map(|p| normalize_dot(p)).collect();
        settings.examples_dir = normalize_dot(&settings.examples_dir);
        settings.gallery_dir = normalize_dot(&settings.gallery_dir);
        settings.page_path = normalize_dot(&settings.page_path);
        Ok(settings)
    }

    /// Absolute directory thumbnails are written to.
    pub fn thumbnails_path(&self) -> PathBuf {
        self.gallery_dir.join(&self.thumbnails_dir)
    }
}

/// Drop `.` components so prefix checks against scanned paths line up.
fn normalize_dot(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from `path`. Returns defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| GalleryError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(GalleryError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GalleryError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| GalleryError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| GalleryError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nbg-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("notebook_dirs"));
        assert!(toml_str.contains(".out.ipynb"));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.thumbnail.width, 294);
        assert_eq!(parsed.thumbnail.height, 210);
        assert_eq!(parsed.paths.page, "index.qmd");
    }

    #[test]
    fn partial_config_uses_defaults() {
        let toml_str = r#"
[paths]
source_dir = "docs"

[sections]
points = "Points"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.paths.source_dir, "docs");
        assert_eq!(config.paths.gallery_dir, "gallery");
        assert_eq!(config.notebooks.extension, "ipynb");

        let settings = GallerySettings::resolve(&config, Path::new("/project")).unwrap();
        assert_eq!(settings.source_dir, PathBuf::from("/project/docs"));
        assert_eq!(
            settings.page_path,
            PathBuf::from("/project/docs/gallery/index.qmd")
        );
        assert_eq!(
            settings.thumbnails_path(),
            PathBuf::from("/project/docs/gallery/thumbnails")
        );
        assert_eq!(settings.sections.title(Category::Points), "Points");
    }

    #[test]
    fn unknown_section_key_is_rejected() {
        let mut config = AppConfig::default();
        config.sections.insert("pies".into(), "Pie Charts".into());
        let err = GallerySettings::resolve(&config, Path::new("/p")).unwrap_err();
        assert!(err.to_string().contains("'pies'"));
    }

    #[test]
    fn zero_thumbnail_size_is_rejected() {
        let mut config = AppConfig::default();
        config.thumbnail.scale = 0;
        assert!(GallerySettings::resolve(&config, Path::new("/p")).is_err());
    }

    #[test]
    fn overflowing_thumbnail_box_is_rejected() {
        let mut config = AppConfig::default();
        config.thumbnail.width = 3_000_000_000;
        let err = GallerySettings::resolve(&config, Path::new("/p")).unwrap_err();
        assert!(matches!(err, GalleryError::Config { .. }));
        assert!(err.to_string().contains("too large"));

        let config: AppConfig = toml::from_str("[thumbnail]\nwidth = 294\nheight = 4000000000\nscale = 2\n").unwrap();
        assert!(GallerySettings::resolve(&config, Path::new("/p")).is_err());
    }

    #[test]
    fn settings_for_source_dir() {
        let settings = GallerySettings::for_source_dir("/docs/source").unwrap();
        assert_eq!(
            settings.notebook_dirs,
            vec![
                PathBuf::from("/docs/source/reference/examples"),
                PathBuf::from("/docs/source/tutorials"),
            ]
        );
        assert_eq!(
            settings.examples_dir,
            PathBuf::from("/docs/source/reference/examples")
        );
        assert_eq!(settings.reference_prefix, "/reference");
    }

    #[test]
    fn init_writes_loadable_file_once() {
        let tmp = temp_dir();
        let path = tmp.join(CONFIG_FILE_NAME);

        init_config(&path).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.page.title, "Gallery");

        assert!(init_config(&path).is_err());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/nbgallery.toml")).unwrap();
        assert_eq!(config.paths.notebook_dirs.len(), 2);
    }
}
