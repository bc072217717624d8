//! Notebook reading, scanning, and gallery marker detection.
//!
//! Parses nbformat 4 JSON documents with `serde_json`, enumerates candidate
//! notebook files on disk, and finds the code cells tagged for the gallery.

pub mod markers;
pub mod scanner;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

use nbgallery_shared::{GalleryError, Result};

pub use markers::{Marker, detect_markers};
pub use scanner::NotebookScanner;

// ---------------------------------------------------------------------------
// Notebook model
// ---------------------------------------------------------------------------

/// A parsed notebook: an ordered list of cells.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    /// Cells in document order.
    pub cells: Vec<Cell>,
    /// Major format version, when declared.
    #[serde(default)]
    pub nbformat: Option<u32>,
}

/// A single notebook cell.
#[derive(Debug, Clone, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    /// Cell source; list-of-lines sources are joined.
    #[serde(default, deserialize_with = "multiline")]
    pub source: String,
    /// Execution outputs (code cells only).
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Markdown,
    Code,
    #[serde(other)]
    Raw,
}

/// A single execution output attached to a code cell.
#[derive(Debug, Clone, Deserialize)]
pub struct Output {
    pub output_type: OutputType,
    /// Mime bundle (`display_data` and `execute_result`).
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

/// Kind of an execution output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    DisplayData,
    ExecuteResult,
    Stream,
    Error,
    #[serde(other)]
    Unknown,
}

/// A base64-encoded raster image embedded in an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPayload {
    /// Mime type of the payload (`image/png` or `image/jpeg`).
    pub mime: &'static str,
    /// The encoded payload, lines joined.
    pub data: String,
}

/// Raster mime types in order of preference.
const RASTER_MIMES: [&str; 2] = ["image/png", "image/jpeg"];

impl Cell {
    /// Whether this is a markdown cell.
    pub fn is_markdown(&self) -> bool {
        self.cell_type == CellType::Markdown
    }
}

impl Output {
    /// The embedded raster image, if this output carries one.
    pub fn raster_payload(&self) -> Option<RasterPayload> {
        RASTER_MIMES.into_iter().find_map(|mime| {
            let data = match self.data.get(mime)? {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Array(parts) => parts
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .collect::<String>(),
                _ => return None,
            };
            Some(RasterPayload { mime, data })
        })
    }
}

/// Accept both the string and the list-of-strings encodings of a text field.
fn multiline<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Multiline {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Multiline::deserialize(deserializer)? {
        Multiline::One(s) => s,
        Multiline::Many(lines) => lines.concat(),
    })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Read and parse a notebook file.
#[instrument(fields(path = %path.display()))]
pub fn parse_notebook(path: &Path) -> Result<Notebook> {
    let content = std::fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
    parse_notebook_from_str(&content, path)
}

/// Parse notebook JSON; `path` is only used for error context.
pub fn parse_notebook_from_str(content: &str, path: &Path) -> Result<Notebook> {
    let notebook: Notebook = serde_json::from_str(content)
        .map_err(|e| GalleryError::notebook_parse(path, e.to_string()))?;

    if let Some(version) = notebook.nbformat.filter(|v| *v < 4) {
        return Err(GalleryError::notebook_parse(
            path,
            format!("unsupported nbformat version {version}"),
        ));
    }

    debug!(cells = notebook.cells.len(), "parsed notebook");
    Ok(notebook)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
