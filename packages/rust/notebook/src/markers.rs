//! Gallery marker detection.
//!
//! A code cell is tagged for the gallery when one of its source lines is
//! exactly `# Gallery, <category>`. Every raster `display_data` output of a
//! tagged cell becomes one [`Marker`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::{Cell, CellType, Notebook, OutputType, RasterPayload};

static GALLERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^# Gallery, (?P<category>\w+)\r?$").expect("valid regex")
});

/// One gallery image found in a notebook.
#[derive(Debug, Clone)]
pub struct Marker<'nb> {
    /// Index of the tagged cell.
    pub cell_index: usize,
    /// Raw category token from the marker line.
    pub category: &'nb str,
    /// The embedded image.
    pub payload: RasterPayload,
    /// Every cell before the tagged one, oldest first.
    pub preceding: &'nb [Cell],
}

/// The category token of a marker line in `source`, if any.
pub fn marker_category(source: &str) -> Option<&str> {
    GALLERY_RE
        .captures(source)
        .and_then(|caps| caps.name("category"))
        .map(|m| m.as_str())
}

/// All markers in a notebook, in cell order then output order.
pub fn detect_markers(notebook: &Notebook) -> Vec<Marker<'_>> {
    let mut markers = Vec::new();

    for (index, cell) in notebook.cells.iter().enumerate() {
        if cell.cell_type != CellType::Code {
            continue;
        }
        let Some(category) = marker_category(&cell.source) else {
            continue;
        };

        let before = markers.len();
        for output in &cell.outputs {
            if output.output_type != OutputType::DisplayData {
                continue;
            }
            match output.raster_payload() {
                Some(payload) => markers.push(Marker {
                    cell_index: index,
                    category,
                    payload,
                    preceding: &notebook.cells[..index],
                }),
                None => debug!(cell = index, "display output without raster image ignored"),
            }
        }

        let images = markers.len() - before;
        if images == 0 {
            warn!(cell = index, category, "gallery marker has no image output");
        } else {
            debug!(cell = index, category, images, "gallery marker");
        }
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_notebook_from_str;
    use std::path::Path;

    fn notebook(cells: serde_json::Value) -> Notebook {
        let json = serde_json::json!({ "nbformat": 4, "cells": cells }).to_string();
        parse_notebook_from_str(&json, Path::new("test.ipynb")).unwrap()
    }

    fn image_output(data: &str) -> serde_json::Value {
        serde_json::json!({
            "output_type": "display_data",
            "data": { "image/png": data, "text/plain": "<Figure>" },
            "metadata": {}
        })
    }

    #[test]
    fn marker_line_must_match_exactly() {
        assert_eq!(marker_category("# Gallery, points"), Some("points"));
        assert_eq!(marker_category("import x\n# Gallery, bars\nplot()"), Some("bars"));
        assert_eq!(marker_category("# Gallery, bars\r\nplot()"), Some("bars"));
        assert_eq!(marker_category("# gallery, points"), None);
        assert_eq!(marker_category("  # Gallery, points"), None);
        assert_eq!(marker_category("# Gallery, two words"), None);
        assert_eq!(marker_category("# Gallery Plot"), None);
        assert_eq!(marker_category("x = 1  # Gallery, points"), None);
    }

    #[test]
    fn one_marker_per_image_output() {
        let nb = notebook(serde_json::json!([
            {"cell_type": "markdown", "source": "### First"},
            {"cell_type": "code", "source": "# Gallery, lines\np", "outputs": [
                {"output_type": "stream", "name": "stdout", "text": "log"},
                image_output("AAAA"),
                {"output_type": "execute_result", "data": {"image/png": "CCCC"}},
                image_output("BBBB"),
            ]},
        ]));

        let markers = detect_markers(&nb);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].payload.data, "AAAA");
        assert_eq!(markers[1].payload.data, "BBBB");
        assert!(markers.iter().all(|m| m.category == "lines"));
        assert!(markers.iter().all(|m| m.cell_index == 1));
        assert_eq!(markers[0].preceding.len(), 1);
    }

    #[test]
    fn preceding_cells_exclude_the_marker() {
        let nb = notebook(serde_json::json!([
            {"cell_type": "markdown", "source": "# Intro"},
            {"cell_type": "code", "source": "x = 1", "outputs": []},
            {"cell_type": "code", "source": "# Gallery, points", "outputs": [image_output("AAAA")]},
            {"cell_type": "markdown", "source": "### After"},
            {"cell_type": "code", "source": "# Gallery, bars", "outputs": [image_output("BBBB")]},
        ]));

        let markers = detect_markers(&nb);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].preceding.len(), 2);
        assert_eq!(markers[0].preceding[0].source, "# Intro");
        assert_eq!(markers[1].preceding.len(), 4);
        assert_eq!(markers[1].category, "bars");
    }

    #[test]
    fn markdown_and_unmarked_cells_yield_nothing() {
        let nb = notebook(serde_json::json!([
            {"cell_type": "markdown", "source": "# Gallery, points"},
            {"cell_type": "code", "source": "plot()", "outputs": [image_output("AAAA")]},
            {"cell_type": "code", "source": "# Gallery, maps", "outputs": [
                {"output_type": "error", "ename": "E", "evalue": "", "traceback": []}
            ]},
        ]));

        assert!(detect_markers(&nb).is_empty());
    }
}
