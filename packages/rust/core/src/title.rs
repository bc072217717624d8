//! Gallery image titles from the markdown preceding a marker.

use nbgallery_notebook::Cell;

/// Title for a gallery image, given the cells before its marker.
///
/// Walks markdown cells from the closest to the earliest, reading each
/// cell's lines top to bottom. The first `### ` heading wins. Otherwise the
/// last `# ` heading seen is used, and an empty string if there is none.
pub fn resolve_title(preceding: &[Cell]) -> String {
    let mut fallback = "";

    for cell in preceding.iter().rev().filter(|c| c.is_markdown()) {
        for line in cell.source.lines() {
            if let Some(title) = line.strip_prefix("### ") {
                return heading_text(title).to_string();
            }
            if let Some(heading) = line.strip_prefix("# ") {
                fallback = heading;
            }
        }
    }

    heading_text(fallback).to_string()
}

/// Heading text without surrounding whitespace or a closing `#` sequence.
///
/// A closing sequence must be preceded by a space, so `C#` keeps its hash.
fn heading_text(raw: &str) -> &str {
    let text = raw.trim();
    let open = text.trim_end_matches('#');
    if open.is_empty() || open.ends_with([' ', '\t']) {
        open.trim_end()
    } else {
        text
    }
}
