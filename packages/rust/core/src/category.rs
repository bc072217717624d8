//! Marker tag classification.

use std::path::Path;

use nbgallery_shared::{Category, GalleryError, Result, SectionTable};

/// Resolve a raw marker tag to its category and section title.
///
/// Tags outside the closed vocabulary are fatal; `source` names the notebook
/// the tag was found in.
pub fn classify<'t>(
    tag: &str,
    table: &'t SectionTable,
    source: &Path,
) -> Result<(Category, &'t str)> {
    let category: Category = tag
        .parse()
        .map_err(|_| GalleryError::unknown_category(tag, source))?;
    Ok((category, table.title(category)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const VOCABULARY: [&str; 12] = [
        "points",
        "lines",
        "paths",
        "areas",
        "bars",
        "distributions",
        "tiles",
        "variations",
        "maps",
        "labels",
        "themes",
        "elaborate",
    ];

    #[test]
    fn every_known_tag_classifies() {
        let table = SectionTable::default();
        for tag in VOCABULARY {
            let (category, title) = classify(tag, &table, Path::new("nb.ipynb")).unwrap();
            assert_eq!(category.as_str(), tag);
            assert!(!title.is_empty());
        }
    }

    #[test]
    fn shared_sections() {
        let table = SectionTable::default();
        let nb = Path::new("nb.ipynb");
        assert_eq!(classify("lines", &table, nb).unwrap().1, "Lines and Paths");
        assert_eq!(classify("paths", &table, nb).unwrap().1, "Lines and Paths");
        assert_eq!(classify("labels", &table, nb).unwrap().1, "Look & Feel");
        assert_eq!(classify("themes", &table, nb).unwrap().1, "Look & Feel");
    }

    #[test]
    fn unknown_tags_are_fatal() {
        let table = SectionTable::default();
        for tag in ["pies", "Points", "point", "heatmaps", ""] {
            let err = classify(tag, &table, Path::new("tutorials/x.ipynb")).unwrap_err();
            assert!(matches!(err, GalleryError::UnknownCategory { .. }));
            assert!(err.to_string().contains(&format!("'{tag}'")));
        }
    }

    #[test]
    fn uses_configured_titles() {
        let mut overrides = BTreeMap::new();
        overrides.insert(Category::Maps, "Cartography".to_string());
        let table = SectionTable::with_overrides(&overrides);
        let (_, title) = classify("maps", &table, Path::new("nb.ipynb")).unwrap();
        assert_eq!(title, "Cartography");
    }
}
