//! Gallery page composition.

use tracing::{debug, instrument};

use nbgallery_shared::{GalleryImage, Section};

use crate::{Attr, Block, Document, Inline};

/// Bootstrap card and responsive grid column classes for one gallery card.
pub const CARD_CLASSES: [&str; 4] = ["card", "g-col-12", "g-col-sm-6", "g-col-md-3"];

/// Render the complete gallery page: metadata, then a heading and a card
/// grid per non-empty section, in the given section order.
#[instrument(skip_all, fields(sections = sections.len()))]
pub fn render_page(title: &str, sections: &[Section]) -> String {
    let mut blocks = vec![Block::Meta(vec![("title".into(), title.into())])];

    for section in sections.iter().filter(|s| !s.images.is_empty()) {
        blocks.push(Block::Header {
            level: 2,
            text: section.title.clone(),
            attr: Attr::classes(["gallery"]),
        });
        blocks.push(Block::Div {
            blocks: section.images.iter().map(card).collect(),
            attr: Attr::classes(["grid"]),
        });
    }

    let page = Document { blocks }.to_string();
    debug!(len = page.len(), "rendered gallery page");
    page
}

/// One card: caption header above a thumbnail linking to the image's source.
fn card(image: &GalleryImage) -> Block {
    let src = image.thumbnail.to_string_lossy().replace('\\', "/");

    Block::Div {
        blocks: vec![
            Block::Div {
                blocks: vec![Block::Plain(vec![Inline::Text(image.title.clone())])],
                attr: Attr::classes(["card-header"]),
            },
            Block::Div {
                blocks: vec![Block::Plain(vec![Inline::Link {
                    content: vec![Inline::Image { src }],
                    target: image.target.clone(),
                }])],
                attr: Attr::classes(["card-body"]),
            },
        ],
        attr: Attr::classes(CARD_CLASSES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbgallery_shared::Category;

    fn image(stem: &str, anchor: &str, title: &str) -> GalleryImage {
        GalleryImage {
            thumbnail: format!("thumbnails/{stem}-{anchor}.png").into(),
            title: title.into(),
            target: format!("/reference/{stem}.qmd#{anchor}"),
            category: Category::Points,
        }
    }

    #[test]
    fn renders_full_page() {
        let sections = vec![Section {
            title: "Scatter Plots".into(),
            images: vec![image("nb", "my-plot", "My Plot")],
        }];

        let expected = "\
---
title: \"Gallery\"
---

## Scatter Plots {.gallery}

::::: {.grid}
:::: {.card .g-col-12 .g-col-sm-6 .g-col-md-3}
::: {.card-header}
My Plot
:::

::: {.card-body}
[![](thumbnails/nb-my-plot.png)](/reference/nb.qmd#my-plot)
:::
::::
:::::
";
        assert_eq!(render_page("Gallery", &sections), expected);
    }

    #[test]
    fn cards_in_one_grid_keep_order() {
        let sections = vec![Section {
            title: "Scatter Plots".into(),
            images: vec![image("b", "two", "Two"), image("a", "one", "One")],
        }];
        let page = render_page("Gallery", &sections);

        let two = page.find("thumbnails/b-two.png").unwrap();
        let one = page.find("thumbnails/a-one.png").unwrap();
        assert!(two < one);
        assert_eq!(page.matches("::::: {.grid}").count(), 1);
        assert!(page.contains("::::\n\n:::: {.card"));
    }

    #[test]
    fn list_like_caption_is_escaped() {
        let sections = vec![Section {
            title: "Scatter Plots".into(),
            images: vec![image("nb", "1-first", "1. First")],
        }];
        let page = render_page("Gallery", &sections);
        assert!(page.contains("::: {.card-header}\n1\\. First\n:::"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let sections = vec![
            Section {
                title: "Scatter Plots".into(),
                images: vec![],
            },
            Section {
                title: "Bar Plots".into(),
                images: vec![image("bars", "x", "X")],
            },
        ];
        let page = render_page("Gallery", &sections);
        assert!(!page.contains("Scatter Plots"));
        assert!(page.contains("## Bar Plots {.gallery}"));
    }

    #[test]
    fn no_sections_renders_only_metadata() {
        assert_eq!(render_page("Gallery", &[]), "---\ntitle: \"Gallery\"\n---\n");
    }
}
