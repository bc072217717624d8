//! Structured document blocks and their Quarto markdown serialization.
//!
//! Pages are assembled as a tree of [`Block`]s and serialized in one pass, so
//! fence lengths and escaping are decided in one place rather than by string
//! concatenation at every call site.

mod gallery;

use std::fmt;

pub use gallery::{CARD_CLASSES, render_page};

// ---------------------------------------------------------------------------
// Block model
// ---------------------------------------------------------------------------

/// Pandoc-style attributes: an optional identifier and a list of classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attr {
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Attr {
    /// Attributes carrying only classes.
    pub fn classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty()
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(self.classes.len() + 1);
        if let Some(id) = &self.id {
            parts.push(format!("#{id}"));
        }
        parts.extend(self.classes.iter().map(|c| format!(".{c}")));
        write!(f, "{{{}}}", parts.join(" "))
    }
}

/// Inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Literal text, escaped on output.
    Text(String),
    /// An image with empty alt text.
    Image { src: String },
    /// A hyperlink around other inlines.
    Link { content: Vec<Inline>, target: String },
}

/// Block-level content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// YAML front matter as ordered key/value pairs.
    Meta(Vec<(String, String)>),
    /// ATX heading with attributes.
    Header { level: u8, text: String, attr: Attr },
    /// Fenced div.
    Div { blocks: Vec<Block>, attr: Attr },
    /// A run of inlines without paragraph semantics.
    Plain(Vec<Inline>),
}

/// An ordered sequence of blocks forming one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Block {
    /// Number of div levels nested inside this block.
    fn div_depth(&self) -> usize {
        match self {
            Block::Div { blocks, .. } => blocks
                .iter()
                .filter(|b| matches!(b, Block::Div { .. }))
                .map(|b| b.div_depth() + 1)
                .max()
                .unwrap_or(0),
            _ => 0,
        }
    }
}

impl fmt::Display for Inline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inline::Text(text) => f.write_str(&escape_markdown(text)),
            Inline::Image { src } => write!(f, "![]({})", link_destination(src)),
            Inline::Link { content, target } => {
                f.write_str("[")?;
                for inline in content {
                    write!(f, "{inline}")?;
                }
                write!(f, "]({})", link_destination(target))
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Meta(fields) => {
                f.write_str("---\n")?;
                for (key, value) in fields {
                    writeln!(f, "{key}: \"{}\"", escape_yaml_string(value))?;
                }
                f.write_str("---")
            }
            Block::Header { level, text, attr } => {
                write!(f, "{} {}", "#".repeat(usize::from(*level)), escape_markdown(text))?;
                if !attr.is_empty() {
                    write!(f, " {attr}")?;
                }
                Ok(())
            }
            Block::Div { blocks, attr } => {
                let fence = ":".repeat(3 + self.div_depth());
                if attr.is_empty() {
                    writeln!(f, "{fence}")?;
                } else {
                    writeln!(f, "{fence} {attr}")?;
                }
                write_blocks(f, blocks)?;
                if !blocks.is_empty() {
                    f.write_str("\n")?;
                }
                f.write_str(&fence)
            }
            Block::Plain(inlines) => {
                for inline in inlines {
                    write!(f, "{inline}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_blocks(f, &self.blocks)?;
        f.write_str("\n")
    }
}

/// Write sibling blocks separated by one blank line.
fn write_blocks(f: &mut fmt::Formatter<'_>, blocks: &[Block]) -> fmt::Result {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            f.write_str("\n\n")?;
        }
        write!(f, "{block}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Backslash-escape characters with inline meaning in Pandoc markdown.
///
/// A leading list marker (`- x`, `+ x`, `1. x`, `2) x`) or fence colon is
/// escaped too, so text that opens a line stays a plain line.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 1);
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    match s.as_bytes().first() {
        Some(b'-' | b'+' | b':') => out.push('\\'),
        Some(b'0'..=b'9') if matches!(s.as_bytes().get(digits), Some(b'.' | b')')) => {
            out.push_str(&s[..digits]);
            out.push('\\');
            return escape_inline(&s[digits..], out);
        }
        _ => {}
    }
    escape_inline(s, out)
}

fn escape_inline(s: &str, mut out: String) -> String {
    for c in s.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '{' | '}' | '$' | '#' | '|'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape special characters in a double-quoted YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Wrap a link destination in angle brackets when it would otherwise end early.
fn link_destination(dest: &str) -> String {
    if dest.contains([' ', '(', ')']) {
        format!("<{dest}>")
    } else {
        dest.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
