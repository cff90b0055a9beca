//! Typed content blocks

use std::fmt;

/// Heading level, always in `2..=6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 6;

    /// Returns `None` for levels outside `2..=6`
    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a block is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading(HeadingLevel),
    /// Plain paragraph text
    Paragraph,
    /// Paragraph whose value embeds `<a>` markup
    HyperlinkParagraph,
    ListItem,
    /// The value is the image URL
    Image,
}

impl BlockKind {
    /// Stable lowercase tag used in logs
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Heading(level) => match level.get() {
                2 => "h2",
                3 => "h3",
                4 => "h4",
                5 => "h5",
                _ => "h6",
            },
            Self::Paragraph => "p",
            Self::HyperlinkParagraph => "a",
            Self::ListItem => "li",
            Self::Image => "img",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One unit of extracted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub value: String,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Anchor markup embedded in paragraph and list-item values
pub fn anchor_html(href: &str, text: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
        href.replace('"', "&quot;"),
        text
    )
}
