use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Inline (character-level) style tag
///
/// The editor's own shortcuts only produce the first four variants. Any other
/// tag found in a stored snapshot is kept verbatim in `Other` so it survives a
/// load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InlineStyle {
    Bold,
    Red,
    Underline,
    Code,
    Other(String),
}

impl InlineStyle {
    pub fn as_str(&self) -> &str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::Red => "RED",
            InlineStyle::Underline => "UNDERLINE",
            InlineStyle::Code => "CODE",
            InlineStyle::Other(tag) => tag,
        }
    }
}

impl From<String> for InlineStyle {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "BOLD" => InlineStyle::Bold,
            "RED" => InlineStyle::Red,
            "UNDERLINE" => InlineStyle::Underline,
            "CODE" => InlineStyle::Code,
            _ => InlineStyle::Other(tag),
        }
    }
}

impl From<&str> for InlineStyle {
    fn from(tag: &str) -> Self {
        InlineStyle::from(tag.to_string())
    }
}

impl From<InlineStyle> for String {
    fn from(style: InlineStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of inline styles active on one character (or at the caret)
pub type StyleSet = BTreeSet<InlineStyle>;

/// Colors used by the style map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleColor {
    Red,
    Yellow,
    Black,
}

/// Presentation attributes for one inline style
///
/// Front-ends translate these into whatever their rendering layer understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleAttributes {
    pub bold: bool,
    pub underline: bool,
    pub foreground: Option<StyleColor>,
    pub background: Option<StyleColor>,
    /// Horizontal padding in cells on each side of the styled run
    pub padding: u16,
}

impl StyleAttributes {
    /// Layer `other` on top of `self`; colors in `other` win
    pub fn merge(self, other: StyleAttributes) -> StyleAttributes {
        StyleAttributes {
            bold: self.bold || other.bold,
            underline: self.underline || other.underline,
            foreground: other.foreground.or(self.foreground),
            background: other.background.or(self.background),
            padding: self.padding.max(other.padding),
        }
    }
}

/// Presentation attributes for a style tag, `None` for tags without a mapping
pub fn style_attributes(style: &InlineStyle) -> Option<StyleAttributes> {
    match style {
        InlineStyle::Bold => Some(StyleAttributes {
            bold: true,
            ..Default::default()
        }),
        InlineStyle::Red => Some(StyleAttributes {
            foreground: Some(StyleColor::Red),
            ..Default::default()
        }),
        InlineStyle::Underline => Some(StyleAttributes {
            underline: true,
            ..Default::default()
        }),
        InlineStyle::Code => Some(StyleAttributes {
            foreground: Some(StyleColor::Black),
            background: Some(StyleColor::Yellow),
            padding: 1,
            ..Default::default()
        }),
        InlineStyle::Other(_) => None,
    }
}

/// Combined attributes for every style in `styles`
pub fn resolve_styles(styles: &StyleSet) -> StyleAttributes {
    styles
        .iter()
        .filter_map(style_attributes)
        .fold(StyleAttributes::default(), StyleAttributes::merge)
}
