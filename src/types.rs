use serde::{Deserialize, Serialize};
use std::fmt;

/// Display color attached to a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterColor {
    Green,
    Red,
    Blue,
    Gray,
    Yellow,
    Cyan,
    Orange,
    White,
}

impl FilterColor {
    /// Palette scanned, in this order, when a new filter needs a color.
    pub const PALETTE: [FilterColor; 7] = [
        FilterColor::Green,
        FilterColor::Red,
        FilterColor::Blue,
        FilterColor::Gray,
        FilterColor::Yellow,
        FilterColor::Cyan,
        FilterColor::Orange,
    ];

    /// Assigned once every palette entry is taken.
    pub const FALLBACK: FilterColor = FilterColor::White;

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterColor::Green => "green",
            FilterColor::Red => "red",
            FilterColor::Blue => "blue",
            FilterColor::Gray => "gray",
            FilterColor::Yellow => "yellow",
            FilterColor::Cyan => "cyan",
            FilterColor::Orange => "orange",
            FilterColor::White => "white",
        }
    }
}

impl fmt::Display for FilterColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub keyword: String,
    pub color: FilterColor,
}

impl Filter {
    pub fn new(keyword: impl Into<String>, color: FilterColor) -> Self {
        Self {
            keyword: keyword.into(),
            color,
        }
    }

    /// Case-insensitive keyword comparison
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.keyword.to_lowercase() == keyword.to_lowercase()
    }
}

/// One displayable entry of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderLine {
    Plain {
        text: String,
    },
    Highlight {
        prefix: String,
        matched: String,
        suffix: String,
    },
}

impl RenderLine {
    pub fn plain(text: impl Into<String>) -> Self {
        RenderLine::Plain { text: text.into() }
    }

    /// Full line text; for highlights this is `prefix + matched + suffix`.
    pub fn text(&self) -> String {
        match self {
            RenderLine::Plain { text } => text.clone(),
            RenderLine::Highlight {
                prefix,
                matched,
                suffix,
            } => format!("{prefix}{matched}{suffix}"),
        }
    }

    pub fn matched(&self) -> Option<&str> {
        match self {
            RenderLine::Plain { .. } => None,
            RenderLine::Highlight { matched, .. } => Some(matched),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub label: String,
    /// Header color, set for groups built from a registered filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<FilterColor>,
    /// ISO-8601 form of a timestamp label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_iso: Option<String>,
    pub entries: Vec<RenderLine>,
}

/// First filter found in a line, with the byte span of its first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub filter: Filter,
    pub match_start: usize,
    pub match_end: usize,
}
