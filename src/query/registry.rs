use crate::error::{LogsiftError, Result};
use crate::types::{Filter, FilterColor};

/// Preset filters available before any user additions
pub const DEFAULT_PRESETS: [(&str, FilterColor); 7] = [
    ("okhttp", FilterColor::Green),
    ("CrashlyticsHelper", FilterColor::Red),
    ("Stream", FilterColor::Blue),
    ("ViewModel", FilterColor::Yellow),
    ("Firebase", FilterColor::Orange),
    ("Network", FilterColor::Gray),
    ("Camera", FilterColor::Cyan),
];

/// Ordered set of keyword filters, unique by lowercase keyword.
///
/// Initial filters are kept sorted by keyword; filters added later are
/// appended in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRegistry {
    filters: Vec<Filter>,
}

impl FilterRegistry {
    pub fn new<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, FilterColor)>,
        K: Into<String>,
    {
        let mut sorted: Vec<Filter> = defaults
            .into_iter()
            .map(|(keyword, color)| Filter::new(keyword, color))
            .collect();
        sorted.sort_by(|a, b| a.keyword.cmp(&b.keyword));

        let mut registry = Self {
            filters: Vec::with_capacity(sorted.len()),
        };
        for filter in sorted {
            if filter.keyword.trim().is_empty() {
                log::warn!("ignoring blank preset filter keyword");
                continue;
            }
            if registry.has(&filter.keyword) {
                log::warn!("ignoring duplicate preset filter '{}'", filter.keyword);
                continue;
            }
            registry.filters.push(filter);
        }
        registry
    }

    pub fn with_default_presets() -> Self {
        Self::new(DEFAULT_PRESETS)
    }

    /// Case-insensitive membership test
    pub fn has(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn get(&self, keyword: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.is_keyword(keyword))
    }

    /// Register a new keyword with the first unused palette color.
    /// Surrounding whitespace is not part of the stored keyword.
    pub fn add(&mut self, keyword: &str) -> Result<Filter> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(LogsiftError::InvalidFilter(
                "filter keyword must not be blank".to_string(),
            ));
        }
        if self.has(keyword) {
            return Err(LogsiftError::DuplicateFilter(keyword.to_string()));
        }

        let filter = Filter::new(keyword, self.next_color());
        log::info!("registered filter '{}' ({})", filter.keyword, filter.color);
        self.filters.push(filter.clone());
        Ok(filter)
    }

    fn next_color(&self) -> FilterColor {
        FilterColor::PALETTE
            .into_iter()
            .find(|color| self.filters.iter().all(|f| f.color != *color))
            .unwrap_or(FilterColor::FALLBACK)
    }

    pub fn all(&self) -> &[Filter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_default_presets()
    }
}
