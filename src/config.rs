use crate::error::Result;
use crate::query::registry::{FilterRegistry, DEFAULT_PRESETS};
use crate::types::FilterColor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Startup configuration, read from a JSON file. Never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogsiftConfig {
    /// Preset filters, keyword -> color
    pub filters: BTreeMap<String, FilterColor>,
}

impl Default for LogsiftConfig {
    fn default() -> Self {
        Self {
            filters: DEFAULT_PRESETS
                .iter()
                .map(|(keyword, color)| (keyword.to_string(), *color))
                .collect(),
        }
    }
}

impl LogsiftConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!(
            "loaded {} preset filters from {}",
            config.filters.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn registry(&self) -> FilterRegistry {
        FilterRegistry::new(self.filters.iter().map(|(k, c)| (k.clone(), *c)))
    }
}
