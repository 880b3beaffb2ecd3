use crate::engine::{AddFilterOutcome, LogGroupingEngine};
use crate::error::{LogsiftError, Result};
use crate::parser::loader::load_source;
use crate::types::{Filter, Group};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// State of the preset-filter view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresetView {
    #[default]
    Unfiltered,
    FilteredByPreset(String),
}

/// State of the all-logs (time grouped) view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeView {
    #[default]
    Unfiltered,
    CustomFiltered(String),
}

/// Both views, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Views {
    pub time: Vec<Group>,
    pub preset: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing changed
    Ignored,
    /// Keyword already registered; the filtered time view
    Filtered(Vec<Group>),
    /// Keyword is new; answer with [`Session::confirm_add_filter`]
    ConfirmationRequired { keyword: String },
}

/// Holds the loaded lines and view state between user intents.
#[derive(Debug, Default)]
pub struct Session {
    engine: LogGroupingEngine,
    lines: Vec<String>,
    source: Option<PathBuf>,
    time_view: TimeView,
    preset_view: PresetView,
    pending: Option<String>,
}

impl Session {
    pub fn new(engine: LogGroupingEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn filters(&self) -> &[Filter] {
        self.engine.filters()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn time_view(&self) -> &TimeView {
        &self.time_view
    }

    pub fn preset_view(&self) -> &PresetView {
        &self.preset_view
    }

    pub fn pending_filter(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Replace the loaded lines with the content of `path`.
    /// Unreadable files yield a single error line rather than failing.
    pub fn load_file(&mut self, path: &Path) -> Views {
        let lines = load_source(path);
        self.source = Some(path.to_path_buf());
        self.load_lines(lines)
    }

    pub fn load_lines(&mut self, lines: Vec<String>) -> Views {
        self.lines = lines;
        self.time_view = TimeView::Unfiltered;
        self.preset_view = PresetView::Unfiltered;
        self.pending = None;
        self.views()
    }

    pub fn time_groups(&self) -> Vec<Group> {
        let custom = match &self.time_view {
            TimeView::Unfiltered => None,
            TimeView::CustomFiltered(keyword) => Some(keyword.as_str()),
        };
        self.engine.group_all_by_time(&self.lines, custom)
    }

    pub fn preset_groups(&self) -> Vec<Group> {
        let restrict = match &self.preset_view {
            PresetView::Unfiltered => None,
            PresetView::FilteredByPreset(keyword) => Some(keyword.as_str()),
        };
        self.engine.group_by_preset_filters(&self.lines, restrict)
    }

    pub fn views(&self) -> Views {
        Views {
            time: self.time_groups(),
            preset: self.preset_groups(),
        }
    }

    /// Select a registered filter for the preset view, or `None` to reset it.
    pub fn select_preset_filter(&mut self, keyword: Option<&str>) -> Result<Vec<Group>> {
        self.preset_view = match keyword {
            None => PresetView::Unfiltered,
            Some(keyword) => {
                let filter = self
                    .engine
                    .registry()
                    .get(keyword)
                    .ok_or_else(|| LogsiftError::InvalidFilter(format!("'{}' is not a registered filter", keyword)))?;
                PresetView::FilteredByPreset(filter.keyword.clone())
            }
        };
        Ok(self.preset_groups())
    }

    /// Apply text typed as a custom filter.
    pub fn submit_custom_filter(&mut self, text: &str) -> SubmitOutcome {
        let keyword = text.trim();
        if keyword.is_empty() {
            return SubmitOutcome::Ignored;
        }

        if let Some(groups) = self.engine.registered_filter_view(&self.lines, keyword) {
            self.pending = None;
            self.time_view = TimeView::CustomFiltered(keyword.to_string());
            return SubmitOutcome::Filtered(groups);
        }

        if let Some(previous) = self.pending.replace(keyword.to_string()) {
            log::debug!("replacing unanswered custom filter '{}'", previous);
        }
        SubmitOutcome::ConfirmationRequired {
            keyword: keyword.to_string(),
        }
    }

    /// Answer the pending add-filter question.
    ///
    /// Accepting registers the keyword and selects it in the preset view.
    /// Either way the time view is filtered by the keyword once.
    pub fn confirm_add_filter(&mut self, accept: bool) -> Result<Views> {
        let keyword = self.pending.take().ok_or(LogsiftError::NoPendingFilter)?;
        let outcome = self.engine.add_custom_filter(&self.lines, &keyword, |_| accept)?;

        if let AddFilterOutcome::Registered { filter, .. } = outcome {
            self.preset_view = PresetView::FilteredByPreset(filter.keyword);
        }
        self.time_view = TimeView::CustomFiltered(keyword);
        Ok(self.views())
    }
}
