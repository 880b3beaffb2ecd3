use crate::error::{LogsiftError, Result};
use crate::parser::timestamp::{label_to_iso, TimeBucket, TimestampGrouper};
use crate::query::matcher::{contains_keyword, find_match, highlight, highlight_keyword};
use crate::query::registry::FilterRegistry;
use crate::types::{Filter, Group, RenderLine};

/// Result of [`LogGroupingEngine::add_custom_filter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddFilterOutcome {
    /// Keyword was already registered; time view filtered by it.
    AlreadyRegistered { groups: Vec<Group> },
    /// Caller confirmed; the new filter and the preset view restricted to it.
    Registered { filter: Filter, groups: Vec<Group> },
    /// Caller declined; time view filtered by the unregistered keyword.
    Declined { groups: Vec<Group> },
}

impl AddFilterOutcome {
    pub fn groups(&self) -> &[Group] {
        match self {
            AddFilterOutcome::AlreadyRegistered { groups }
            | AddFilterOutcome::Registered { groups, .. }
            | AddFilterOutcome::Declined { groups } => groups,
        }
    }
}

/// Builds the two grouped views over a set of log lines.
#[derive(Debug, Clone, Default)]
pub struct LogGroupingEngine {
    registry: FilterRegistry,
    grouper: TimestampGrouper,
}

impl LogGroupingEngine {
    pub fn new(registry: FilterRegistry) -> Self {
        Self {
            registry,
            grouper: TimestampGrouper::new(),
        }
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn filters(&self) -> &[Filter] {
        self.registry.all()
    }

    pub fn register_filter(&mut self, keyword: &str) -> Result<Filter> {
        self.registry.add(keyword)
    }

    /// Group every line by its timestamp prefix.
    ///
    /// With `custom_filter`, only lines whose content contains the keyword
    /// (ignoring case) are kept, each rendered with the keyword highlighted,
    /// and timestamps left without any such line are dropped.
    pub fn group_all_by_time<S: AsRef<str>>(&self, lines: &[S], custom_filter: Option<&str>) -> Vec<Group> {
        let custom_filter = custom_filter.filter(|k| !k.is_empty());

        let groups: Vec<Group> = match custom_filter {
            None => self
                .grouper
                .group(lines)
                .into_iter()
                .map(|bucket| time_group(bucket, |line| RenderLine::Plain { text: line }))
                .collect(),
            Some(keyword) => self
                .grouper
                .group_where(lines, |content| contains_keyword(content, keyword))
                .into_iter()
                .map(|bucket| {
                    time_group(bucket, |line| {
                        highlight_keyword(&line, keyword).unwrap_or_else(|| RenderLine::plain(line))
                    })
                })
                .collect(),
        };

        log::debug!(
            "time view: {} groups (custom filter: {:?})",
            groups.len(),
            custom_filter
        );
        groups
    }

    /// Group lines under the registered filter they match.
    ///
    /// Each line lands in at most one group: the earliest registered filter
    /// it contains, or only `restrict_to` when given. Groups appear in the
    /// order their first line was seen.
    pub fn group_by_preset_filters<S: AsRef<str>>(&self, lines: &[S], restrict_to: Option<&str>) -> Vec<Group> {
        let mut groups: Vec<Group> = Vec::new();

        for line in lines {
            let line = line.as_ref().trim();
            let Some(m) = find_match(line, self.registry.all(), restrict_to) else {
                continue;
            };
            let entry = highlight(line, m.match_start, m.match_end);
            match groups.iter_mut().find(|g| g.label == m.filter.keyword) {
                Some(group) => group.entries.push(entry),
                None => groups.push(Group {
                    label: m.filter.keyword.clone(),
                    color: Some(m.filter.color),
                    ts_iso: None,
                    entries: vec![entry],
                }),
            }
        }

        log::debug!(
            "preset view: {} groups (restricted to: {:?})",
            groups.len(),
            restrict_to
        );
        groups
    }

    /// Time view filtered by `keyword`, or None when it is not registered.
    pub fn registered_filter_view<S: AsRef<str>>(&self, lines: &[S], keyword: &str) -> Option<Vec<Group>> {
        let keyword = keyword.trim();
        if !self.registry.has(keyword) {
            return None;
        }
        log::debug!("'{}' already registered, showing filtered time view", keyword);
        Some(self.group_all_by_time(lines, Some(keyword)))
    }

    /// Apply a user-typed keyword, registering it if `confirm` agrees.
    ///
    /// `confirm` is only consulted for keywords not yet registered.
    pub fn add_custom_filter<S, F>(&mut self, lines: &[S], keyword: &str, confirm: F) -> Result<AddFilterOutcome>
    where
        S: AsRef<str>,
        F: FnOnce(&str) -> bool,
    {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(LogsiftError::InvalidFilter(
                "filter keyword must not be blank".to_string(),
            ));
        }

        if let Some(groups) = self.registered_filter_view(lines, keyword) {
            return Ok(AddFilterOutcome::AlreadyRegistered { groups });
        }

        if confirm(keyword) {
            let filter = self.registry.add(keyword)?;
            let groups = self.group_by_preset_filters(lines, Some(&filter.keyword));
            Ok(AddFilterOutcome::Registered { filter, groups })
        } else {
            log::debug!("'{}' declined, applying once without registering", keyword);
            Ok(AddFilterOutcome::Declined {
                groups: self.group_all_by_time(lines, Some(keyword)),
            })
        }
    }
}

fn time_group<F>(bucket: TimeBucket, render: F) -> Group
where
    F: FnMut(String) -> RenderLine,
{
    let ts_iso = label_to_iso(&bucket.label);
    Group {
        label: bucket.label,
        color: None,
        ts_iso,
        entries: bucket.lines.into_iter().map(render).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::timestamp::UNKNOWN_TIME;
    use crate::types::FilterColor;

    fn scenario_lines() -> Vec<String> {
        vec![
            "2024-01-05 10:00:00 okhttp connect".to_string(),
            "2024-01-05 10:00:00 Network down".to_string(),
            "no timestamp here".to_string(),
        ]
    }

    fn labels(groups: &[Group]) -> Vec<&str> {
        groups.iter().map(|g| g.label.as_str()).collect()
    }

    #[test]
    fn test_scenario_preset_view() {
        let engine = LogGroupingEngine::default();
        let groups = engine.group_by_preset_filters(&scenario_lines(), None);

        assert_eq!(labels(&groups), vec!["okhttp", "Network"]);
        assert_eq!(groups[0].entries.len(), 1);
        assert_eq!(groups[0].entries[0].matched(), Some("okhttp"));
        assert_eq!(groups[0].color, Some(FilterColor::Green));
        assert_eq!(groups[1].entries.len(), 1);
        assert_eq!(groups[1].entries[0].matched(), Some("Network"));
        assert_eq!(groups[1].color, Some(FilterColor::Gray));
    }

    #[test]
    fn test_scenario_time_view() {
        let engine = LogGroupingEngine::default();
        let groups = engine.group_all_by_time(&scenario_lines(), None);

        assert_eq!(labels(&groups), vec!["2024-01-05 10:00:00", UNKNOWN_TIME]);
        assert_eq!(
            groups[0].entries,
            vec![RenderLine::plain("okhttp connect"), RenderLine::plain("Network down")]
        );
        assert_eq!(groups[0].ts_iso.as_deref(), Some("2024-01-05T10:00:00"));
        assert_eq!(groups[1].entries, vec![RenderLine::plain("no timestamp here")]);
        assert_eq!(groups[1].ts_iso, None);
    }

    #[test]
    fn test_time_view_is_idempotent() {
        let engine = LogGroupingEngine::default();
        let lines = scenario_lines();
        assert_eq!(
            engine.group_all_by_time(&lines, None),
            engine.group_all_by_time(&lines, None)
        );
        assert_eq!(
            engine.group_all_by_time(&lines, Some("down")),
            engine.group_all_by_time(&lines, Some("down"))
        );
    }

    #[test]
    fn test_time_view_with_custom_filter() {
        let engine = LogGroupingEngine::default();
        let lines = vec![
            "2024-01-05 10:00:00 okhttp connect",
            "2024-01-05 10:00:01 disk full",
            "stray DISK warning",
        ];
        let groups = engine.group_all_by_time(&lines, Some("disk"));

        assert_eq!(labels(&groups), vec!["2024-01-05 10:00:01", UNKNOWN_TIME]);
        assert_eq!(
            groups[0].entries,
            vec![RenderLine::Highlight {
                prefix: String::new(),
                matched: "disk".to_string(),
                suffix: " full".to_string(),
            }]
        );
        assert_eq!(groups[1].entries[0].matched(), Some("DISK"));
        assert_eq!(groups[1].entries[0].text(), "stray DISK warning");
    }

    #[test]
    fn test_custom_filter_ignores_timestamp_text() {
        let engine = LogGroupingEngine::default();
        let lines = vec!["2024-01-05 10:00:00 boot ok"];
        assert!(engine.group_all_by_time(&lines, Some("10:00")).is_empty());
    }

    #[test]
    fn test_preset_view_highlight_reconstructs_trimmed_line() {
        let engine = LogGroupingEngine::default();
        let lines = vec!["  Firebase token refreshed \n"];
        let groups = engine.group_by_preset_filters(&lines, None);
        assert_eq!(groups[0].entries[0].text(), "Firebase token refreshed");
    }

    #[test]
    fn test_preset_view_one_group_per_line() {
        let engine = LogGroupingEngine::default();
        let lines = vec!["okhttp stream reset", "Stream opened"];
        let groups = engine.group_by_preset_filters(&lines, None);

        // "Stream" sorts before "okhttp", so it claims the first line too
        assert_eq!(labels(&groups), vec!["Stream"]);
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[0].matched(), Some("stream"));
    }

    #[test]
    fn test_preset_view_restricted() {
        let engine = LogGroupingEngine::default();
        let lines = vec!["okhttp stream reset", "Stream opened", "okhttp retry"];
        let groups = engine.group_by_preset_filters(&lines, Some("okhttp"));

        assert_eq!(labels(&groups), vec!["okhttp"]);
        assert_eq!(groups[0].entries.len(), 2);
    }

    #[test]
    fn test_empty_input_produces_no_groups() {
        let engine = LogGroupingEngine::default();
        let lines: Vec<String> = Vec::new();
        assert!(engine.group_all_by_time(&lines, None).is_empty());
        assert!(engine.group_by_preset_filters(&lines, None).is_empty());
    }

    #[test]
    fn test_add_custom_filter_already_registered() {
        let mut engine = LogGroupingEngine::default();
        let before = engine.registry().clone();
        let outcome = engine
            .add_custom_filter(&scenario_lines(), "network", |_| panic!("must not ask"))
            .unwrap();

        assert!(matches!(outcome, AddFilterOutcome::AlreadyRegistered { .. }));
        assert_eq!(labels(outcome.groups()), vec!["2024-01-05 10:00:00"]);
        assert_eq!(engine.registry(), &before);
    }

    #[test]
    fn test_add_custom_filter_confirmed() {
        let mut engine = LogGroupingEngine::default();
        let lines = vec!["2024-01-05 10:00:00 Retrofit call", "other"];
        let outcome = engine.add_custom_filter(&lines, "retrofit", |_| true).unwrap();

        match outcome {
            AddFilterOutcome::Registered { filter, groups } => {
                assert_eq!(filter.keyword, "retrofit");
                assert_eq!(filter.color, FilterColor::FALLBACK);
                assert_eq!(labels(&groups), vec!["retrofit"]);
                assert_eq!(groups[0].entries[0].matched(), Some("Retrofit"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(engine.registry().has("RETROFIT"));
    }

    #[test]
    fn test_add_custom_filter_declined() {
        let mut engine = LogGroupingEngine::default();
        let lines = vec!["2024-01-05 10:00:00 Retrofit call", "other"];
        let outcome = engine.add_custom_filter(&lines, "retrofit", |_| false).unwrap();

        assert!(matches!(outcome, AddFilterOutcome::Declined { .. }));
        assert_eq!(labels(outcome.groups()), vec!["2024-01-05 10:00:00"]);
        assert!(!engine.registry().has("retrofit"));
    }

    #[test]
    fn test_add_custom_filter_trims_keyword() {
        let mut engine = LogGroupingEngine::default();
        let lines = vec!["2024-01-05 10:00:00 Retrofit call"];
        engine.add_custom_filter(&lines, " retrofit ", |_| true).unwrap();
        let outcome = engine
            .add_custom_filter(&lines, "retrofit", |_| panic!("must not ask"))
            .unwrap();

        assert!(matches!(outcome, AddFilterOutcome::AlreadyRegistered { .. }));
        assert_eq!(engine.registry().get("retrofit").unwrap().keyword, "retrofit");
        assert_eq!(engine.filters().len(), crate::query::DEFAULT_PRESETS.len() + 1);
    }

    #[test]
    fn test_registered_filter_view() {
        let engine = LogGroupingEngine::default();
        let lines = scenario_lines();
        let groups = engine.registered_filter_view(&lines, " OKHTTP ").unwrap();
        assert_eq!(groups, engine.group_all_by_time(&lines, Some("OKHTTP")));
        assert!(engine.registered_filter_view(&lines, "retrofit").is_none());
    }

    #[test]
    fn test_add_custom_filter_blank() {
        let mut engine = LogGroupingEngine::default();
        let lines = scenario_lines();
        assert!(engine.add_custom_filter(&lines, "  ", |_| true).is_err());
    }

    #[test]
    fn test_load_error_placeholder_lands_in_unknown_time() {
        let engine = LogGroupingEngine::default();
        let lines = vec!["Error loading file: No such file or directory (os error 2)"];
        let groups = engine.group_all_by_time(&lines, None);
        assert_eq!(labels(&groups), vec![UNKNOWN_TIME]);
        assert!(engine.group_by_preset_filters(&lines, None).is_empty());
    }
}
