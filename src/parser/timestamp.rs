use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Leading `YYYY-MM-DD HH:MM:SS` prefix
pub static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}").unwrap()
});

/// Label used for lines without a timestamp prefix
pub const UNKNOWN_TIME: &str = "Unknown Time";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lines sharing one timestamp label, stripped of the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBucket {
    pub label: String,
    pub lines: Vec<String>,
}

impl TimeBucket {
    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_TIME
    }
}

/// Split a line into its bucket label and the stored content.
pub fn split_timestamp(line: &str) -> (&str, &str) {
    match TIMESTAMP_RE.find(line) {
        Some(m) => (m.as_str(), line[m.end()..].trim()),
        None => (UNKNOWN_TIME, line.trim()),
    }
}

/// Parse a label produced by [`split_timestamp`] into an ISO-8601 string.
/// Returns None for the unknown-time label and for impossible dates.
pub fn label_to_iso(label: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(label, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Groups lines by exact timestamp prefix, keeping first-seen label order.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampGrouper;

impl TimestampGrouper {
    pub fn new() -> Self {
        Self
    }

    pub fn group<S: AsRef<str>>(&self, lines: &[S]) -> Vec<TimeBucket> {
        self.group_where(lines, |_| true)
    }

    /// Like [`group`](Self::group), keeping only lines whose stored content
    /// passes `keep`. Labels whose every line was rejected are not emitted.
    pub fn group_where<S, F>(&self, lines: &[S], mut keep: F) -> Vec<TimeBucket>
    where
        S: AsRef<str>,
        F: FnMut(&str) -> bool,
    {
        let mut buckets: Vec<TimeBucket> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for line in lines {
            let (label, content) = split_timestamp(line.as_ref());
            if !keep(content) {
                continue;
            }
            let idx = match positions.get(label) {
                Some(&idx) => idx,
                None => {
                    buckets.push(TimeBucket {
                        label: label.to_string(),
                        lines: Vec::new(),
                    });
                    positions.insert(label.to_string(), buckets.len() - 1);
                    buckets.len() - 1
                }
            };
            buckets[idx].lines.push(content.to_string());
        }

        log::debug!(
            "grouped {} lines into {} time buckets",
            lines.len(),
            buckets.len()
        );
        buckets
    }
}
