//! Groups log lines by timestamp or by keyword filter and splits each
//! matching line around the highlighted keyword, for display by a front-end.

pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod query;
pub mod session;
pub mod types;

pub use config::LogsiftConfig;
pub use engine::{AddFilterOutcome, LogGroupingEngine};
pub use error::{LogsiftError, Result};
pub use query::FilterRegistry;
pub use session::{PresetView, Session, SubmitOutcome, TimeView, Views};
pub use types::{Filter, FilterColor, Group, MatchResult, RenderLine};
