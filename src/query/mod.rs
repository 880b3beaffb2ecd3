pub mod matcher;
pub mod registry;

pub use matcher::{contains_keyword, find_case_insensitive, find_match, highlight, highlight_keyword, highlight_split};
pub use registry::{FilterRegistry, DEFAULT_PRESETS};
