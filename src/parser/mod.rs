pub mod loader;
pub mod timestamp;

pub use loader::{load_log_file, load_pdf_file, load_source, load_word_file, read_log_file, read_pdf_file, read_word_file};
pub use timestamp::{label_to_iso, split_timestamp, TimeBucket, TimestampGrouper, TIMESTAMP_RE, UNKNOWN_TIME};
