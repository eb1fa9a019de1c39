pub mod csv;
pub mod log;

pub use log::{FinishedLog, LogError, LogRecord, DEFAULT_LOG_FILE};
