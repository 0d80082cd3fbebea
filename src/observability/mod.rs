//! Observability module
//!
//! Logging and the JSONL event stream used by machine-readable output.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, ansi_enabled, init_logging};
