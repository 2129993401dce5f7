//! XPath picker library
//!
//! Ties the candidate generator to document snapshots: configuration, the
//! selection controller and report rendering used by the CLI.

pub mod config;
pub mod controller;
pub mod errors;
pub mod output;
pub mod target;

// Re-export commonly used types for external use
pub use config::PickerConfig;
pub use controller::{ControllerError, Direction, PickerState, Selection, SelectionController};
pub use errors::{PickerError, PickerResult};
pub use output::{EvalReport, OutputFormat, SelectionReport};
pub use target::{load_document, resolve_target};
