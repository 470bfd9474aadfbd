//! Settings for hotkey-recorder
//!
//! This crate parses the KDL settings file (log level, display placeholder,
//! and the persisted accelerator string) and writes it back when a newly
//! recorded hotkey is saved.

mod error;
mod generator;
mod model;
mod parser;

pub use error::ConfigError;
pub use generator::{render_settings, write_settings};
pub use model::*;
pub use parser::{parse_settings, parse_settings_str};
