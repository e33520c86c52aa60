//! Interactive progress output using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod progress;

#[cfg(feature = "tui")]
pub use progress::{run, RunArgs};
