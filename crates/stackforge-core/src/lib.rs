//! Stackforge Core - generation engine for full-stack project scaffolding
//!
//! Turns a declarative schema (project settings, feature toggles, entity list)
//! into a backend service, a frontend application and optional infrastructure
//! files.
//!
//! # Architecture
//!
//! The engine is a short pipeline of mostly pure stages:
//!
//! - **Schema** ([`schema`]) - load and default the schema document
//! - **Features** ([`features`]) - resolve schema overrides against command-line defaults
//! - **Planning** ([`plan`]) - enumerate every artifact, in a fixed stage order
//! - **Skeleton** ([`skeleton`]) - clear and recreate the output directory tree
//! - **Rendering** ([`render`]) - template backend in, files out through a [`sink::FileSink`]
//!
//! [`generator`] wires the stages together; [`tui`] adds cliclack progress output.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based progress output
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use stackforge_core::generator::{run, GenerateOptions};
//!
//! let report = run(&GenerateOptions::default()).await?;
//! println!("{} files written", report.files.len());
//! ```

pub mod error;
pub mod features;
pub mod generator;
pub mod naming;
pub mod plan;
pub mod render;
pub mod schema;
pub mod sink;
pub mod skeleton;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{GenerateError, SchemaLoadError};
pub use features::{resolve, Feature, FeatureDefaults, ResolvedConfig};
pub use generator::{generate, GenerateOptions, GenerateReport, PreparedRun};
pub use plan::{ArtifactPlan, ArtifactPlanEntry, Stage};
pub use schema::{Entity, Schema};
pub use templates::{MiniJinjaBackend, TemplateBackend, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
