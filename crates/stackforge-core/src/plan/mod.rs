//! Artifact planning
//!
//! This module provides:
//! - Plan entry types tagged with their generation [`Stage`]
//! - The [`Planner`] that enumerates artifacts for a schema
//! - Strictly increasing migration stamps

pub mod artifact;
pub mod migration;
pub mod planner;

pub use artifact::{ArtifactPlan, ArtifactPlanEntry, Stage};
pub use migration::MigrationSequence;
pub use planner::{all_template_ids, plan, Planner};
