//! Templating backend
//!
//! This module provides:
//! - The [`TemplateBackend`] seam the render pipeline calls
//! - A minijinja implementation over the embedded template set or a local
//!   template directory
//! - Local template pack manifests and version compatibility checking
//!
//! Template identifiers are `/`-separated paths without the `.j2` suffix,
//! e.g. `backend/entity/model.ts`.

pub mod embedded;
pub mod manifest;
pub mod renderer;
pub mod version;

use crate::error::Result;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

pub use manifest::TemplatePackManifest;
pub use renderer::MiniJinjaBackend;
pub use version::check_compatibility;

/// Environment variable that points the generator at a local template directory
pub const TEMPLATE_DIR_ENV: &str = "STACKFORGE_TEMPLATE_DIR";

/// Failure reported by a templating backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("template not found")]
    NotFound,

    #[error("{0}")]
    Failed(String),
}

/// Render a template identifier against a JSON context
pub trait TemplateBackend {
    fn has_template(&self, template_id: &str) -> bool;

    fn render(&self, template_id: &str, context: &Value) -> Result<String, BackendError>;
}

/// Where templates come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    Embedded,
    /// A directory of `.j2` files mirroring the embedded layout
    Local(PathBuf),
}

impl TemplateSource {
    /// Explicit directory first, then the environment override, then the embedded set
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::Local(path);
        }
        match std::env::var(TEMPLATE_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::Local(PathBuf::from(dir)),
            _ => Self::Embedded,
        }
    }

    /// Build the minijinja backend for this source
    pub fn backend(&self) -> Result<MiniJinjaBackend> {
        match self {
            TemplateSource::Embedded => Ok(MiniJinjaBackend::embedded()),
            TemplateSource::Local(path) => MiniJinjaBackend::from_dir(path),
        }
    }

    /// Manifest of a local template directory, if it ships one
    pub fn manifest(&self) -> Result<Option<TemplatePackManifest>> {
        match self {
            TemplateSource::Embedded => Ok(None),
            TemplateSource::Local(path) => TemplatePackManifest::load(path),
        }
    }
}
