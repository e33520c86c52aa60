//! Local template pack manifest (`template.yaml`)

use crate::error::{GenerateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the optional manifest at the root of a template directory
pub const MANIFEST_FILE: &str = "template.yaml";

/// Metadata describing a local template directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatePackManifest {
    /// Display name of the template pack
    pub name: String,

    /// Description of what the pack generates
    #[serde(default)]
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,
}

impl TemplatePackManifest {
    /// Read `template.yaml` from a template directory. A directory without one is fine.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| GenerateError::io(&path, e))?;
        let manifest = serde_yaml::from_str(&content).map_err(|e| GenerateError::TemplatePack {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Some(manifest))
    }
}
