//! Output directory skeleton
//!
//! Generation is full-regeneration: an existing output directory is removed
//! before the skeleton is recreated. This must finish before any artifact is
//! rendered.

use crate::error::Result;
use crate::features::ResolvedConfig;
use crate::sink::FileSink;
use std::path::Path;

const BACKEND_DIRS: &[&str] = &[
    "backend/src/config",
    "backend/src/middleware",
    "backend/src/models",
    "backend/src/migrations",
    "backend/src/controllers",
    "backend/src/routes",
    "backend/tests",
    "backend/uploads",
];

const FRONTEND_DIRS: &[&str] = &[
    "frontend/src/environments",
    "frontend/src/assets",
    "frontend/src/app/core",
    "frontend/src/app/features",
];

const GRAPHQL_DIRS: &[&str] = &["backend/src/graphql"];

const CI_DIRS: &[&str] = &[".github/workflows"];

const TERRAFORM_DIRS: &[&str] = &["terraform"];

const ADMIN_DIRS: &[&str] = &[
    "frontend/src/app/admin/theme",
    "frontend/src/app/admin/pages/dashboard",
];

/// Relative directories to create for a resolved feature set
pub fn skeleton_dirs(config: &ResolvedConfig) -> Vec<&'static str> {
    let mut dirs: Vec<&'static str> = BACKEND_DIRS.iter().chain(FRONTEND_DIRS).copied().collect();

    if config.graphql {
        dirs.extend(GRAPHQL_DIRS);
    }
    if config.ci {
        dirs.extend(CI_DIRS);
    }
    if config.terraform {
        dirs.extend(TERRAFORM_DIRS);
    }
    if config.admin_panel {
        dirs.extend(ADMIN_DIRS);
    }

    dirs
}

/// Clear `output_root` and recreate the directory skeleton
pub async fn prepare<S: FileSink>(
    sink: &S,
    output_root: &Path,
    config: &ResolvedConfig,
) -> Result<()> {
    sink.clear_dir(output_root).await?;
    sink.create_dir_all(output_root).await?;

    for dir in skeleton_dirs(config) {
        sink.create_dir_all(&output_root.join(dir)).await?;
    }

    Ok(())
}
