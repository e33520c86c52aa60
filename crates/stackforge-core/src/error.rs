//! Error types for schema loading and project generation

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a schema document into a [`Schema`](crate::schema::Schema)
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("Schema file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read schema {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Entity #{index} has an empty name")]
    EmptyEntityName { index: usize },

    /// `name` and `tableName` become file names, so they must stay a single path segment
    #[error("Entity #{index} has an invalid {field} '{value}': expected a single file name segment")]
    InvalidPathSegment {
        index: usize,
        field: &'static str,
        value: String,
    },
}

/// Errors that abort a generation run
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    SchemaLoad(#[from] SchemaLoadError),

    #[error("Template '{template_id}' not found (needed for {destination})")]
    TemplateNotFound {
        template_id: String,
        destination: String,
    },

    #[error("Failed to render template '{template_id}' into {destination}: {message}")]
    Render {
        template_id: String,
        destination: String,
        message: String,
    },

    #[error("Two artifacts target the same path: {path}")]
    DuplicateDestination { path: String },

    #[error("Entity '{entity}' would generate {path}, which is a built-in file; rename the entity")]
    ReservedDestination { entity: String, path: String },

    #[error("Filesystem error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template directory {}: {message}", path.display())]
    TemplatePack { path: PathBuf, message: String },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
