//! Schema document model and loading
//!
//! The schema is loaded once per run and never mutated. Loading applies the
//! schema-level field defaults only; feature flag precedence lives in
//! [`crate::features`].

use crate::error::SchemaLoadError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

fn default_database() -> String {
    "postgres".to_string()
}

fn default_dev_database() -> String {
    "sqlite".to_string()
}

fn default_test_database() -> String {
    "sqlite".to_string()
}

/// Parsed, defaulted project schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub project_name: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_dev_database")]
    pub dev_database: String,

    #[serde(default = "default_test_database")]
    pub test_database: String,

    /// Entity used for authentication; auth artifacts fall back to a generic
    /// user shape when unset
    #[serde(default)]
    pub auth_entity: Option<String>,

    /// Generation order follows document order
    #[serde(default)]
    pub entities: Vec<Entity>,

    // Per-run feature overrides. `None` defers to the command-line default.
    #[serde(default)]
    pub graphql: Option<bool>,
    #[serde(default)]
    pub docker: Option<bool>,
    #[serde(default)]
    pub ci: Option<bool>,
    #[serde(default)]
    pub terraform: Option<bool>,
    #[serde(default)]
    pub admin_panel: Option<bool>,
}

/// One domain object. Only `name` and `tableName` are read by the engine;
/// everything else rides along to the templates untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,

    pub table_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            extra: Map::new(),
        }
    }
}

impl Schema {
    /// Load a schema document from disk.
    ///
    /// `.yaml` / `.yml` files are parsed as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, SchemaLoadError> {
        if !path.exists() {
            return Err(SchemaLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let parsed = if is_yaml {
            serde_yaml::from_str::<Schema>(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str::<Schema>(&content).map_err(|e| e.to_string())
        };

        let schema = parsed.map_err(|message| SchemaLoadError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        schema.validate()?;
        Ok(schema)
    }

    /// Parse a JSON schema held in memory
    pub fn from_json_str(content: &str) -> Result<Self, SchemaLoadError> {
        let schema: Schema =
            serde_json::from_str(content).map_err(|e| SchemaLoadError::Parse {
                path: "<inline>".into(),
                message: e.to_string(),
            })?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse a YAML schema held in memory
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaLoadError> {
        let schema: Schema =
            serde_yaml::from_str(content).map_err(|e| SchemaLoadError::Parse {
                path: "<inline>".into(),
                message: e.to_string(),
            })?;
        schema.validate()?;
        Ok(schema)
    }

    /// Entity names feed every naming conversion, which is undefined on "".
    /// Both `name` and `tableName` end up in artifact paths below the output root.
    fn validate(&self) -> Result<(), SchemaLoadError> {
        for (index, entity) in self.entities.iter().enumerate() {
            if entity.name.trim().is_empty() {
                return Err(SchemaLoadError::EmptyEntityName { index });
            }
            for (field, value) in [("name", &entity.name), ("tableName", &entity.table_name)] {
                if !is_path_segment(value) {
                    return Err(SchemaLoadError::InvalidPathSegment {
                        index,
                        field,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Schema serialized as a JSON object, the base layer of every render context
    pub fn to_context(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Entity list serialized for aggregate artifacts
    pub fn entities_value(&self) -> Value {
        serde_json::to_value(&self.entities).unwrap_or(Value::Array(Vec::new()))
    }
}

/// Non-blank, no separators, not `.` or `..`
fn is_path_segment(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && !value.contains(['/', '\\'])
        && trimmed != "."
        && trimmed != ".."
}
