//! minijinja-backed [`TemplateBackend`]

use super::embedded;
use super::manifest::MANIFEST_FILE;
use super::{BackendError, TemplateBackend};
use crate::error::{GenerateError, Result};
use crate::naming;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use walkdir::WalkDir;

const TEMPLATE_SUFFIX: &str = ".j2";

/// Template backend over a minijinja environment.
///
/// Templates are compiled lazily through the environment loader, so a syntax
/// error is reported against the artifact being rendered. Undefined context
/// references are errors, and output is never HTML-escaped.
pub struct MiniJinjaBackend {
    env: Environment<'static>,
    ids: HashSet<String>,
}

impl MiniJinjaBackend {
    /// Backend over the templates compiled into the binary
    pub fn embedded() -> Self {
        let ids = embedded::TEMPLATES
            .iter()
            .map(|(id, _)| id.to_string())
            .collect();

        let mut env = base_environment();
        env.set_loader(|name| Ok(embedded::lookup(name).map(str::to_string)));

        Self { env, ids }
    }

    /// Backend over every `.j2` file below `dir`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let sources = read_template_dir(dir)?;
        Ok(Self::from_sources(sources))
    }

    /// Backend over in-memory sources keyed by template id
    pub fn from_sources(sources: HashMap<String, String>) -> Self {
        let ids = sources.keys().cloned().collect();

        let mut env = base_environment();
        env.set_loader(move |name| Ok(sources.get(name).cloned()));

        Self { env, ids }
    }

    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl TemplateBackend for MiniJinjaBackend {
    fn has_template(&self, template_id: &str) -> bool {
        self.ids.contains(template_id)
    }

    fn render(&self, template_id: &str, context: &Value) -> Result<String, BackendError> {
        let template = self.env.get_template(template_id).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => BackendError::NotFound,
            _ => BackendError::Failed(e.to_string()),
        })?;

        template
            .render(context)
            .map_err(|e| BackendError::Failed(e.to_string()))
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    // naming helpers, callable as functions or filters
    env.add_function("pascal", |s: String| naming::to_pascal(&s));
    env.add_function("camel", |s: String| naming::to_camel(&s));
    env.add_function("kebab", |s: String| naming::to_kebab(&s));
    env.add_filter("pascal", |s: String| naming::to_pascal(&s));
    env.add_filter("camel", |s: String| naming::to_camel(&s));
    env.add_filter("kebab", |s: String| naming::to_kebab(&s));

    env
}

/// Collect `<id>.j2` files below `dir`, keyed by `/`-separated id
fn read_template_dir(dir: &Path) -> Result<HashMap<String, String>> {
    if !dir.is_dir() {
        return Err(GenerateError::TemplatePack {
            path: dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut sources = HashMap::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| GenerateError::TemplatePack {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if relative == MANIFEST_FILE {
            continue;
        }
        let Some(id) = relative.strip_suffix(TEMPLATE_SUFFIX) else {
            continue;
        };

        let source = std::fs::read_to_string(entry.path())
            .map_err(|e| GenerateError::io(entry.path(), e))?;
        sources.insert(id.to_string(), source);
    }

    Ok(sources)
}
