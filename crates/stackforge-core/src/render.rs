//! Render pipeline: template backend in, files out

use crate::error::{GenerateError, Result};
use crate::features::ResolvedConfig;
use crate::plan::ArtifactPlanEntry;
use crate::schema::Schema;
use crate::sink::FileSink;
use crate::templates::{BackendError, TemplateBackend};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Renders plan entries below one output root.
///
/// Context precedence, lowest first: the naming helpers registered on the
/// backend, the serialized schema plus the resolved `features`, then the
/// entry's own context.
pub struct RenderPipeline<'a, B, S> {
    backend: &'a B,
    sink: &'a S,
    output_root: &'a Path,
    base: Map<String, Value>,
}

impl<'a, B: TemplateBackend, S: FileSink> RenderPipeline<'a, B, S> {
    pub fn new(
        backend: &'a B,
        sink: &'a S,
        output_root: &'a Path,
        schema: &Schema,
        config: &ResolvedConfig,
    ) -> Self {
        let mut base = schema.to_context();
        base.insert("features".to_string(), config.to_value());

        Self {
            backend,
            sink,
            output_root,
            base,
        }
    }

    /// Full render context for an entry
    pub fn context_for(&self, entry: &ArtifactPlanEntry) -> Value {
        let mut ctx = self.base.clone();
        for (key, value) in &entry.context {
            ctx.insert(key.clone(), value.clone());
        }
        Value::Object(ctx)
    }

    /// Render one entry and write it; returns the absolute destination
    pub async fn render(&self, entry: &ArtifactPlanEntry) -> Result<PathBuf> {
        let context = self.context_for(entry);

        let text = self
            .backend
            .render(entry.template_id, &context)
            .map_err(|e| match e {
                BackendError::NotFound => GenerateError::TemplateNotFound {
                    template_id: entry.template_id.to_string(),
                    destination: entry.destination.clone(),
                },
                BackendError::Failed(message) => GenerateError::Render {
                    template_id: entry.template_id.to_string(),
                    destination: entry.destination.clone(),
                    message,
                },
            })?;

        let path = self.output_root.join(&entry.destination);
        self.sink.write_file(&path, &text).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{resolve, FeatureDefaults};
    use crate::plan::Stage;
    use crate::templates::MiniJinjaBackend;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    /// Records writes instead of touching disk
    #[derive(Default)]
    struct MemorySink {
        files: Mutex<BTreeMap<PathBuf, String>>,
    }

    impl FileSink for MemorySink {
        async fn create_dir_all(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        async fn clear_dir(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }
    }

    fn schema() -> Schema {
        Schema::from_json_str(
            r#"{"projectName": "Blog", "graphql": null,
                "entities": [{"name": "Post", "tableName": "posts"}]}"#,
        )
        .unwrap()
    }

    fn entry(template_id: &'static str, context: Value) -> ArtifactPlanEntry {
        ArtifactPlanEntry {
            stage: Stage::BackendEntity,
            template_id,
            destination: "backend/out.ts".to_string(),
            context: match context {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    fn backend(pairs: &[(&str, &str)]) -> MiniJinjaBackend {
        MiniJinjaBackend::from_sources(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_entry_context_overrides_schema() {
        let schema = schema();
        let config = resolve(&schema, &FeatureDefaults::default());
        let b = backend(&[]);
        let sink = MemorySink::default();
        let pipeline = RenderPipeline::new(&b, &sink, Path::new("out"), &schema, &config);

        let ctx = pipeline.context_for(&entry("t", json!({"projectName": "Override"})));
        assert_eq!(ctx["projectName"], "Override");
        assert_eq!(ctx["database"], "postgres");
        assert_eq!(ctx["entities"][0]["name"], "Post");
    }

    #[test]
    fn test_context_exposes_resolved_features() {
        let schema = schema();
        let config = resolve(&schema, &FeatureDefaults::default());
        let b = backend(&[]);
        let sink = MemorySink::default();
        let pipeline = RenderPipeline::new(&b, &sink, Path::new("out"), &schema, &config);

        let ctx = pipeline.context_for(&entry("t", json!({})));
        assert_eq!(ctx["features"]["graphql"], false);
        assert_eq!(ctx["features"]["docker"], true);
        assert_eq!(ctx["features"]["adminPanel"], false);
    }

    #[tokio::test]
    async fn test_render_writes_below_root() {
        let schema = schema();
        let config = resolve(&schema, &FeatureDefaults::default());
        let b = backend(&[("t", "{{ projectName }}:{{ kebab(entityName) }}")]);
        let sink = MemorySink::default();
        let pipeline = RenderPipeline::new(&b, &sink, Path::new("out"), &schema, &config);

        let path = pipeline
            .render(&entry("t", json!({"entityName": "BlogPost"})))
            .await
            .unwrap();

        assert_eq!(path, Path::new("out/backend/out.ts"));
        let files = sink.files.lock().unwrap();
        assert_eq!(files[&path], "Blog:blog-post");
    }

    #[tokio::test]
    async fn test_missing_template_maps_to_not_found() {
        let schema = schema();
        let config = resolve(&schema, &FeatureDefaults::default());
        let b = backend(&[]);
        let sink = MemorySink::default();
        let pipeline = RenderPipeline::new(&b, &sink, Path::new("out"), &schema, &config);

        let err = pipeline.render(&entry("ghost", json!({}))).await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::TemplateNotFound { ref template_id, ref destination }
                if template_id == "ghost" && destination == "backend/out.ts"
        ));
        assert!(sink.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_names_artifact() {
        let schema = schema();
        let config = resolve(&schema, &FeatureDefaults::default());
        let b = backend(&[("t", "{{ notInContext }}")]);
        let sink = MemorySink::default();
        let pipeline = RenderPipeline::new(&b, &sink, Path::new("out"), &schema, &config);

        let err = pipeline.render(&entry("t", json!({}))).await.unwrap_err();
        match err {
            GenerateError::Render {
                template_id,
                destination,
                ..
            } => {
                assert_eq!(template_id, "t");
                assert_eq!(destination, "backend/out.ts");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
