//! Artifact planning
//!
//! Turns a schema and its resolved feature set into the ordered list of files
//! to generate. Nothing here touches the filesystem or the template engine.

use super::artifact::{ArtifactPlan, ArtifactPlanEntry, Stage};
use super::migration::MigrationSequence;
use crate::error::{GenerateError, Result};
use crate::features::ResolvedConfig;
use crate::naming::{to_camel, to_kebab, to_pascal};
use crate::schema::{Entity, Schema};
use serde_json::{json, Map, Value};

/// (template id, destination) pairs for artifacts that do not vary per entity
type FixedArtifacts = &'static [(&'static str, &'static str)];

const DOCKER_ARTIFACTS: FixedArtifacts = &[
    ("docker/backend.Dockerfile", "backend/Dockerfile"),
    ("docker/frontend.Dockerfile", "frontend/Dockerfile"),
    ("docker/docker-compose.yml", "docker-compose.yml"),
];

const CI_ARTIFACTS: FixedArtifacts = &[("ci/github-actions.yml", ".github/workflows/ci.yml")];

const TERRAFORM_ARTIFACTS: FixedArtifacts = &[
    ("terraform/main.tf", "terraform/main.tf"),
    ("terraform/variables.tf", "terraform/variables.tf"),
    ("terraform/outputs.tf", "terraform/outputs.tf"),
    (
        "terraform/terraform.tfvars.example",
        "terraform/terraform.tfvars.example",
    ),
];

const BACKEND_FIXED: FixedArtifacts = &[
    ("backend/package.json", "backend/package.json"),
    ("backend/tsconfig.json", "backend/tsconfig.json"),
    ("backend/env.example", "backend/.env.example"),
    ("backend/server.ts", "backend/src/server.ts"),
    ("backend/database.ts", "backend/src/config/database.ts"),
    ("backend/middleware/auth.ts", "backend/src/middleware/auth.ts"),
    ("backend/middleware/upload.ts", "backend/src/middleware/upload.ts"),
    (
        "backend/middleware/error-handler.ts",
        "backend/src/middleware/error-handler.ts",
    ),
    ("backend/routes/auth.ts", "backend/src/routes/auth.routes.ts"),
];

const FRONTEND_FIXED: FixedArtifacts = &[
    ("frontend/package.json", "frontend/package.json"),
    ("frontend/angular.json", "frontend/angular.json"),
    ("frontend/tsconfig.json", "frontend/tsconfig.json"),
    ("frontend/index.html", "frontend/src/index.html"),
    ("frontend/main.ts", "frontend/src/main.ts"),
    (
        "frontend/environment.ts",
        "frontend/src/environments/environment.ts",
    ),
    ("frontend/styles.css", "frontend/src/styles.css"),
    ("frontend/app.module.ts", "frontend/src/app/app.module.ts"),
    (
        "frontend/app-routing.module.ts",
        "frontend/src/app/app-routing.module.ts",
    ),
    (
        "frontend/app.component.html",
        "frontend/src/app/app.component.html",
    ),
    (
        "frontend/app.component.ts",
        "frontend/src/app/app.component.ts",
    ),
    (
        "frontend/auth/auth.service.ts",
        "frontend/src/app/core/auth.service.ts",
    ),
    (
        "frontend/auth/auth.interceptor.ts",
        "frontend/src/app/core/auth.interceptor.ts",
    ),
    (
        "frontend/auth/auth.guard.ts",
        "frontend/src/app/core/auth.guard.ts",
    ),
];

/// Templates for the per-entity frontend feature directory, keyed by file suffix
const FRONTEND_ENTITY: &[(&str, &str)] = &[
    ("frontend/entity/module.ts", ".module.ts"),
    ("frontend/entity/service.ts", ".service.ts"),
    ("frontend/entity/list.component.html", "-list.component.html"),
    ("frontend/entity/list.component.ts", "-list.component.ts"),
    ("frontend/entity/form.component.html", "-form.component.html"),
    ("frontend/entity/form.component.ts", "-form.component.ts"),
];

const ADMIN_THEME: FixedArtifacts = &[
    (
        "frontend/admin/theme.module.ts",
        "frontend/src/app/admin/theme/theme.module.ts",
    ),
    (
        "frontend/admin/theme.scss",
        "frontend/src/app/admin/theme/theme.scss",
    ),
    (
        "frontend/admin/pages.module.ts",
        "frontend/src/app/admin/pages/pages.module.ts",
    ),
];

const ADMIN_DASHBOARD: FixedArtifacts = &[
    (
        "frontend/admin/dashboard.component.html",
        "frontend/src/app/admin/pages/dashboard/dashboard.component.html",
    ),
    (
        "frontend/admin/dashboard.component.ts",
        "frontend/src/app/admin/pages/dashboard/dashboard.component.ts",
    ),
];

const ROUTE_INDEX: (&str, &str) = ("backend/routes/index.ts", "backend/src/routes/index.ts");

const GRAPHQL_ARTIFACTS: FixedArtifacts = &[
    ("backend/graphql/type-defs.ts", "backend/src/graphql/typeDefs.ts"),
    ("backend/graphql/resolvers.ts", "backend/src/graphql/resolvers.ts"),
];

/// Every template id the planner can reference, in plan order
pub fn all_template_ids() -> Vec<&'static str> {
    let fixed = DOCKER_ARTIFACTS
        .iter()
        .chain(CI_ARTIFACTS)
        .chain(TERRAFORM_ARTIFACTS)
        .chain(BACKEND_FIXED)
        .map(|(id, _)| *id);

    let backend_entity = BackendEntityTemplate::ALL.into_iter().map(|t| t.template_id());

    let aggregates =
        std::iter::once(ROUTE_INDEX.0).chain(GRAPHQL_ARTIFACTS.iter().map(|(id, _)| *id));

    let frontend = FRONTEND_FIXED
        .iter()
        .map(|(id, _)| *id)
        .chain(FRONTEND_ENTITY.iter().map(|(id, _)| *id))
        .chain(ADMIN_THEME.iter().chain(ADMIN_DASHBOARD).map(|(id, _)| *id));

    fixed
        .chain(backend_entity)
        .chain(aggregates)
        .chain(frontend)
        .collect()
}

/// Per-entity backend artifacts, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendEntityTemplate {
    Model,
    Migration,
    Test,
    Controller,
    Routes,
}

impl BackendEntityTemplate {
    const ALL: [BackendEntityTemplate; 5] = [
        BackendEntityTemplate::Model,
        BackendEntityTemplate::Migration,
        BackendEntityTemplate::Test,
        BackendEntityTemplate::Controller,
        BackendEntityTemplate::Routes,
    ];

    fn template_id(&self) -> &'static str {
        match self {
            BackendEntityTemplate::Model => "backend/entity/model.ts",
            BackendEntityTemplate::Migration => "backend/entity/migration.ts",
            BackendEntityTemplate::Test => "backend/entity/test.ts",
            BackendEntityTemplate::Controller => "backend/entity/controller.ts",
            BackendEntityTemplate::Routes => "backend/entity/routes.ts",
        }
    }
}

/// Builds an [`ArtifactPlan`] for one run
pub struct Planner<'a> {
    schema: &'a Schema,
    config: &'a ResolvedConfig,
    migrations: MigrationSequence,
    plan: ArtifactPlan,
}

impl<'a> Planner<'a> {
    pub fn new(
        schema: &'a Schema,
        config: &'a ResolvedConfig,
        migrations: MigrationSequence,
    ) -> Self {
        Self {
            schema,
            config,
            migrations,
            plan: ArtifactPlan::new(),
        }
    }

    /// Enumerate every artifact in stage order
    pub fn build(mut self) -> Result<ArtifactPlan> {
        let schema = self.schema;

        self.root_infrastructure()?;
        self.fixed(Stage::BackendFixed, BACKEND_FIXED)?;

        for entity in &schema.entities {
            self.backend_entity(entity)?;
        }

        let entities = schema.entities_value();
        self.push(
            Stage::RouteAggregation,
            ROUTE_INDEX.0,
            ROUTE_INDEX.1.to_string(),
            context([("entities", entities.clone())]),
        )?;

        if self.config.graphql {
            let auth_entity = schema
                .auth_entity
                .as_ref()
                .map_or(Value::Null, |name| Value::String(name.clone()));
            for &(template_id, destination) in GRAPHQL_ARTIFACTS {
                self.push(
                    Stage::GraphQl,
                    template_id,
                    destination.to_string(),
                    context([
                        ("entities", entities.clone()),
                        ("authEntity", auth_entity.clone()),
                    ]),
                )?;
            }
        }

        self.fixed(Stage::FrontendFixed, FRONTEND_FIXED)?;

        for entity in &schema.entities {
            self.frontend_entity(entity)?;
        }

        if self.config.admin_panel {
            self.fixed(Stage::Admin, ADMIN_THEME)?;
            for &(template_id, destination) in ADMIN_DASHBOARD {
                self.push(
                    Stage::Admin,
                    template_id,
                    destination.to_string(),
                    context([("entities", entities.clone())]),
                )?;
            }
        }

        Ok(self.plan)
    }

    fn root_infrastructure(&mut self) -> Result<()> {
        if self.config.docker {
            self.fixed(Stage::RootInfrastructure, DOCKER_ARTIFACTS)?;
        }
        if self.config.ci {
            self.fixed(Stage::RootInfrastructure, CI_ARTIFACTS)?;
        }
        if self.config.terraform {
            self.fixed(Stage::RootInfrastructure, TERRAFORM_ARTIFACTS)?;
        }
        Ok(())
    }

    fn backend_entity(&mut self, entity: &Entity) -> Result<()> {
        let names = EntityNames::of(entity);

        for template in BackendEntityTemplate::ALL {
            let mut ctx = names.context(entity);
            let destination = match template {
                BackendEntityTemplate::Model => {
                    format!("backend/src/models/{}.ts", names.pascal)
                }
                BackendEntityTemplate::Migration => {
                    let stamp = self.migrations.next_stamp();
                    let destination = format!(
                        "backend/src/migrations/{}-create-{}.ts",
                        stamp, entity.table_name
                    );
                    ctx.insert("migrationStamp".to_string(), Value::String(stamp));
                    destination
                }
                BackendEntityTemplate::Test => format!("backend/tests/{}.test.ts", names.kebab),
                BackendEntityTemplate::Controller => {
                    format!("backend/src/controllers/{}.controller.ts", names.camel)
                }
                BackendEntityTemplate::Routes => {
                    format!("backend/src/routes/{}.routes.ts", names.kebab)
                }
            };
            self.push_for_entity(
                entity,
                Stage::BackendEntity,
                template.template_id(),
                destination,
                ctx,
            )?;
        }

        Ok(())
    }

    fn frontend_entity(&mut self, entity: &Entity) -> Result<()> {
        let names = EntityNames::of(entity);
        let dir = format!("frontend/src/app/features/{}", names.kebab);

        for &(template_id, suffix) in FRONTEND_ENTITY {
            let destination = format!("{}/{}{}", dir, names.kebab, suffix);
            self.push_for_entity(
                entity,
                Stage::FrontendEntity,
                template_id,
                destination,
                names.context(entity),
            )?;
        }

        Ok(())
    }

    /// Like [`Self::push`], but a clash with an already planned built-in file
    /// names the entity responsible
    fn push_for_entity(
        &mut self,
        entity: &Entity,
        stage: Stage,
        template_id: &'static str,
        destination: String,
        context: Map<String, Value>,
    ) -> Result<()> {
        if let Some(existing) = self.plan.get(&destination) {
            if existing.stage != stage {
                return Err(GenerateError::ReservedDestination {
                    entity: entity.name.clone(),
                    path: destination,
                });
            }
        }
        self.push(stage, template_id, destination, context)
    }

    fn fixed(&mut self, stage: Stage, artifacts: FixedArtifacts) -> Result<()> {
        for &(template_id, destination) in artifacts {
            self.push(stage, template_id, destination.to_string(), Map::new())?;
        }
        Ok(())
    }

    fn push(
        &mut self,
        stage: Stage,
        template_id: &'static str,
        destination: String,
        context: Map<String, Value>,
    ) -> Result<()> {
        self.plan.push(ArtifactPlanEntry {
            stage,
            template_id,
            destination,
            context,
        })
    }
}

/// Naming variants of one entity, shared by both stacks
struct EntityNames {
    pascal: String,
    camel: String,
    kebab: String,
}

impl EntityNames {
    fn of(entity: &Entity) -> Self {
        Self {
            pascal: to_pascal(&entity.name),
            camel: to_camel(&entity.name),
            kebab: to_kebab(&entity.name),
        }
    }

    fn context(&self, entity: &Entity) -> Map<String, Value> {
        context([
            ("entity", serde_json::to_value(entity).unwrap_or(Value::Null)),
            ("entityName", json!(self.pascal)),
            ("entityCamel", json!(self.camel)),
            ("entityKebab", json!(self.kebab)),
            ("tableName", json!(entity.table_name)),
            // an entity without fields still renders a valid model
            (
                "fields",
                entity.extra.get("fields").cloned().unwrap_or_else(|| json!([])),
            ),
        ])
    }
}

fn context<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Plan a run. `migrations` seeds the migration file stamps.
pub fn plan(
    schema: &Schema,
    config: &ResolvedConfig,
    migrations: MigrationSequence,
) -> Result<ArtifactPlan> {
    Planner::new(schema, config, migrations).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{resolve, FeatureDefaults};
    use std::collections::HashSet;

    const BASE: u64 = 1_700_000_000_000;

    fn blog() -> Schema {
        Schema::from_json_str(
            r#"{"projectName": "Blog", "entities": [{"name": "Post", "tableName": "posts"}]}"#,
        )
        .unwrap()
    }

    fn plan_for(schema: &Schema) -> ArtifactPlan {
        let config = resolve(schema, &FeatureDefaults::default());
        plan(schema, &config, MigrationSequence::starting_at(BASE)).unwrap()
    }

    fn all_on() -> ResolvedConfig {
        ResolvedConfig {
            graphql: true,
            docker: true,
            ci: true,
            terraform: true,
            admin_panel: true,
        }
    }

    #[test]
    fn test_default_blog_plan() {
        let plan = plan_for(&blog());

        for dest in [
            "backend/src/models/Post.ts",
            "backend/tests/post.test.ts",
            "backend/src/controllers/post.controller.ts",
            "backend/src/routes/post.routes.ts",
            "backend/src/routes/index.ts",
            "backend/Dockerfile",
            "frontend/Dockerfile",
            "docker-compose.yml",
            ".github/workflows/ci.yml",
            "terraform/main.tf",
            "terraform/terraform.tfvars.example",
        ] {
            assert!(plan.contains(dest), "missing {dest}");
        }
        assert!(plan.contains(&format!(
            "backend/src/migrations/{:013}-create-posts.ts",
            BASE
        )));

        let feature_dir: Vec<_> = plan
            .iter()
            .filter(|e| e.destination.starts_with("frontend/src/app/features/post/"))
            .collect();
        assert_eq!(feature_dir.len(), 6);

        assert_eq!(plan.in_stage(Stage::GraphQl).count(), 0);
        assert_eq!(plan.in_stage(Stage::Admin).count(), 0);
    }

    #[test]
    fn test_graphql_adds_two_entries() {
        let mut schema = blog();
        schema.graphql = Some(true);
        schema.auth_entity = Some("Post".to_string());
        let with = plan_for(&schema);
        let without = plan_for(&blog());

        assert_eq!(with.len(), without.len() + 2);
        let graphql: Vec<_> = with.in_stage(Stage::GraphQl).collect();
        assert_eq!(graphql.len(), 2);
        for entry in graphql {
            assert_eq!(entry.context["entities"][0]["name"], "Post");
            assert_eq!(entry.context["authEntity"], "Post");
        }
    }

    #[test]
    fn test_empty_entities() {
        let schema = Schema::from_json_str(r#"{"projectName": "Empty", "entities": []}"#).unwrap();
        let plan = plan_for(&schema);

        assert_eq!(plan.in_stage(Stage::BackendEntity).count(), 0);
        assert_eq!(plan.in_stage(Stage::FrontendEntity).count(), 0);
        assert_eq!(plan.in_stage(Stage::BackendFixed).count(), BACKEND_FIXED.len());
        assert_eq!(plan.in_stage(Stage::FrontendFixed).count(), FRONTEND_FIXED.len());

        let index = plan.get("backend/src/routes/index.ts").unwrap();
        assert_eq!(index.context["entities"], Value::Array(Vec::new()));
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let mut schema = blog();
        schema.entities.push(Entity::new("Comment", "comments"));
        let config = all_on();
        let plan = plan(&schema, &config, MigrationSequence::starting_at(BASE)).unwrap();

        let stages: Vec<Stage> = plan.iter().map(|e| e.stage).collect();
        let mut sorted = stages.clone();
        sorted.sort();
        assert_eq!(stages, sorted);
        assert_eq!(plan.iter().next().unwrap().destination, "backend/Dockerfile");
        assert_eq!(
            plan.iter().last().unwrap().destination,
            "frontend/src/app/admin/pages/dashboard/dashboard.component.ts"
        );
    }

    #[test]
    fn test_entities_follow_schema_order() {
        let mut schema = blog();
        schema.entities.push(Entity::new("Comment", "comments"));
        let plan = plan_for(&schema);

        let models: Vec<_> = plan
            .in_stage(Stage::BackendEntity)
            .filter(|e| e.template_id == "backend/entity/model.ts")
            .map(|e| e.destination.as_str())
            .collect();
        assert_eq!(
            models,
            ["backend/src/models/Post.ts", "backend/src/models/Comment.ts"]
        );
    }

    #[test]
    fn test_migration_stamps_strictly_increase() {
        let mut schema = blog();
        schema.entities = (0..25)
            .map(|i| Entity::new(format!("Thing{i}"), format!("things_{i}")))
            .collect();
        let plan = plan_for(&schema);

        let stamps: Vec<u64> = plan
            .iter()
            .filter(|e| e.template_id == "backend/entity/migration.ts")
            .map(|e| e.context["migrationStamp"].as_str().unwrap().parse().unwrap())
            .collect();
        assert_eq!(stamps.len(), 25);
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));

        let names: Vec<&str> = plan
            .iter()
            .filter(|e| e.template_id == "backend/entity/migration.ts")
            .map(|e| e.destination.as_str())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let mut schema = blog();
        schema.entities.push(Entity::new("blog-category", "categories"));
        let config = all_on();
        let first = plan(&schema, &config, MigrationSequence::starting_at(BASE)).unwrap();
        let second = plan(&schema, &config, MigrationSequence::starting_at(BASE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_destinations_unique() {
        let mut schema = blog();
        schema.entities.push(Entity::new("Comment", "comments"));
        schema.entities.push(Entity::new("BlogCategory", "blog_categories"));
        let config = all_on();
        let plan = plan(&schema, &config, MigrationSequence::starting_at(BASE)).unwrap();

        let unique: HashSet<_> = plan.iter().map(|e| e.destination.as_str()).collect();
        assert_eq!(unique.len(), plan.len());
    }

    #[test]
    fn test_colliding_entity_names_rejected() {
        let mut schema = blog();
        schema.entities.push(Entity::new("Post", "posts_archive"));
        let config = resolve(&schema, &FeatureDefaults::default());
        let err = plan(&schema, &config, MigrationSequence::starting_at(BASE)).unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateDestination { .. }));
    }

    #[test]
    fn test_entity_clashing_with_builtin_file_is_named() {
        let mut schema = blog();
        schema.entities.push(Entity::new("Auth", "auths"));
        let config = resolve(&schema, &FeatureDefaults::default());
        let err = plan(&schema, &config, MigrationSequence::starting_at(BASE)).unwrap_err();

        match &err {
            GenerateError::ReservedDestination { entity, path } => {
                assert_eq!(entity, "Auth");
                assert_eq!(path, "backend/src/routes/auth.routes.ts");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("rename the entity"));
    }

    #[test]
    fn test_hyphenated_entity_names() {
        let schema = Schema::from_json_str(
            r#"{"projectName": "Blog", "entities": [{"name": "blog-post", "tableName": "blog_posts"}]}"#,
        )
        .unwrap();
        let plan = plan_for(&schema);
        assert!(plan.contains("backend/src/models/BlogPost.ts"));
        assert!(plan.contains("backend/src/controllers/blogPost.controller.ts"));
        assert!(plan.contains("backend/src/routes/blog-post.routes.ts"));
        assert!(plan.contains("frontend/src/app/features/blog-post/blog-post-list.component.ts"));
    }

    #[test]
    fn test_entity_context_carries_opaque_fields() {
        let schema = Schema::from_json_str(
            r#"{"projectName": "Blog", "entities": [
                {"name": "Post", "tableName": "posts", "fields": [{"name": "title"}]}
            ]}"#,
        )
        .unwrap();
        let plan = plan_for(&schema);
        let model = plan.get("backend/src/models/Post.ts").unwrap();
        assert_eq!(model.context["entity"]["fields"][0]["name"], "title");
        assert_eq!(model.context["entityKebab"], "post");
        assert_eq!(model.context["tableName"], "posts");
        assert_eq!(model.context["fields"][0]["name"], "title");

        let bare = plan_for(&blog());
        let model = bare.get("backend/src/models/Post.ts").unwrap();
        assert_eq!(model.context["fields"], json!([]));
    }

    #[test]
    fn test_admin_dashboard_lists_entities() {
        let mut schema = blog();
        schema.admin_panel = Some(true);
        let plan = plan_for(&schema);
        assert_eq!(plan.in_stage(Stage::Admin).count(), 5);
        let dashboard = plan
            .get("frontend/src/app/admin/pages/dashboard/dashboard.component.html")
            .unwrap();
        assert_eq!(dashboard.context["entities"][0]["name"], "Post");
    }

    #[test]
    fn test_all_template_ids_cover_full_plan() {
        let mut schema = blog();
        schema.entities.push(Entity::new("Comment", "comments"));
        let config = all_on();
        let plan = plan(&schema, &config, MigrationSequence::starting_at(BASE)).unwrap();

        let known: HashSet<_> = all_template_ids().into_iter().collect();
        for entry in &plan {
            assert!(known.contains(entry.template_id), "{}", entry.template_id);
        }
        let used: HashSet<_> = plan.iter().map(|e| e.template_id).collect();
        assert_eq!(used.len(), known.len());
    }
}
