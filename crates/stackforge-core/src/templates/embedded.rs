//! Templates compiled into the binary
//!
//! Each entry maps a template id to the contents of `templates/<id>.j2` in this
//! crate. Adding a template to the planner means adding it here too; the
//! `test_every_planned_template_is_embedded` test keeps the two in sync.
//! `shared/macros` is never planned; templates pull it in with `{% import %}`.

macro_rules! embed_templates {
    ($($id:literal),* $(,)?) => {
        &[$(($id, include_str!(concat!("../../templates/", $id, ".j2")))),*]
    };
}

/// (template id, source) for every shipped template
pub const TEMPLATES: &[(&str, &str)] = embed_templates![
    // imported by other templates
    "shared/macros",
    // infrastructure
    "docker/backend.Dockerfile",
    "docker/frontend.Dockerfile",
    "docker/docker-compose.yml",
    "ci/github-actions.yml",
    "terraform/main.tf",
    "terraform/variables.tf",
    "terraform/outputs.tf",
    "terraform/terraform.tfvars.example",
    // backend
    "backend/package.json",
    "backend/tsconfig.json",
    "backend/env.example",
    "backend/server.ts",
    "backend/database.ts",
    "backend/middleware/auth.ts",
    "backend/middleware/upload.ts",
    "backend/middleware/error-handler.ts",
    "backend/routes/auth.ts",
    "backend/routes/index.ts",
    "backend/entity/model.ts",
    "backend/entity/migration.ts",
    "backend/entity/test.ts",
    "backend/entity/controller.ts",
    "backend/entity/routes.ts",
    "backend/graphql/type-defs.ts",
    "backend/graphql/resolvers.ts",
    // frontend
    "frontend/package.json",
    "frontend/angular.json",
    "frontend/tsconfig.json",
    "frontend/index.html",
    "frontend/main.ts",
    "frontend/environment.ts",
    "frontend/styles.css",
    "frontend/app.module.ts",
    "frontend/app-routing.module.ts",
    "frontend/app.component.html",
    "frontend/app.component.ts",
    "frontend/auth/auth.service.ts",
    "frontend/auth/auth.interceptor.ts",
    "frontend/auth/auth.guard.ts",
    "frontend/entity/module.ts",
    "frontend/entity/service.ts",
    "frontend/entity/list.component.html",
    "frontend/entity/list.component.ts",
    "frontend/entity/form.component.html",
    "frontend/entity/form.component.ts",
    "frontend/admin/theme.module.ts",
    "frontend/admin/theme.scss",
    "frontend/admin/pages.module.ts",
    "frontend/admin/dashboard.component.html",
    "frontend/admin/dashboard.component.ts",
];

/// Source of an embedded template
pub fn lookup(template_id: &str) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(id, _)| *id == template_id)
        .map(|(_, source)| *source)
}
