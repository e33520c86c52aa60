//! Feature flag resolution
//!
//! A run resolves its flags exactly once. Every downstream decision (planned
//! artifacts, skeleton directories, template context) reads the returned
//! [`ResolvedConfig`] and never the raw schema or command-line values.

use crate::schema::Schema;
use serde::Serialize;
use std::fmt;

/// Optional capabilities of a generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    GraphQl,
    Docker,
    Ci,
    Terraform,
    AdminPanel,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::GraphQl,
        Feature::Docker,
        Feature::Ci,
        Feature::Terraform,
        Feature::AdminPanel,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::GraphQl => "GraphQL",
            Feature::Docker => "Docker",
            Feature::Ci => "CI pipeline",
            Feature::Terraform => "Terraform",
            Feature::AdminPanel => "Admin panel",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Command-line defaults, used for any flag the schema leaves unset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDefaults {
    pub graphql: bool,
    pub docker: bool,
    pub ci: bool,
    pub terraform: bool,
    pub admin_panel: bool,
}

impl Default for FeatureDefaults {
    fn default() -> Self {
        Self {
            graphql: false,
            docker: true,
            ci: true,
            terraform: true,
            admin_panel: false,
        }
    }
}

/// Final feature set for one generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub graphql: bool,
    pub docker: bool,
    pub ci: bool,
    pub terraform: bool,
    pub admin_panel: bool,
}

impl ResolvedConfig {
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::GraphQl => self.graphql,
            Feature::Docker => self.docker,
            Feature::Ci => self.ci,
            Feature::Terraform => self.terraform,
            Feature::AdminPanel => self.admin_panel,
        }
    }

    pub fn enabled(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }

    pub(crate) fn to_value(self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Combine schema overrides with command-line defaults.
///
/// An explicit `true`/`false` in the schema wins; an absent or `null` flag
/// takes the command-line default.
pub fn resolve(schema: &Schema, defaults: &FeatureDefaults) -> ResolvedConfig {
    ResolvedConfig {
        graphql: schema.graphql.unwrap_or(defaults.graphql),
        docker: schema.docker.unwrap_or(defaults.docker),
        ci: schema.ci.unwrap_or(defaults.ci),
        terraform: schema.terraform.unwrap_or(defaults.terraform),
        admin_panel: schema.admin_panel.unwrap_or(defaults.admin_panel),
    }
}
