//! Planned artifact types

use crate::error::{GenerateError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Generation stage; entries of a plan appear in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    RootInfrastructure,
    BackendFixed,
    BackendEntity,
    RouteAggregation,
    GraphQl,
    FrontendFixed,
    FrontendEntity,
    Admin,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::RootInfrastructure => "infrastructure",
            Stage::BackendFixed => "backend",
            Stage::BackendEntity => "backend entity",
            Stage::RouteAggregation => "routes",
            Stage::GraphQl => "graphql",
            Stage::FrontendFixed => "frontend",
            Stage::FrontendEntity => "frontend entity",
            Stage::Admin => "admin",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One file to generate
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPlanEntry {
    pub stage: Stage,
    pub template_id: &'static str,
    /// Relative to the output root, always `/`-separated
    pub destination: String,
    pub context: Map<String, Value>,
}

/// Ordered, destination-unique set of artifacts for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactPlan {
    entries: Vec<ArtifactPlanEntry>,
    destinations: HashSet<String>,
}

impl ArtifactPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, rejecting a destination that is already planned
    pub fn push(&mut self, entry: ArtifactPlanEntry) -> Result<()> {
        if !self.destinations.insert(entry.destination.clone()) {
            return Err(GenerateError::DuplicateDestination {
                path: entry.destination,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[ArtifactPlanEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArtifactPlanEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn in_stage(&self, stage: Stage) -> impl Iterator<Item = &ArtifactPlanEntry> {
        self.entries.iter().filter(move |e| e.stage == stage)
    }

    pub fn contains(&self, destination: &str) -> bool {
        self.destinations.contains(destination)
    }

    pub fn get(&self, destination: &str) -> Option<&ArtifactPlanEntry> {
        self.entries.iter().find(|e| e.destination == destination)
    }
}

impl<'a> IntoIterator for &'a ArtifactPlan {
    type Item = &'a ArtifactPlanEntry;
    type IntoIter = std::slice::Iter<'a, ArtifactPlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
