//! Resolved model: config validated and compiled for runtime use.

use crate::validation::PayloadSchema;
use regex::Regex;

/// Hyphenated UUID, the identifier format assigned by the bundled stores.
pub const DEFAULT_ID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

/// Everything the route factory needs to know about one model.
#[derive(Clone, Debug)]
pub struct ModelDescriptor {
    /// Collection name and URL path segment.
    pub name: String,
    pub fields: Vec<String>,
    pub payload_schema: PayloadSchema,
    pub id_pattern: Regex,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<String>, payload_schema: PayloadSchema, id_pattern: Regex) -> Self {
        ModelDescriptor {
            name: name.into(),
            fields,
            payload_schema,
            id_pattern,
        }
    }

    /// Base path for this model's routes, e.g. `/widget`.
    pub fn base_path(&self) -> String {
        format!("/{}", self.name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedModels {
    pub models: Vec<ModelDescriptor>,
}

impl ResolvedModels {
    pub fn by_name(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }
}
