//! Load model configs from JSON and resolve them into descriptors.

use crate::config::resolved::{ModelDescriptor, ResolvedModels, DEFAULT_ID_PATTERN};
use crate::config::{declared_fields, validate, ModelConfig};
use crate::error::ConfigError;
use crate::validation::{FieldRule, PayloadSchema};
use regex::Regex;
use std::path::Path;

/// Build descriptors from model configs (validates first).
pub fn resolve(models: &[ModelConfig]) -> Result<ResolvedModels, ConfigError> {
    validate(models)?;
    let mut out = Vec::with_capacity(models.len());
    for model in models {
        let fields = declared_fields(model);
        let mut payload_schema = PayloadSchema::new();
        for field in &fields {
            let rule = model.validation.get(field).cloned().unwrap_or_default();
            let rule = FieldRule::compile(rule).map_err(|e| ConfigError::InvalidPattern {
                model: model.name.clone(),
                target: field.clone(),
                message: e.to_string(),
            })?;
            payload_schema = payload_schema.field(field.clone(), rule);
        }
        let pattern = model.id_pattern.as_deref().unwrap_or(DEFAULT_ID_PATTERN);
        let id_pattern = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            model: model.name.clone(),
            target: "id".into(),
            message: e.to_string(),
        })?;
        tracing::debug!(model = %model.name, fields = fields.len(), "resolved model");
        out.push(ModelDescriptor::new(model.name.clone(), fields, payload_schema, id_pattern));
    }
    Ok(ResolvedModels { models: out })
}

/// Parse a JSON array of model configs.
pub fn load_models_from_str(json: &str) -> Result<Vec<ModelConfig>, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
}

/// Read and parse a models file.
pub async fn load_models_from_path(path: impl AsRef<Path>) -> Result<Vec<ModelConfig>, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    load_models_from_str(&raw)
}
