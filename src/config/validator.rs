//! Model config validation: names, field references and patterns.

use crate::config::ModelConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// Names become URL path segments and table names.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Declared fields for a model: explicit `fields`, else the sorted keys of `validation`.
pub fn declared_fields(model: &ModelConfig) -> Vec<String> {
    if !model.fields.is_empty() {
        return model.fields.clone();
    }
    let mut fields: Vec<String> = model.validation.keys().cloned().collect();
    fields.sort();
    fields
}

pub fn validate(models: &[ModelConfig]) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    for model in models {
        if !is_valid_name(&model.name) {
            return Err(ConfigError::InvalidName(model.name.clone()));
        }
        if !names.insert(model.name.as_str()) {
            return Err(ConfigError::DuplicateModel(model.name.clone()));
        }

        let fields = declared_fields(model);
        for field in &fields {
            if field.is_empty() {
                return Err(ConfigError::InvalidName(format!("{}.{}", model.name, field)));
            }
        }
        for (field, rule) in &model.validation {
            if !fields.contains(field) {
                return Err(ConfigError::UnknownField {
                    model: model.name.clone(),
                    field: field.clone(),
                });
            }
            if let Some(pattern) = &rule.pattern {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    model: model.name.clone(),
                    target: field.clone(),
                    message: e.to_string(),
                })?;
            }
        }
        if let Some(pattern) = &model.id_pattern {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                model: model.name.clone(),
                target: "id".into(),
                message: e.to_string(),
            })?;
        }
    }
    Ok(())
}
