//! Route input validation: path params, query params and payload, checked before a handler runs.

use crate::error::AppError;
use crate::routes::RouteRequest;
use crate::validation::{FieldRule, PayloadSchema};
use regex::Regex;
use serde_json::Map;
use std::collections::HashMap;

/// Rule for a single query parameter.
#[derive(Clone, Debug)]
pub enum ParamRule {
    /// A model field used as an optional filter.
    Field(FieldRule),
    Integer {
        min: i64,
        max: Option<i64>,
        default: i64,
    },
    Pattern {
        regex: Regex,
        default: String,
    },
}

impl ParamRule {
    fn default_value(&self) -> Option<String> {
        match self {
            ParamRule::Field(_) => None,
            ParamRule::Integer { default, .. } => Some(default.to_string()),
            ParamRule::Pattern { default, .. } => Some(default.clone()),
        }
    }

    fn check(&self, key: &str, raw: &str) -> Result<(), AppError> {
        match self {
            ParamRule::Field(rule) => rule.check_query(key, raw),
            ParamRule::Integer { min, max, .. } => {
                let n: i64 = raw
                    .parse()
                    .map_err(|_| AppError::Validation(format!("{} must be an integer", key)))?;
                if n < *min {
                    return Err(AppError::Validation(format!("{} must be at least {}", key, min)));
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(AppError::Validation(format!("{} must be at most {}", key, max)));
                    }
                }
                Ok(())
            }
            ParamRule::Pattern { regex, .. } => {
                if regex.is_match(raw) {
                    Ok(())
                } else {
                    Err(AppError::Validation(format!("{} does not match required pattern", key)))
                }
            }
        }
    }
}

/// Query parameter rules by key. Keys without a rule pass through untouched.
#[derive(Clone, Debug, Default)]
pub struct QuerySchema {
    rules: HashMap<String, ParamRule>,
}

impl QuerySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every payload field as an optional filter.
    pub fn from_payload(schema: &PayloadSchema) -> Self {
        let rules = schema
            .iter()
            .map(|(name, rule)| (name.to_string(), ParamRule::Field(rule.clone())))
            .collect();
        QuerySchema { rules }
    }

    /// Add or replace the rule for `key`.
    pub fn with(mut self, key: impl Into<String>, rule: ParamRule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Rules from `other` replace rules with the same key.
    pub fn merge(mut self, other: QuerySchema) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamRule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check present values and fill defaults for absent or empty ones.
    pub fn validate(&self, query: &mut HashMap<String, String>) -> Result<(), AppError> {
        for (key, rule) in &self.rules {
            match query.get(key) {
                Some(raw) if !raw.is_empty() => rule.check(key, raw)?,
                _ => {
                    if let Some(default) = rule.default_value() {
                        query.insert(key.clone(), default);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Path parameter rules; the only path parameter is the record identifier.
#[derive(Clone, Debug)]
pub struct ParamsSchema {
    pub id: Regex,
}

impl ParamsSchema {
    pub fn validate(&self, params: &HashMap<String, String>) -> Result<(), AppError> {
        let id = params
            .get("id")
            .ok_or_else(|| AppError::Validation("id is required".into()))?;
        if !self.id.is_match(id) {
            return Err(AppError::Validation(format!(
                "id must match pattern {}",
                self.id.as_str()
            )));
        }
        Ok(())
    }
}

/// Everything a route checks before invoking its handler.
#[derive(Clone, Debug, Default)]
pub struct InputValidation {
    pub params: Option<ParamsSchema>,
    pub query: Option<QuerySchema>,
    pub payload: Option<PayloadSchema>,
}

impl InputValidation {
    pub fn validate(&self, req: &mut RouteRequest) -> Result<(), AppError> {
        if let Some(params) = &self.params {
            params.validate(&req.params)?;
        }
        if let Some(query) = &self.query {
            query.validate(&mut req.query)?;
        }
        if let Some(payload) = &self.payload {
            let body = req.payload.get_or_insert_with(Map::new);
            payload.validate(body)?;
        }
        Ok(())
    }
}
