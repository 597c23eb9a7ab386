//! Payload validation from per-field rules.

use crate::config::{FieldType, ValidationRule};
use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A `ValidationRule` with its pattern compiled.
#[derive(Clone, Debug, Default)]
pub struct FieldRule {
    rule: ValidationRule,
    pattern: Option<Regex>,
}

impl FieldRule {
    pub fn compile(rule: ValidationRule) -> Result<Self, regex::Error> {
        let pattern = rule.pattern.as_deref().map(Regex::new).transpose()?;
        Ok(FieldRule { rule, pattern })
    }

    pub fn is_required(&self) -> bool {
        self.rule.required == Some(true)
    }

    /// Check a JSON value. Null passes unless the field is required (checked by the caller).
    pub fn check(&self, col: &str, v: &Value) -> Result<(), AppError> {
        if v.is_null() {
            return Ok(());
        }
        let rule = &self.rule;
        if let Some(t) = rule.type_ {
            if !t.matches(v) {
                return Err(AppError::Validation(format!("{} must be {}", col, t.describe())));
            }
        }
        if let Some(format) = &rule.format {
            validate_format(col, v, format)?;
        }
        if let Some(s) = v.as_str() {
            let len = s.chars().count();
            if let Some(max) = rule.max_length {
                if len > max as usize {
                    return Err(AppError::Validation(format!(
                        "{} must be at most {} characters",
                        col, max
                    )));
                }
            }
            if let Some(min) = rule.min_length {
                if len < min as usize {
                    return Err(AppError::Validation(format!(
                        "{} must be at least {} characters",
                        col, min
                    )));
                }
            }
            if let Some(re) = &self.pattern {
                if !re.is_match(s) {
                    return Err(AppError::Validation(format!("{} does not match required pattern", col)));
                }
            }
        }
        if let Some(allowed) = &rule.allowed {
            if !allowed.iter().any(|a| value_eq(v, a)) {
                return Err(AppError::Validation(format!(
                    "{} must be one of: {:?}",
                    col,
                    allowed.iter().take(5).collect::<Vec<_>>()
                )));
            }
        }
        if let Some(n) = v.as_f64() {
            if let Some(min) = rule.minimum {
                if n < min {
                    return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
                }
            }
            if let Some(max) = rule.maximum {
                if n > max {
                    return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
                }
            }
        }
        Ok(())
    }

    /// Check a raw query-string value, converting it to the field's declared type first.
    pub fn check_query(&self, col: &str, raw: &str) -> Result<(), AppError> {
        let value = match self.rule.type_ {
            Some(FieldType::Integer) => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| AppError::Validation(format!("{} must be an integer", col)))?,
            Some(FieldType::Number) => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| AppError::Validation(format!("{} must be a number", col)))?,
            Some(FieldType::Boolean) => match raw {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(AppError::Validation(format!("{} must be a boolean", col))),
            },
            _ => Value::String(raw.to_string()),
        };
        self.check(col, &value)
    }
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::String(t)) => s == t,
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn validate_format(col: &str, v: &Value, format: &str) -> Result<(), AppError> {
    match format.to_lowercase().as_str() {
        "email" => {
            if let Some(s) = v.as_str() {
                if !s.contains('@') || s.len() < 3 {
                    return Err(AppError::Validation(format!("{} must be a valid email", col)));
                }
            }
        }
        "uuid" => {
            if let Some(s) = v.as_str() {
                if uuid::Uuid::parse_str(s).is_err() {
                    return Err(AppError::Validation(format!("{} must be a valid UUID", col)));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Rules for every declared field of a model. Keys outside the schema are rejected.
#[derive(Clone, Debug, Default)]
pub struct PayloadSchema {
    fields: BTreeMap<String, FieldRule>,
}

impl PayloadSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn validate(&self, body: &Map<String, Value>) -> Result<(), AppError> {
        if let Some(unknown) = body.keys().find(|k| !self.fields.contains_key(*k)) {
            return Err(AppError::Validation(format!("{} is not allowed", unknown)));
        }
        for (col, rule) in &self.fields {
            match body.get(col) {
                None | Some(Value::Null) if rule.is_required() => {
                    return Err(AppError::Validation(format!("{} is required", col)));
                }
                Some(v) => rule.check(col, v)?,
                None => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(v: Value) -> FieldRule {
        FieldRule::compile(serde_json::from_value(v).unwrap()).unwrap()
    }

    fn body(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn widget() -> PayloadSchema {
        PayloadSchema::new()
            .field("title", rule(json!({"required": true, "type": "string", "max_length": 20})))
            .field("price", rule(json!({"type": "number", "minimum": 0})))
            .field("status", rule(json!({"allowed": ["new", "used"]})))
    }

    #[test]
    fn accepts_valid_payload() {
        widget()
            .validate(&body(json!({"title": "Lamp", "price": 9.5, "status": "new"})))
            .unwrap();
    }

    #[test]
    fn required_and_unknown() {
        let err = widget().validate(&body(json!({"price": 1}))).unwrap_err();
        assert_eq!(err.to_string(), "validation: title is required");
        let err = widget()
            .validate(&body(json!({"title": "Lamp", "color": "red"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "validation: color is not allowed");
    }

    #[test]
    fn type_bounds_and_allowed() {
        assert!(widget().validate(&body(json!({"title": 3}))).is_err());
        assert!(widget().validate(&body(json!({"title": "x", "price": -1}))).is_err());
        assert!(widget().validate(&body(json!({"title": "x", "status": "broken"}))).is_err());
        assert!(widget()
            .validate(&body(json!({"title": "a very long lamp title indeed"})))
            .is_err());
    }

    #[test]
    fn query_values_are_coerced() {
        let price = rule(json!({"type": "number", "maximum": 10}));
        assert!(price.check_query("price", "9.5").is_ok());
        assert!(price.check_query("price", "11").is_err());
        assert!(price.check_query("price", "cheap").is_err());
        let flag = rule(json!({"type": "boolean"}));
        assert!(flag.check_query("sold", "true").is_ok());
        assert!(flag.check_query("sold", "yes").is_err());
    }

    #[test]
    fn pattern_is_compiled_once() {
        let code = rule(json!({"pattern": "^[A-Z]{3}$"}));
        assert!(code.check("code", &json!("ABC")).is_ok());
        assert!(code.check("code", &json!("abc")).is_err());
        assert!(FieldRule::compile(ValidationRule {
            pattern: Some("(".into()),
            ..Default::default()
        })
        .is_err());
    }
}
