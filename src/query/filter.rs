//! Equality filters built from query parameters that name declared fields.

use crate::store::Document;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Field name -> literal to match. Values stay strings; stores compare against the field's text form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Filter {
    fields: BTreeMap<String, String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// True when every condition matches the document's field rendered as text.
    pub fn matches(&self, doc: &Document) -> bool {
        self.fields
            .iter()
            .all(|(k, v)| doc.get(k).and_then(text_form).as_deref() == Some(v.as_str()))
    }
}

/// Text rendering used for comparisons; null never matches.
fn text_form(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Keep each declared field that has a non-empty value in `query_params`.
pub fn build_filter<S: AsRef<str>>(declared_fields: &[S], query_params: &HashMap<String, String>) -> Filter {
    let mut filter = Filter::default();
    for field in declared_fields {
        let field = field.as_ref();
        if let Some(value) = query_params.get(field) {
            if !value.is_empty() {
                filter.fields.insert(field.to_string(), value.clone());
            }
        }
    }
    filter
}
