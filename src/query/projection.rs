//! Field projection parsed from the `fields` query parameter.

use crate::error::StoreError;
use crate::store::{Document, ID_FIELD};
use serde::Serialize;
use std::collections::BTreeMap;

pub const INCLUDE: u8 = 1;
pub const EXCLUDE: u8 = 0;

/// Field name -> inclusion flag (1 include, 0 exclude). Empty means no restriction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Projection {
    fields: BTreeMap<String, u8>,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<u8> {
        self.fields.get(field).copied()
    }

    pub fn include(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), INCLUDE);
        self
    }

    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), EXCLUDE);
        self
    }

    /// Shape a stored document the way a document store does: an inclusion projection keeps the
    /// identifier plus the included fields, an exclusion projection drops the excluded fields.
    /// Mixing both is rejected.
    pub fn apply(&self, doc: Document) -> Result<Document, StoreError> {
        if self.fields.is_empty() {
            return Ok(doc);
        }
        let includes = self.fields.values().filter(|v| **v == INCLUDE).count();
        if includes > 0 && includes < self.fields.len() {
            return Err(StoreError::InvalidProjection(
                "cannot mix inclusion and exclusion".into(),
            ));
        }
        if includes > 0 {
            Ok(doc
                .into_iter()
                .filter(|(k, _)| k == ID_FIELD || self.fields.contains_key(k))
                .collect())
        } else {
            Ok(doc
                .into_iter()
                .filter(|(k, _)| !self.fields.contains_key(k))
                .collect())
        }
    }
}

/// Parse a comma-separated `fields` value: `name` includes, `-name` excludes.
/// Tokens whose base name is not a declared field are dropped.
pub fn build_projection<S: AsRef<str>>(declared_fields: &[S], fields_param: &str) -> Projection {
    let mut projection = Projection::default();
    for token in fields_param.split(',') {
        let token = token.trim();
        let (name, flag) = match token.strip_prefix('-') {
            Some(name) => (name, EXCLUDE),
            None => (token, INCLUDE),
        };
        if name.is_empty() || !declared_fields.iter().any(|f| f.as_ref() == name) {
            continue;
        }
        projection.fields.insert(name.to_string(), flag);
    }
    projection
}
