//! In-process document store for development and tests.

use crate::error::StoreError;
use crate::query::{Filter, Projection};
use crate::store::{DeleteResult, Document, DocumentStore, FindQuery, ReturnDocument, ID_FIELD};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Collections of documents kept in insertion order behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(doc: &Document, id: &str) -> bool {
    doc.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut data: Document) -> Result<Value, StoreError> {
        data.insert(ID_FIELD.into(), Value::String(uuid::Uuid::new_v4().to_string()));
        let mut guard = self.collections.write().await;
        guard.entry(collection.to_string()).or_default().push(data.clone());
        Ok(Value::Object(data))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        projection: &Projection,
    ) -> Result<Option<Value>, StoreError> {
        let guard = self.collections.read().await;
        let Some(doc) = guard
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
        else {
            return Ok(None);
        };
        Ok(Some(Value::Object(projection.apply(doc.clone())?)))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        mut data: Document,
        return_document: ReturnDocument,
    ) -> Result<Option<Value>, StoreError> {
        data.remove(ID_FIELD);
        let mut guard = self.collections.write().await;
        let Some(doc) = guard
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)))
        else {
            return Ok(None);
        };
        let before = doc.clone();
        doc.extend(data);
        let out = match return_document {
            ReturnDocument::Before => before,
            ReturnDocument::After => doc.clone(),
        };
        Ok(Some(Value::Object(out)))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, StoreError> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(DeleteResult::default());
        };
        let before = docs.len();
        docs.retain(|d| !has_id(d, id));
        Ok(DeleteResult {
            deleted_count: (before - docs.len()) as u64,
        })
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let guard = self.collections.read().await;
        let n = guard
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count())
            .unwrap_or(0);
        Ok(n as u64)
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>, StoreError> {
        let guard = self.collections.read().await;
        let Some(docs) = guard.get(collection) else {
            return Ok(Vec::new());
        };
        let limit = query.limit.map(|n| n as usize).unwrap_or(usize::MAX);
        docs.iter()
            .filter(|d| query.filter.matches(d))
            .skip(query.skip as usize)
            .take(limit)
            .map(|d| query.projection.apply(d.clone()).map(Value::Object))
            .collect()
    }
}
