//! Document store capability used by the generated routes, plus the bundled backends.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgDocumentStore};

use crate::error::StoreError;
use crate::query::{Filter, Projection};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Key under which stores expose the identifier they assigned.
pub const ID_FIELD: &str = "id";

pub type Document = Map<String, Value>;

/// Which version of a record an update returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReturnDocument {
    Before,
    #[default]
    After,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// A filtered, projected, paginated scan: `FindQuery::new(filter).project(p).limit(n).skip(m)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: Filter,
    pub projection: Projection,
    pub limit: Option<u64>,
    pub skip: u64,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        FindQuery {
            filter,
            ..Default::default()
        }
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }
}

/// Generic collection operations. Records are JSON objects carrying `ID_FIELD`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new record and return it with its assigned identifier.
    async fn insert(&self, collection: &str, data: Document) -> Result<Value, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        projection: &Projection,
    ) -> Result<Option<Value>, StoreError>;

    /// Merge `data` into the record's top-level fields.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        data: Document,
        return_document: ReturnDocument,
    ) -> Result<Option<Value>, StoreError>;

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, StoreError>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Order is the store's natural order and is not guaranteed.
    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>, StoreError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
