#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use docroutes::query::{Filter, Projection};
use docroutes::store::{DeleteResult, Document, FindQuery, ReturnDocument};
use docroutes::{load_models_from_str, model_routes, resolve, DocumentStore, MemoryStore, ResolvedModels, StoreError};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const MODELS: &str = r#"[
    {
        "name": "widget",
        "fields": ["title", "price", "color"],
        "validation": {
            "title": { "required": true, "type": "string", "max_length": 40 },
            "price": { "type": "number", "minimum": 0 },
            "color": { "allowed": ["red", "green", "blue"] }
        }
    }
]"#;

pub fn models() -> ResolvedModels {
    resolve(&load_models_from_str(MODELS).expect("models parse")).expect("models resolve")
}

pub fn setup_app() -> Router {
    setup_app_with(Arc::new(MemoryStore::new()))
}

pub fn setup_app_with(store: Arc<dyn DocumentStore>) -> Router {
    Router::new().nest("/api/v1", model_routes(&models().models, store))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&v).unwrap())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    read_json(response).await
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Store whose every call fails.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::Backend("store unavailable".into())
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert(&self, _: &str, _: Document) -> Result<Value, StoreError> {
        Err(down())
    }

    async fn find_by_id(&self, _: &str, _: &str, _: &Projection) -> Result<Option<Value>, StoreError> {
        Err(down())
    }

    async fn update_by_id(&self, _: &str, _: &str, _: Document, _: ReturnDocument) -> Result<Option<Value>, StoreError> {
        Err(down())
    }

    async fn delete_by_id(&self, _: &str, _: &str) -> Result<DeleteResult, StoreError> {
        Err(down())
    }

    async fn count(&self, _: &str, _: &Filter) -> Result<u64, StoreError> {
        Err(down())
    }

    async fn find(&self, _: &str, _: &FindQuery) -> Result<Vec<Value>, StoreError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}
