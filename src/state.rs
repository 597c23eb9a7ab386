//! Shared state: the store and resolved models for operational routes, and the per-model context handlers run with.

use crate::config::{ModelDescriptor, ResolvedModels};
use crate::error::{AppError, StoreError};
use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub models: Arc<ResolvedModels>,
}

/// One model plus the store its routes call. Read-only once built.
pub struct RouteContext {
    pub model: ModelDescriptor,
    pub store: Arc<dyn DocumentStore>,
}

impl RouteContext {
    pub fn new(model: ModelDescriptor, store: Arc<dyn DocumentStore>) -> Self {
        RouteContext { model, store }
    }

    pub fn collection(&self) -> &str {
        &self.model.name
    }

    /// Log a failed store call and forward it unchanged.
    pub fn store_failure(&self, operation: &'static str) -> impl Fn(StoreError) -> AppError + '_ {
        move |err| {
            tracing::error!(model = %self.model.name, operation, error = %err, "store operation failed");
            AppError::Store(err)
        }
    }
}
