//! Declarative route: method + path template bound to a handler and its input validation.

use crate::error::AppError;
use crate::response::RouteResponse;
use crate::validation::InputValidation;
use axum::http::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Inputs a handler sees once validation has passed (query defaults already filled in).
#[derive(Clone, Debug, Default)]
pub struct RouteRequest {
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub payload: Option<Map<String, Value>>,
}

impl RouteRequest {
    pub fn param(&self, key: &str) -> Result<String, AppError> {
        self.params
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::BadRequest(format!("missing path parameter {}", key)))
    }
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<RouteResponse, AppError>> + Send>>;
pub type Handler = Arc<dyn Fn(RouteRequest) -> HandlerFuture + Send + Sync>;

#[derive(Clone)]
pub struct RouteDescriptor {
    /// Template such as `/widget/{id}`.
    pub path: String,
    pub method: Method,
    pub handler: Handler,
    pub validation: InputValidation,
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl RouteDescriptor {
    /// Validate the request, then run the handler. Invalid input never reaches the handler.
    pub async fn call(&self, mut req: RouteRequest) -> Result<RouteResponse, AppError> {
        self.validation.validate(&mut req)?;
        (self.handler)(req).await
    }
}
