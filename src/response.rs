//! Standard response envelope helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Status plus JSON body produced by a route handler.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RouteResponse {
    /// `201 {"data": record}`
    pub fn created(data: Value) -> Self {
        RouteResponse {
            status: StatusCode::CREATED,
            body: json!({ "data": data }),
        }
    }

    /// `200 {"data": value}`
    pub fn ok(data: Value) -> Self {
        RouteResponse {
            status: StatusCode::OK,
            body: json!({ "data": data }),
        }
    }

    /// `200 {"data": [...], "meta": {"count": n}}`
    pub fn many(data: Vec<Value>) -> Self {
        let count = data.len() as u64;
        RouteResponse {
            status: StatusCode::OK,
            body: json!({ "data": data, "meta": { "count": count } }),
        }
    }
}

impl IntoResponse for RouteResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
