//! Mount route descriptors on an axum router.

use crate::config::ModelDescriptor;
use crate::error::AppError;
use crate::routes::{build_routes, RouteDescriptor, RouteRequest};
use crate::store::DocumentStore;
use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::Method,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// `/widget/{id}` -> `/widget/:id`
fn axum_path(template: &str) -> String {
    template.replace("{id}", ":id")
}

fn method_filter(method: &Method) -> Option<MethodFilter> {
    match *method {
        Method::GET => Some(MethodFilter::GET),
        Method::POST => Some(MethodFilter::POST),
        Method::PUT => Some(MethodFilter::PUT),
        Method::DELETE => Some(MethodFilter::DELETE),
        _ => None,
    }
}

fn parse_payload(body: &[u8]) -> Result<Option<Map<String, Value>>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(m)) => Ok(Some(m)),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(e) => Err(AppError::BadRequest(format!("invalid JSON body: {}", e))),
    }
}

async fn dispatch(
    route: &RouteDescriptor,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    body: Bytes,
) -> Response {
    let payload = match parse_payload(&body) {
        Ok(p) => p,
        Err(e) => return e.into_response(),
    };
    let req = RouteRequest {
        params,
        query,
        payload,
    };
    match route.call(req).await {
        Ok(res) => res.into_response(),
        Err(e) => e.into_response(),
    }
}

/// One axum route per distinct path; methods sharing a path are combined.
pub fn mount(routes: Vec<RouteDescriptor>) -> Router {
    let mut by_path: BTreeMap<String, MethodRouter> = BTreeMap::new();
    for route in routes {
        let Some(filter) = method_filter(&route.method) else {
            tracing::warn!(method = %route.method, path = %route.path, "unsupported method, route skipped");
            continue;
        };
        tracing::debug!(method = %route.method, path = %route.path, "mounting route");
        let path = axum_path(&route.path);
        let route = Arc::new(route);
        let handler = move |params: Option<Path<HashMap<String, String>>>,
                            Query(query): Query<HashMap<String, String>>,
                            body: Bytes| {
            let route = Arc::clone(&route);
            async move {
                let params = params.map(|Path(p)| p).unwrap_or_default();
                dispatch(&route, params, query, body).await
            }
        };
        let methods = by_path.remove(&path).unwrap_or_else(MethodRouter::new);
        by_path.insert(path, methods.on(filter, handler));
    }
    by_path
        .into_iter()
        .fold(Router::new(), |router, (path, methods)| router.route(&path, methods))
}

/// Build and mount the routes of every model against one store.
pub fn model_routes(models: &[ModelDescriptor], store: Arc<dyn DocumentStore>) -> Router {
    let routes = models
        .iter()
        .flat_map(|m| build_routes(m, Arc::clone(&store)))
        .collect();
    mount(routes)
}
