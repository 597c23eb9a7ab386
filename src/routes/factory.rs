//! The seven routes generated for every model.

use crate::config::ModelDescriptor;
use crate::error::AppError;
use crate::handlers;
use crate::query::pagination::{pagination_query, projection_query};
use crate::response::RouteResponse;
use crate::routes::{Handler, HandlerFuture, RouteDescriptor, RouteRequest};
use crate::state::RouteContext;
use crate::store::DocumentStore;
use crate::validation::{InputValidation, ParamsSchema, QuerySchema};
use axum::http::Method;
use std::future::Future;
use std::sync::Arc;

fn bind<F, Fut>(ctx: &Arc<RouteContext>, f: F) -> Handler
where
    F: Fn(Arc<RouteContext>, RouteRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<RouteResponse, AppError>> + Send + 'static,
{
    let ctx = Arc::clone(ctx);
    Arc::new(move |req| -> HandlerFuture { Box::pin(f(Arc::clone(&ctx), req)) })
}

/// Build the routes for `model`, in order: create, read, update, delete, count, list, find.
pub fn build_routes(model: &ModelDescriptor, store: Arc<dyn DocumentStore>) -> Vec<RouteDescriptor> {
    let ctx = Arc::new(RouteContext::new(model.clone(), store));
    let base = model.base_path();
    let item = format!("{}/{{id}}", base);
    let id_params = || {
        Some(ParamsSchema {
            id: model.id_pattern.clone(),
        })
    };
    let payload = || Some(model.payload_schema.clone());

    vec![
        RouteDescriptor {
            path: base.clone(),
            method: Method::POST,
            handler: bind(&ctx, handlers::create),
            validation: InputValidation {
                payload: payload(),
                ..Default::default()
            },
        },
        RouteDescriptor {
            path: item.clone(),
            method: Method::GET,
            handler: bind(&ctx, handlers::read),
            validation: InputValidation {
                params: id_params(),
                query: Some(projection_query()),
                ..Default::default()
            },
        },
        RouteDescriptor {
            path: item.clone(),
            method: Method::PUT,
            handler: bind(&ctx, handlers::update),
            validation: InputValidation {
                params: id_params(),
                payload: payload(),
                ..Default::default()
            },
        },
        RouteDescriptor {
            path: item,
            method: Method::DELETE,
            handler: bind(&ctx, handlers::delete),
            validation: InputValidation {
                params: id_params(),
                ..Default::default()
            },
        },
        RouteDescriptor {
            path: format!("{}/count", base),
            method: Method::GET,
            handler: bind(&ctx, handlers::count),
            validation: InputValidation {
                query: Some(QuerySchema::from_payload(&model.payload_schema)),
                ..Default::default()
            },
        },
        RouteDescriptor {
            path: format!("{}/list", base),
            method: Method::GET,
            handler: bind(&ctx, handlers::list),
            validation: InputValidation {
                query: Some(pagination_query()),
                ..Default::default()
            },
        },
        RouteDescriptor {
            path: format!("{}/find", base),
            method: Method::GET,
            handler: bind(&ctx, handlers::find),
            validation: InputValidation {
                // Pagination keys win over same-named model fields.
                query: Some(QuerySchema::from_payload(&model.payload_schema).merge(pagination_query())),
                ..Default::default()
            },
        },
    ]
}
