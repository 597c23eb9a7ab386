//! Handlers behind the generated model routes. Each makes exactly one store call.

use crate::error::AppError;
use crate::query::{build_filter, build_projection, fields_param, Filter, Pagination};
use crate::response::RouteResponse;
use crate::routes::RouteRequest;
use crate::state::RouteContext;
use crate::store::{FindQuery, ReturnDocument};
use serde_json::json;
use std::sync::Arc;

fn not_found(ctx: &RouteContext, id: &str) -> AppError {
    AppError::NotFound(format!("{} {}", ctx.model.name, id))
}

pub async fn create(ctx: Arc<RouteContext>, req: RouteRequest) -> Result<RouteResponse, AppError> {
    let data = req.payload.unwrap_or_default();
    let record = ctx
        .store
        .insert(ctx.collection(), data)
        .await
        .map_err(ctx.store_failure("create"))?;
    Ok(RouteResponse::created(record))
}

pub async fn read(ctx: Arc<RouteContext>, req: RouteRequest) -> Result<RouteResponse, AppError> {
    let id = req.param("id")?;
    let projection = build_projection(&ctx.model.fields, fields_param(&req.query));
    let record = ctx
        .store
        .find_by_id(ctx.collection(), &id, &projection)
        .await
        .map_err(ctx.store_failure("read"))?
        .ok_or_else(|| not_found(&ctx, &id))?;
    Ok(RouteResponse::ok(record))
}

pub async fn update(ctx: Arc<RouteContext>, req: RouteRequest) -> Result<RouteResponse, AppError> {
    let id = req.param("id")?;
    let data = req.payload.unwrap_or_default();
    let record = ctx
        .store
        .update_by_id(ctx.collection(), &id, data, ReturnDocument::After)
        .await
        .map_err(ctx.store_failure("update"))?
        .ok_or_else(|| not_found(&ctx, &id))?;
    Ok(RouteResponse::ok(record))
}

pub async fn delete(ctx: Arc<RouteContext>, req: RouteRequest) -> Result<RouteResponse, AppError> {
    let id = req.param("id")?;
    let result = ctx
        .store
        .delete_by_id(ctx.collection(), &id)
        .await
        .map_err(ctx.store_failure("delete"))?;
    Ok(RouteResponse::ok(json!({ "deleted_count": result.deleted_count })))
}

pub async fn count(ctx: Arc<RouteContext>, req: RouteRequest) -> Result<RouteResponse, AppError> {
    let filter = build_filter(&ctx.model.fields, &req.query);
    let n = ctx
        .store
        .count(ctx.collection(), &filter)
        .await
        .map_err(ctx.store_failure("count"))?;
    Ok(RouteResponse::ok(n.into()))
}

pub async fn list(ctx: Arc<RouteContext>, req: RouteRequest) -> Result<RouteResponse, AppError> {
    scan(&ctx, &req, Filter::default(), "list").await
}

pub async fn find(ctx: Arc<RouteContext>, req: RouteRequest) -> Result<RouteResponse, AppError> {
    let filter = build_filter(&ctx.model.fields, &req.query);
    scan(&ctx, &req, filter, "find").await
}

async fn scan(
    ctx: &RouteContext,
    req: &RouteRequest,
    filter: Filter,
    operation: &'static str,
) -> Result<RouteResponse, AppError> {
    let page = Pagination::from_query(&req.query);
    let query = FindQuery::new(filter)
        .project(build_projection(&ctx.model.fields, fields_param(&req.query)))
        .limit(page.limit)
        .skip(page.offset);
    let records = ctx
        .store
        .find(ctx.collection(), &query)
        .await
        .map_err(ctx.store_failure(operation))?;
    Ok(RouteResponse::many(records))
}
