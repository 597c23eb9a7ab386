use axum::body::Body;
use axum::http::{Request, StatusCode};
use docroutes::{common_routes, common_routes_with_ready, AppState, DocumentStore, MemoryStore};
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{models, read_json, FailingStore};

fn state(store: Arc<dyn DocumentStore>) -> AppState {
    AppState {
        store,
        models: Arc::new(models()),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_and_version() {
    let app = common_routes();

    let (status, body) = read_json(app.clone().oneshot(get("/health")).await.unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = read_json(app.oneshot(get("/version")).await.unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "docroutes");
}

#[tokio::test]
async fn test_ready_reports_store_state() {
    let app = common_routes_with_ready(state(Arc::new(MemoryStore::new())));
    let (status, body) = read_json(app.oneshot(get("/ready")).await.unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "ok");
    assert_eq!(body["models"], 1);

    let app = common_routes_with_ready(state(Arc::new(FailingStore)));
    let (status, body) = read_json(app.oneshot(get("/ready")).await.unwrap()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}
