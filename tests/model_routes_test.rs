use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

mod common;
use common::{send, setup_app, setup_app_with, FailingStore};

async fn create(app: &axum::Router, body: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/v1/widget", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

fn id_of(record: &Value) -> String {
    record["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_assigns_id() {
    let app = setup_app();
    let record = create(&app, json!({ "title": "Lamp", "price": 12.5 })).await;
    assert_eq!(record["title"], "Lamp");
    assert_eq!(record["price"], 12.5);
    assert_eq!(id_of(&record).len(), 36);
}

#[tokio::test]
async fn test_create_rejects_invalid_payload() {
    let app = setup_app();

    let (status, body) = send(&app, "POST", "/api/v1/widget", Some(json!({ "price": 3 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _) = send(&app, "POST", "/api/v1/widget", Some(json!({ "title": "Lamp", "size": 3 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "POST", "/api/v1/widget", Some(json!({ "title": "Lamp", "color": "pink" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, "POST", "/api/v1/widget", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "POST", "/api/v1/widget", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_get_by_id_with_projection() {
    let app = setup_app();
    let record = create(&app, json!({ "title": "Lamp", "price": 12, "color": "red" })).await;
    let id = id_of(&record);

    let (status, body) = send(&app, "GET", &format!("/api/v1/widget/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], record);

    let (status, body) = send(&app, "GET", &format!("/api/v1/widget/{}?fields=title,nope", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": id, "title": "Lamp" }));
}

#[tokio::test]
async fn test_get_rejects_bad_id_and_fields() {
    let app = setup_app();

    let (status, body) = send(&app, "GET", "/api/v1/widget/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let record = create(&app, json!({ "title": "Lamp" })).await;
    let (status, _) = send(&app, "GET", &format!("/api/v1/widget/{}?fields=ti%20tle", id_of(&record)), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_missing_record_is_not_found() {
    let app = setup_app();
    let (status, body) = send(&app, "GET", "/api/v1/widget/00000000-0000-0000-0000-000000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_update_returns_updated_record() {
    let app = setup_app();
    let record = create(&app, json!({ "title": "Lamp", "price": 12 })).await;
    let id = id_of(&record);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/widget/{}", id),
        Some(json!({ "title": "Desk lamp", "color": "blue" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": id, "title": "Desk lamp", "price": 12, "color": "blue" }));

    let (status, _) = send(&app, "PUT", &format!("/api/v1/widget/{}", id), Some(json!({ "price": 1 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/widget/00000000-0000-0000-0000-000000000000",
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_reports_count() {
    let app = setup_app();
    let record = create(&app, json!({ "title": "Lamp" })).await;
    let uri = format!("/api/v1/widget/{}", id_of(&record));

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "deleted_count": 1 }));

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "deleted_count": 0 }));

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_count_with_filter() {
    let app = setup_app();
    create(&app, json!({ "title": "Lamp", "color": "red" })).await;
    create(&app, json!({ "title": "Desk", "color": "red" })).await;
    create(&app, json!({ "title": "Chair", "color": "blue" })).await;

    let (status, body) = send(&app, "GET", "/api/v1/widget/count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], 3);

    let (_, body) = send(&app, "GET", "/api/v1/widget/count?color=red", None).await;
    assert_eq!(body["data"], 2);

    // Undeclared keys are ignored.
    let (_, body) = send(&app, "GET", "/api/v1/widget/count?color=blue&size=9", None).await;
    assert_eq!(body["data"], 1);

    let (status, _) = send(&app, "GET", "/api/v1/widget/count?color=pink", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_pagination() {
    let app = setup_app();
    for i in 0..12 {
        create(&app, json!({ "title": format!("w{}", i), "price": i })).await;
    }

    let (status, body) = send(&app, "GET", "/api/v1/widget/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["meta"]["count"], 10);

    let (_, body) = send(&app, "GET", "/api/v1/widget/list?limit=5&offset=10", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["count"], 2);

    // List takes no filters.
    let (_, body) = send(&app, "GET", "/api/v1/widget/list?title=w1&limit=20", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 12);

    let (_, body) = send(&app, "GET", "/api/v1/widget/list?fields=price&limit=1", None).await;
    let first = body["data"][0].as_object().unwrap();
    assert!(first.contains_key("id"));
    assert!(first.contains_key("price"));
    assert!(!first.contains_key("title"));

    for bad in ["limit=0", "limit=1001", "limit=abc", "offset=-1"] {
        let (status, _) = send(&app, "GET", &format!("/api/v1/widget/list?{}", bad), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", bad);
    }
}

#[tokio::test]
async fn test_find_with_filter() {
    let app = setup_app();
    create(&app, json!({ "title": "Lamp", "price": 5, "color": "red" })).await;
    create(&app, json!({ "title": "Desk", "price": 5, "color": "blue" })).await;
    create(&app, json!({ "title": "Chair", "price": 7, "color": "red" })).await;

    let (status, body) = send(&app, "GET", "/api/v1/widget/find?color=red", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 2);

    let (_, body) = send(&app, "GET", "/api/v1/widget/find?color=red&price=5&fields=title", None).await;
    assert_eq!(body["meta"]["count"], 1);
    let only = &body["data"][0];
    assert_eq!(only["title"], "Lamp");
    assert!(only.get("color").is_none());

    let (_, body) = send(&app, "GET", "/api/v1/widget/find?color=red&limit=1&offset=1", None).await;
    assert_eq!(body["meta"]["count"], 1);

    let (_, body) = send(&app, "GET", "/api/v1/widget/find?title=Nothing", None).await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["count"], 0);

    let (status, _) = send(&app, "GET", "/api/v1/widget/find?price=cheap", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = setup_app_with(Arc::new(FailingStore));
    let id = "00000000-0000-0000-0000-000000000000";

    let calls = [
        ("POST", "/api/v1/widget".to_string(), Some(json!({ "title": "Lamp" }))),
        ("GET", format!("/api/v1/widget/{}", id), None),
        ("PUT", format!("/api/v1/widget/{}", id), Some(json!({ "title": "Lamp" }))),
        ("DELETE", format!("/api/v1/widget/{}", id), None),
        ("GET", "/api/v1/widget/count".to_string(), None),
        ("GET", "/api/v1/widget/list".to_string(), None),
        ("GET", "/api/v1/widget/find".to_string(), None),
    ];
    for (method, uri, body) in calls {
        let (status, body) = send(&app, method, &uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
        assert_eq!(body["error"]["code"], "store_error");
    }
}

#[tokio::test]
async fn test_validation_runs_before_store() {
    // Invalid input must be rejected without touching the failing store.
    let app = setup_app_with(Arc::new(FailingStore));
    let (status, _) = send(&app, "GET", "/api/v1/widget/nope", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, "GET", "/api/v1/widget/list?limit=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
