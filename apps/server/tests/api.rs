use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use repairquote_server::{api::app_router, build_state, config::Config};

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp
            .path()
            .join("repair_system.db")
            .to_string_lossy()
            .to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed_school(app: &Router) -> (i64, i64) {
    let (status, school) =
        send_json(app, Method::POST, "/api/schools", Some(json!({"name": "North"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let school_id = school["id"].as_i64().unwrap();

    let (status, item) = send_json(
        app,
        Method::POST,
        "/api/items",
        Some(json!({"school_id": school_id, "name": "Faucet", "price": 10.0, "unit": "piece"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (school_id, item["id"].as_i64().unwrap())
}

fn submission(school_id: i64, item_id: i64) -> Value {
    json!({
        "school_id": school_id,
        "repair_person": "Li",
        "repair_location": "Lab 3",
        "repair_time": "2024-05-01T10:30",
        "total_price": 20.0,
        "items": [
            {"item_id": item_id, "name": "Faucet", "price": 10.0, "unit": "piece", "quantity": 2, "subtotal": 20.0}
        ]
    })
}

#[tokio::test]
async fn school_creation_adds_fallback_line() {
    let (app, _tmp) = build_test_router().await;
    let (school_id, _) = seed_school(&app).await;

    let (status, items) =
        send_json(&app, Method::GET, &format!("/api/schools/{school_id}/items"), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Other", "Faucet"]);

    let (status, _) = send_json(&app, Method::GET, "/api/schools/999/items", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn price_estimate_skips_unknown_lines() {
    let (app, _tmp) = build_test_router().await;
    let (school_id, item_id) = seed_school(&app).await;

    let (status, estimate) = send_json(
        &app,
        Method::POST,
        "/api/calculate_price",
        Some(json!({"items": [
            {"school_id": school_id, "item_id": item_id, "quantity": 3},
            {"school_id": school_id, "item_id": 999999, "quantity": 5}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(estimate["total_price"].as_f64().unwrap(), 30.0);

    let (status, _) =
        send_json(&app, Method::POST, "/api/calculate_price", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quotation_lifecycle() {
    let (app, _tmp) = build_test_router().await;
    let (school_id, item_id) = seed_school(&app).await;

    let (status, created) = send_json(
        &app,
        Method::POST,
        "/api/quotations",
        Some(submission(school_id, item_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    let number = created["quotation_number"].as_str().unwrap().to_string();
    assert!(number.starts_with('Q'));
    assert_eq!(number.len(), 18);
    assert_eq!(created["school_name"], "North");
    assert_eq!(created["items"].as_array().unwrap().len(), 1);

    let (status, listed) = send_json(
        &app,
        Method::GET,
        &format!("/api/quotations?school_id={school_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, bytes) =
        send(&app, Method::GET, &format!("/api/quotations/{id}/export"), None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("Quotation No.,School,Repair Person"));
    assert!(csv.contains(&number));

    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/quotations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send_json(&app, Method::DELETE, &format!("/api/quotations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = send(&app, Method::GET, "/api/quotations/export", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_submissions_are_rejected() {
    let (app, _tmp) = build_test_router().await;
    let (school_id, item_id) = seed_school(&app).await;

    let mut missing_items = submission(school_id, item_id);
    missing_items["items"] = json!([]);
    let (status, _) =
        send_json(&app, Method::POST, "/api/quotations", Some(missing_items)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_time = submission(school_id, item_id);
    bad_time["repair_time"] = json!("yesterday");
    let (status, _) = send_json(&app, Method::POST, "/api/quotations", Some(bad_time)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/quotations",
        Some(submission(4242, item_id)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        send_json(&app, Method::GET, "/api/quotations?start=not-a-date", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = send_json(&app, Method::GET, "/api/quotations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn loosely_typed_fields_get_field_level_errors() {
    let (app, _tmp) = build_test_router().await;
    let (school_id, item_id) = seed_school(&app).await;

    let mut body = submission(school_id, item_id);
    body["repair_person"] = json!(7);
    body["items"]
        .as_array_mut()
        .unwrap()
        .push(json!("not a line"));
    let (status, error) = send_json(&app, Method::POST, "/api/quotations", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("Line items[1] is incomplete"));

    let mut body = submission(school_id, item_id);
    body["repair_person"] = json!(7);
    let (status, created) = send_json(&app, Method::POST, "/api/quotations", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["repair_person"], "7");
}
