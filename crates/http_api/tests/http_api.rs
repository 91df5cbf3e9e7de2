use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use app_api::AppContext;
use footprint_app::{AppPaths, AppState, ensure_app_data_dir};

use http_api::{CSRF_HEADER, HttpState};

const TEST_TOKEN: &str = "testtoken";

struct TestApp {
    _temp_dir: tempfile::TempDir,
    router: axum::Router,
}

fn build_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let paths = AppPaths::new(temp_dir.path().to_path_buf());
    ensure_app_data_dir(&paths).expect("ensure app data dir");
    let app_state = AppState::new(paths.db_path, paths.factors_defaults_path);
    app_state.initialize().expect("initialize");

    let context = AppContext {
        app_state,
        app_data_dir: paths.app_data_dir,
        legacy_import: None,
    };
    let state = HttpState::new(context, TEST_TOKEN.to_string());
    let router = http_api::router(state);

    TestApp {
        _temp_dir: temp_dir,
        router,
    }
}

fn api_request(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(CSRF_HEADER, TEST_TOKEN)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(router: &axum::Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.expect("response")
}

async fn json_body(response: Response) -> Value {
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&body).expect("json body")
}

fn activity(name: &str, distance: f64) -> Value {
    json!({
        "name": name,
        "city": "Delhi",
        "distance": distance,
        "transport_mode": "car",
        "prev_usage": 100.0,
        "curr_usage": 50.0,
        "dry_waste": 10.0,
        "wet_waste": 20.0,
    })
}

#[tokio::test]
async fn api_rejects_missing_csrf() {
    let app = build_app();

    let response = send(
        &app.router,
        Request::builder()
            .method("POST")
            .uri("/api/settings_get")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .expect("request"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = json_body(response).await;
    assert_eq!(payload["code"], "csrf_invalid");
}

#[tokio::test]
async fn api_accepts_valid_csrf() {
    let app = build_app();

    let response = send(&app.router, api_request("/api/settings_get", json!({}))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["record_count"], 0);
}

#[tokio::test]
async fn submit_computes_and_appends() {
    let app = build_app();

    let response = send(&app.router, api_request("/api/submit", activity("Asha", 100.0))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = json_body(response).await;
    let breakdown = &payload["breakdown"];
    assert_eq!(breakdown["transport_emission"].as_f64(), Some(21.0));
    assert_eq!(breakdown["electricity_emission"].as_f64(), Some(-25.0));
    assert_eq!(breakdown["waste_emission"].as_f64(), Some(2.0));
    assert_eq!(breakdown["total_emission"].as_f64(), Some(-2.0));

    let response = send(&app.router, api_request("/api/records", json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let records = json_body(response).await;
    assert_eq!(records.as_array().map(Vec::len), Some(1));
    assert_eq!(records[0]["name"], "Asha");
}

#[tokio::test]
async fn submit_missing_field_is_input_missing() {
    let app = build_app();
    let mut body = activity("Asha", 100.0);
    body.as_object_mut().expect("object").remove("city");

    let response = send(&app.router, api_request("/api/submit", body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = json_body(response).await;
    assert_eq!(payload["code"], "input_missing");

    let response = send(&app.router, api_request("/api/records", json!({}))).await;
    let records = json_body(response).await;
    assert_eq!(records.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn leaderboard_ranks_lowest_total_first() {
    let app = build_app();
    for (name, distance) in [("High", 200.0), ("Low", 0.0), ("Mid", 100.0)] {
        let response = send(&app.router, api_request("/api/submit", activity(name, distance))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &app.router,
        api_request("/api/leaderboard", json!({ "limit": 2 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries = json_body(response).await;
    let entries = entries.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["position"], 1);
    assert_eq!(entries[0]["record"]["name"], "Low");
    assert_eq!(entries[1]["record"]["name"], "Mid");
}

#[tokio::test]
async fn empty_ledger_chart_is_empty() {
    let app = build_app();

    let response = send(&app.router, api_request("/api/chart", json!({}))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["by_name"].as_array().map(Vec::len), Some(0));
    assert_eq!(payload["history"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let app = build_app();

    let response = send(&app.router, api_request("/api/nope", json!({}))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = json_body(response).await;
    assert_eq!(payload["code"], "not_found");
}

#[tokio::test]
async fn malformed_field_is_json_invalid_input() {
    let app = build_app();
    let mut body = activity("Asha", 100.0);
    body["distance"] = json!("abc");

    let response = send(&app.router, api_request("/api/submit", body)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = json_body(response).await;
    assert_eq!(payload["code"], "invalid_input");
    assert!(payload["message"].as_str().is_some());
}
