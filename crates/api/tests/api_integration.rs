//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = api::create_default_state();
    api::create_app(state, get_metrics_handle())
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn create_session(app: &axum::Router) -> String {
    let (status, json) = send(app, "POST", "/checkout", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["session_id"].as_str().unwrap().to_string()
}

fn full_address() -> serde_json::Value {
    serde_json::json!({
        "full_name": "Asha Verma",
        "phone": "+91 7827092040",
        "address": "14 Knowledge Park III",
        "city": "Greater Noida"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_list_packages() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/packages", None).await;
    assert_eq!(status, StatusCode::OK);

    let packages = json.as_array().unwrap();
    assert_eq!(packages.len(), 2);

    let home = packages.iter().find(|p| p["id"] == "home").unwrap();
    assert_eq!(home["base_price_paise"], 10_000);
    assert_eq!(home["additional_unit_price_paise"], 2_000);

    let industry = packages.iter().find(|p| p["id"] == "industry").unwrap();
    assert_eq!(industry["base_price_paise"], 20_000);
    assert!(industry["additional_unit_price_paise"].is_null());
}

#[tokio::test]
async fn test_create_session_starts_selecting() {
    let app = setup();

    let (status, json) = send(&app, "POST", "/checkout", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["state"], "SelectingPackage");
    assert!(json["selected_package_id"].is_null());
    assert_eq!(json["additional_units"], 0);
    assert_eq!(json["total_paise"], 0);
}

#[tokio::test]
async fn test_home_package_with_three_appliances() {
    let app = setup();
    let id = create_session(&app).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "home"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "EnteringAddress");
    assert_eq!(json["total_paise"], 10_000);

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{id}/units"),
        Some(serde_json::json!({"delta": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["additional_units"], 3);
    assert_eq!(json["total_paise"], 16_000);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/checkout/{id}/address"),
        Some(full_address()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, receipt) = send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["package_title"], "Home Package");
    assert_eq!(receipt["total_cost"], 16_000);
    assert_eq!(receipt["additional"]["count"], 3);
    assert_eq!(receipt["additional"]["cost"], 6_000);
    assert_eq!(receipt["customer_name"], "Asha Verma");
    assert!(receipt["order_id"].as_str().unwrap().starts_with("NG-"));
}

#[tokio::test]
async fn test_industry_package_is_flat_rate() {
    let app = setup();
    let id = create_session(&app).await;

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "industry"})),
    )
    .await;

    // Appliance counts are not available on the flat-rate package.
    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{id}/units"),
        Some(serde_json::json!({"delta": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("industry"));

    send(
        &app,
        "PUT",
        &format!("/checkout/{id}/address"),
        Some(full_address()),
    )
    .await;

    let (status, receipt) = send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["total_cost"], 20_000);
    assert!(receipt["additional"].is_null());
}

#[tokio::test]
async fn test_submit_with_missing_phone_rejected() {
    let app = setup();
    let id = create_session(&app).await;

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "home"})),
    )
    .await;

    let mut address = full_address();
    address["phone"] = serde_json::json!("   ");
    send(&app, "PUT", &format!("/checkout/{id}/address"), Some(address)).await;

    let (status, json) = send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("phone"));

    // The session stays on the address step with no order placed.
    let (_, session) = send(&app, "GET", &format!("/checkout/{id}"), None).await;
    assert_eq!(session["state"], "EnteringAddress");

    let (status, _) = send(&app, "GET", &format!("/checkout/{id}/receipt"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_double_submit_conflicts() {
    let app = setup();
    let id = create_session(&app).await;

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "home"})),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/checkout/{id}/address"),
        Some(full_address()),
    )
    .await;

    let (status, _) = send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("Submitted"));
}

#[tokio::test]
async fn test_back_keeps_configuration_but_drops_address() {
    let app = setup();
    let id = create_session(&app).await;

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "home"})),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/checkout/{id}/units"),
        Some(serde_json::json!({"delta": 2})),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/checkout/{id}/address"),
        Some(full_address()),
    )
    .await;

    let (status, json) = send(&app, "POST", &format!("/checkout/{id}/back"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "SelectingPackage");
    assert_eq!(json["selected_package_id"], "home");
    assert_eq!(json["additional_units"], 2);
    assert_eq!(json["total_paise"], 14_000);
}

#[tokio::test]
async fn test_reset_then_fresh_order() {
    let app = setup();
    let id = create_session(&app).await;

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "home"})),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/checkout/{id}/units"),
        Some(serde_json::json!({"delta": 3})),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/checkout/{id}/address"),
        Some(full_address()),
    )
    .await;
    let (_, first_receipt) = send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;

    let (status, json) = send(&app, "POST", &format!("/checkout/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "SelectingPackage");
    assert!(json["selected_package_id"].is_null());
    assert_eq!(json["additional_units"], 0);
    assert_eq!(json["total_paise"], 0);

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "industry"})),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/checkout/{id}/address"),
        Some(full_address()),
    )
    .await;
    let (status, second_receipt) =
        send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second_receipt["total_cost"], 20_000);
    assert_ne!(second_receipt["order_id"], first_receipt["order_id"]);
}

#[tokio::test]
async fn test_reset_before_submission_conflicts() {
    let app = setup();
    let id = create_session(&app).await;

    let (status, _) = send(&app, "POST", &format!("/checkout/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_receipt_readable_after_submission() {
    let app = setup();
    let id = create_session(&app).await;

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "home"})),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/checkout/{id}/address"),
        Some(full_address()),
    )
    .await;
    let (_, submitted) = send(&app, "POST", &format!("/checkout/{id}/submit"), None).await;

    let (status, receipt) = send(&app, "GET", &format!("/checkout/{id}/receipt"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["order_id"], submitted["order_id"]);
    assert_eq!(receipt["total_cost"], 10_000);
    assert_eq!(receipt["customer_city"], "Greater Noida");
}

#[tokio::test]
async fn test_unknown_session_returns_404() {
    let app = setup();

    let uri = format!("/checkout/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_session_id_returns_400() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/checkout/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("session id"));
}

#[tokio::test]
async fn test_unknown_package_returns_400() {
    let app = setup();
    let id = create_session(&app).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "enterprise"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("enterprise"));

    let (_, session) = send(&app, "GET", &format!("/checkout/{id}"), None).await;
    assert_eq!(session["state"], "SelectingPackage");
}

#[tokio::test]
async fn test_select_package_while_entering_address_conflicts() {
    let app = setup();
    let id = create_session(&app).await;

    send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "home"})),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/checkout/{id}/package"),
        Some(serde_json::json!({"package_id": "industry"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
