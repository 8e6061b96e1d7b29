//! Integration tests for the grid simulation API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gridsim::{api, config::Config, state::AppState};

fn test_app() -> Router {
    let cfg = Config::default();
    let state = AppState::new(&cfg);
    api::router(state, &cfg)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_healthz() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_network_reports_counts() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/api/grid/network").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["buses"], 2);
    assert_eq!(body["lines"], 1);
    assert_eq!(body["loads"], 1);
    assert_eq!(body["generators"], 0);
}

#[tokio::test]
async fn test_simulate_before_create_is_an_error_envelope() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/api/grid/simulate").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Network not initialized"));
    assert!(body.get("computation_time_ms").is_none());
}

#[tokio::test]
async fn test_results_before_solve_are_error_envelopes() {
    let app = test_app();
    send(&app, "POST", "/api/grid/network").await;

    let (_, buses) = send(&app, "GET", "/api/grid/results/buses").await;
    assert_eq!(buses["status"], "error");
    assert_eq!(buses["message"], "No simulation results available");
    assert!(buses.get("buses").is_none());

    let (_, lines) = send(&app, "GET", "/api/grid/results/lines").await;
    assert_eq!(lines["status"], "error");
}

#[tokio::test]
async fn test_full_simulation_scenario() {
    let app = test_app();

    let (_, created) = send(&app, "POST", "/api/grid/network").await;
    assert_eq!(created["status"], "success");

    let (_, solved) = send(&app, "POST", "/api/grid/simulate").await;
    assert_eq!(solved["status"], "converged");
    let losses = solved["total_losses_mw"].as_f64().unwrap();
    assert!(losses >= 0.0);
    assert!(solved["computation_time_ms"].as_f64().unwrap() >= 0.0);

    let (_, buses) = send(&app, "GET", "/api/grid/results/buses").await;
    assert_eq!(buses["status"], "success");
    let records = buses["buses"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["bus_id"], 0);
    assert_eq!(records[1]["bus_id"], 1);
    assert_eq!(records[0]["bus_name"], "Bus_1");
    let vm_slack = records[0]["vm_pu"].as_f64().unwrap();
    assert!((vm_slack - 1.0).abs() < 1e-6);

    let (_, lines) = send(&app, "GET", "/api/grid/results/lines").await;
    assert_eq!(lines["status"], "success");
    let records = lines["lines"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["line_name"], "Line_1-2");
    assert_eq!(records[0]["from_bus"], 0);
    assert_eq!(records[0]["to_bus"], 1);

    let (_, summary) = send(&app, "GET", "/api/grid/summary").await;
    assert_eq!(summary["status"], "success");
    assert_eq!(summary["network"]["external_grids"], 1);
    assert_eq!(
        summary["simulation"]["total_losses_mw"].as_f64().unwrap(),
        losses
    );
}

#[tokio::test]
async fn test_recreating_network_keeps_counts_and_drops_results() {
    let app = test_app();

    send(&app, "POST", "/api/grid/network").await;
    send(&app, "POST", "/api/grid/simulate").await;

    let (_, recreated) = send(&app, "POST", "/api/grid/network").await;
    assert_eq!(recreated["status"], "success");
    assert_eq!(recreated["buses"], 2);

    // Result tables belong to the replaced network and are gone; the last
    // solve summary remains visible in the summary endpoint.
    let (_, buses) = send(&app, "GET", "/api/grid/results/buses").await;
    assert_eq!(buses["status"], "error");

    let (_, summary) = send(&app, "GET", "/api/grid/summary").await;
    assert_eq!(summary["status"], "success");
    assert!(!summary["simulation"].is_null());
}
