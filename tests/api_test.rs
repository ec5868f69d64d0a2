//! HTTP routes and websocket frame handling, exercised without a socket.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use riskboard::config::Config;
use riskboard::services::DashboardEngine;
use riskboard::{api, websocket, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn state() -> AppState {
    let config = Arc::new(Config::from_lookup(|_| None));
    let engine = DashboardEngine::start(config.dashboard(), Some(3));
    AppState::new(config, engine)
}

fn app(state: &AppState) -> Router {
    api::router().with_state(state.clone())
}

async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// =========================================================================
// Read routes
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_health() {
    let state = state();
    let (status, body) = call(app(&state), Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_health_reports_stopped_engine() {
    let state = state();
    state.engine.shutdown().await;
    let (status, body) = call(app(&state), Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "stopped");
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_snapshot() {
    let state = state();
    let (status, body) = call(app(&state), Method::GET, "/api/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["risk"]["unrealizedPnL"], json!(1250.0));
    assert_eq!(data["risk"]["var1min"], json!(-875.0));
    assert_eq!(data["risk"]["var5min"], json!(-2150.0));
    assert_eq!(data["risk"]["cvar"], json!(-3200.0));
    assert_eq!(data["riskLevel"], "LOW");
    assert_eq!(data["config"]["refreshRateMs"], 2000);
    assert_eq!(data["prices"].as_array().map(Vec::len), Some(4));
    assert_eq!(data["connected"], false);

    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_section_routes() {
    let state = state();

    let (_, prices) = call(app(&state), Method::GET, "/api/dashboard/prices", None).await;
    assert_eq!(prices["data"][0]["symbol"], "BTCUSDT");
    assert!(prices["data"][0]["change24h"].is_number());

    let (_, positions) = call(app(&state), Method::GET, "/api/dashboard/positions", None).await;
    assert_eq!(positions["data"]["positions"].as_array().map(Vec::len), Some(3));
    assert_eq!(positions["data"]["account"]["availableMargin"], json!(18750.0));

    let (_, risk) = call(app(&state), Method::GET, "/api/dashboard/risk", None).await;
    assert_eq!(risk["data"]["level"], "LOW");
    assert_eq!(risk["data"]["liquidationRisk"], false);

    let (_, alerts) = call(app(&state), Method::GET, "/api/dashboard/alerts", None).await;
    assert_eq!(alerts["data"], json!([]));

    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_details_routes() {
    let state = state();

    let (status, body) = call(app(&state), Method::GET, "/api/details/risk", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "risk");

    let (status, body) = call(app(&state), Method::GET, "/api/details/weather", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("weather"));

    state.engine.shutdown().await;
}

// =========================================================================
// Write routes
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_put_config_sanitises() {
    let state = state();
    let (status, body) = call(
        app(&state),
        Method::PUT,
        "/api/config",
        Some(json!({ "accountBalance": "abc", "refreshRateMs": 4000 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["config"]["accountBalance"], json!(0.0));
    assert_eq!(body["data"]["config"]["refreshRateMs"], 5000);
    assert_eq!(body["data"]["availableSymbols"].as_array().map(Vec::len), Some(10));

    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_put_config_balance_reanchors() {
    let state = state();
    call(
        app(&state),
        Method::PUT,
        "/api/config",
        Some(json!({ "accountBalance": 50000 })),
    )
    .await;

    let (_, risk) = call(app(&state), Method::GET, "/api/dashboard/risk", None).await;
    assert_eq!(risk["data"]["risk"]["unrealizedPnL"], json!(2500.0));
    assert_eq!(risk["data"]["risk"]["cvar"], json!(-6400.0));

    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_toggle_symbol_route() {
    let state = state();

    let (_, body) = call(
        app(&state),
        Method::POST,
        "/api/config/symbols/BNBUSDT",
        Some(json!({ "checked": true })),
    )
    .await;
    assert_eq!(body["data"]["changed"], false);
    assert_eq!(body["data"]["config"]["selectedSymbols"].as_array().map(Vec::len), Some(4));

    let (_, body) = call(
        app(&state),
        Method::POST,
        "/api/config/symbols/SOLUSDT",
        Some(json!({ "checked": false })),
    )
    .await;
    assert_eq!(body["data"]["changed"], true);
    assert_eq!(
        body["data"]["config"]["selectedSymbols"],
        json!(["BTCUSDT", "ETHUSDT", "ADAUSDT"])
    );

    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_missing_alert() {
    let state = state();
    let (status, body) = call(app(&state), Method::DELETE, "/api/alerts/nope", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], false);
    state.engine.shutdown().await;
}

// =========================================================================
// WebSocket frames
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_ws_request_details() {
    let state = state();
    let reply = websocket::dispatch(&state, r#"{"type":"request_details","kind":"market"}"#).await;
    let value = serde_json::to_value(reply.unwrap()).unwrap();
    assert_eq!(value["type"], "details");
    assert_eq!(value["data"]["kind"], "market");
    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_ws_set_config_flattened() {
    let state = state();
    let reply = websocket::dispatch(
        &state,
        r#"{"type":"set_config","accountBalance":10000,"selectedSymbols":["ethusdt"]}"#,
    )
    .await;
    assert!(reply.is_none());

    let config = state.engine.config();
    assert_eq!(config.account_balance, 10_000.0);
    assert_eq!(config.selected_symbols, vec!["ETHUSDT"]);
    state.engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_ws_bad_frames() {
    let state = state();

    let reply = websocket::dispatch(&state, "not json").await.unwrap();
    let value = serde_json::to_value(reply).unwrap();
    assert_eq!(value["type"], "error");

    let reply = websocket::dispatch(&state, r#"{"type":"dismiss_alert","id":"x"}"#)
        .await
        .unwrap();
    let value = serde_json::to_value(reply).unwrap();
    assert_eq!(value["type"], "alert_dismissed");
    assert_eq!(value["removed"], false);

    let reply = websocket::dispatch(&state, r#"{"type":"toggle_symbol","symbol":"BNBUSDT","checked":true}"#)
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(reply).unwrap()["type"], "error");

    state.engine.shutdown().await;
}

#[test]
fn test_ws_dispatch_outside_async_context() {
    tokio_test::block_on(async {
        let state = state();
        let reply = websocket::dispatch(&state, r#"{"type":"request_details","kind":"risk"}"#).await;
        assert!(reply.is_some());
        state.engine.shutdown().await;
    });
}
