use crate::error::{AppError, Result};
use crate::types::{
    AccountSummary, Alert, DashboardSnapshot, DetailKind, DetailReport, Position, PriceRecord,
    RiskLevel, RiskSnapshot,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub positions: Vec<Position>,
    pub account: AccountSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    pub risk: RiskSnapshot,
    pub level: RiskLevel,
    pub liquidation_risk: bool,
}

#[derive(Debug, Serialize)]
pub struct DismissResponse {
    pub id: String,
    pub removed: bool,
}

/// GET /api/dashboard
async fn get_dashboard(State(state): State<AppState>) -> Json<ApiResponse<DashboardSnapshot>> {
    Json(ApiResponse {
        data: state.engine.snapshot(),
    })
}

/// GET /api/dashboard/prices
async fn get_prices(State(state): State<AppState>) -> Json<ApiResponse<Vec<PriceRecord>>> {
    Json(ApiResponse {
        data: state.engine.snapshot().prices,
    })
}

/// GET /api/dashboard/positions
async fn get_positions(State(state): State<AppState>) -> Json<ApiResponse<PositionsResponse>> {
    let snapshot = state.engine.snapshot();
    Json(ApiResponse {
        data: PositionsResponse {
            positions: snapshot.positions,
            account: snapshot.account,
        },
    })
}

/// GET /api/dashboard/risk
async fn get_risk(State(state): State<AppState>) -> Json<ApiResponse<RiskResponse>> {
    let risk = state.engine.snapshot().risk;
    Json(ApiResponse {
        data: RiskResponse {
            risk,
            level: risk.level(),
            liquidation_risk: risk.liquidation_risk(),
        },
    })
}

/// GET /api/dashboard/alerts
async fn get_alerts(State(state): State<AppState>) -> Json<ApiResponse<Vec<Alert>>> {
    Json(ApiResponse {
        data: state.engine.snapshot().alerts,
    })
}

/// DELETE /api/alerts/:id
async fn dismiss_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<DismissResponse>> {
    let removed = state.engine.dismiss_alert(&id);
    debug!("Dismiss alert {} via API: removed={}", id, removed);
    Json(ApiResponse {
        data: DismissResponse { id, removed },
    })
}

/// GET /api/details/:kind
async fn get_details(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<DetailReport>>> {
    let kind = DetailKind::from_str(&kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown detail kind: {}", kind)))?;
    Ok(Json(ApiResponse {
        data: state.engine.request_details(kind),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/prices", get(get_prices))
        .route("/api/dashboard/positions", get(get_positions))
        .route("/api/dashboard/risk", get(get_risk))
        .route("/api/dashboard/alerts", get(get_alerts))
        .route("/api/alerts/:id", delete(dismiss_alert))
        .route("/api/details/:kind", get(get_details))
}
