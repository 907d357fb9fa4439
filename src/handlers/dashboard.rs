// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{config::AppState, models::dashboard::DashboardSummary};

// GET /dashboard_summary e GET /invoice_summary
#[utoipa::path(
    get,
    path = "/dashboard_summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais de clientes, faturas, pago e em aberto", body = DashboardSummary)
    )
)]
pub async fn get_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    let summary = app_state.dashboard_service.get_summary().await;
    (StatusCode::OK, Json(summary))
}
