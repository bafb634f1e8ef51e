// HTTP request handlers
use crate::domain::kpi::{KpiSummary, TileData};
use crate::domain::view::ViewEntry;
use crate::infrastructure::http_response::{accepts_brotli, error_response, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub view: Option<String>,
}

#[derive(Serialize)]
struct KpiPayload {
    summary: KpiSummary,
    tiles: Vec<TileData>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Views for the selection control
pub async fn list_views(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let views: Vec<ViewEntry> = state
        .view_service
        .list_views()
        .into_iter()
        .map(ViewEntry::from)
        .collect();

    respond(&views, &headers).await
}

pub async fn get_kpis(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.kpi_service.summarize().await {
        Ok(summary) => {
            let tiles = summary.tiles();
            respond(&KpiPayload { summary, tiles }, &headers).await
        }
        Err(e) => error_response(e),
    }
}

/// Chart and listing for a single view
pub async fn get_view(
    Path(view): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.dashboard_service.render_view(&view).await {
        Ok(rendered) => respond(&rendered, &headers).await,
        Err(e) => error_response(e),
    }
}

/// Full page payload: KPI tiles plus the selected view
pub async fn get_dashboard(
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state
        .dashboard_service
        .get_dashboard(query.view.as_deref())
        .await
    {
        Ok(dashboard) => respond(&dashboard, &headers).await,
        Err(e) => error_response(e),
    }
}
