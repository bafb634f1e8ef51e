// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, get_kpis, get_view, health_check, list_views};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/views", get(list_views))
        .route("/views/:view", get(get_view))
        .route("/kpis", get(get_kpis))
        .route("/dashboard", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
