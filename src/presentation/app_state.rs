// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::kpi_service::KpiService;
use crate::application::view_service::ViewService;

#[derive(Clone)]
pub struct AppState {
    pub kpi_service: KpiService,
    pub view_service: ViewService,
    pub dashboard_service: DashboardService,
}
