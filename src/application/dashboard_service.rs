// Dashboard service - Use case for building the page payload
use crate::application::kpi_service::KpiService;
use crate::application::view_service::ViewService;
use crate::domain::chart::RenderedView;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::Result;
use crate::domain::view::View;
use crate::infrastructure::chart_mapper::render;

#[derive(Clone)]
pub struct DashboardService {
    title: String,
    kpi_service: KpiService,
    view_service: ViewService,
}

impl DashboardService {
    pub fn new(title: String, kpi_service: KpiService, view_service: ViewService) -> Self {
        Self {
            title,
            kpi_service,
            view_service,
        }
    }

    /// KPI tiles plus the selected view; no selection means the first view
    pub async fn get_dashboard(&self, view_name: Option<&str>) -> Result<Dashboard> {
        let view_name = view_name.unwrap_or_else(|| View::ALL[0].name());

        // Resolve before touching the datastore so a bad name costs no queries
        let selected = View::resolve(view_name)?;

        let kpis = self.kpi_service.summarize().await?;
        let view = self.render_view(selected.name()).await?;

        Ok(Dashboard::new(
            self.title.clone(),
            selected.spec().slug.to_string(),
            kpis.tiles(),
            view,
        ))
    }

    pub async fn render_view(&self, view_name: &str) -> Result<RenderedView> {
        let (spec, table) = self.view_service.table(view_name).await?;
        if table.is_empty() {
            tracing::debug!("View '{}' has no rows to render", spec.name);
        } else {
            tracing::debug!("Rendering '{}' with {} rows", spec.name, table.len());
        }
        render(table, spec.key_label, spec.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DashboardError;
    use crate::domain::trip::TripRecord;
    use crate::infrastructure::memory_repository::MemoryRepository;
    use std::sync::Arc;

    fn service(trips: Vec<TripRecord>) -> DashboardService {
        let repo = Arc::new(MemoryRepository::new(trips));
        DashboardService::new(
            "Taxi".to_string(),
            KpiService::new(repo.clone()),
            ViewService::new(repo),
        )
    }

    fn trips() -> Vec<TripRecord> {
        (1..=4)
            .map(|p| TripRecord {
                passenger_count: Some(p as f64),
                trip_distance: Some(p as f64 * 1.5),
                payment_type: Some(p % 2 + 1),
                total_amount: Some(10.0 * p as f64),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_dashboard_defaults_to_first_view() {
        let dashboard = service(trips()).get_dashboard(None).await.unwrap();

        assert_eq!(dashboard.selected, "peak-pickup-hours");
        assert_eq!(dashboard.tiles.len(), 3);
        assert_eq!(dashboard.tiles[0].display, "4");
        assert_eq!(dashboard.view.title, "Trips by Hour of Day");
    }

    #[tokio::test]
    async fn test_dashboard_with_selected_view() {
        let dashboard = service(trips())
            .get_dashboard(Some("trips-by-passengers"))
            .await
            .unwrap();

        assert_eq!(dashboard.view.chart.label_column, "Passengers");
        assert_eq!(dashboard.view.chart.categories, vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_dashboard_unknown_view() {
        let err = service(trips()).get_dashboard(Some("nope")).await.unwrap_err();
        assert!(matches!(err, DashboardError::UnknownView(_)));
    }

    #[tokio::test]
    async fn test_dashboard_on_empty_collection() {
        let err = service(Vec::new()).get_dashboard(None).await.unwrap_err();
        assert!(matches!(err, DashboardError::EmptyResult { .. }));
    }
}
