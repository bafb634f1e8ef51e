// KPI service - Headline numbers computed once per page load
use crate::application::trip_repository::TripRepository;
use crate::domain::error::{DashboardError, Result};
use crate::domain::kpi::KpiSummary;
use crate::domain::pipeline::PipelineSpec;
use crate::domain::trip::TripField;
use std::sync::Arc;

const AVG_FARE: PipelineSpec = PipelineSpec::overall_average(TripField::TotalAmount, "avg_fare");
const AVG_DISTANCE: PipelineSpec = PipelineSpec::overall_average(TripField::TripDistance, "avg_distance");

#[derive(Clone)]
pub struct KpiService {
    repository: Arc<dyn TripRepository>,
}

impl KpiService {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    pub async fn summarize(&self) -> Result<KpiSummary> {
        let total_trips = self.repository.estimated_trip_count().await?;
        let avg_fare = self.overall_average(&AVG_FARE).await?;
        let avg_distance = self.overall_average(&AVG_DISTANCE).await?;

        tracing::debug!(
            "KPIs: {} trips, avg fare {:.2}, avg distance {:.2}",
            total_trips,
            avg_fare,
            avg_distance
        );

        Ok(KpiSummary::new(total_trips, avg_fare, avg_distance))
    }

    async fn overall_average(&self, pipeline: &PipelineSpec) -> Result<f64> {
        let records = self.repository.aggregate(pipeline).await?;

        // An empty collection produces no group at all; a null average means
        // every document lacked the field.
        records
            .first()
            .and_then(|r| r.metric(pipeline.metric))
            .and_then(|v| v.as_f64())
            .ok_or(DashboardError::EmptyResult {
                metric: pipeline.metric,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::TripRecord;
    use crate::infrastructure::memory_repository::MemoryRepository;

    fn trip(distance: f64, fare: f64) -> TripRecord {
        TripRecord {
            trip_distance: Some(distance),
            total_amount: Some(fare),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summarize() {
        let repo = MemoryRepository::new(vec![trip(1.0, 10.0), trip(3.0, 20.0), trip(5.0, 36.0)]);
        let service = KpiService::new(Arc::new(repo));

        let summary = service.summarize().await.unwrap();
        assert_eq!(summary.total_trips, 3);
        assert_eq!(summary.avg_fare, 22.0);
        assert_eq!(summary.avg_distance, 3.0);
    }

    #[tokio::test]
    async fn test_empty_collection_is_an_error() {
        let service = KpiService::new(Arc::new(MemoryRepository::new(Vec::new())));

        let err = service.summarize().await.unwrap_err();
        assert!(matches!(err, DashboardError::EmptyResult { metric: "avg_fare" }));
    }

    #[tokio::test]
    async fn test_missing_field_everywhere_is_an_error() {
        let trips = vec![TripRecord {
            trip_distance: Some(2.0),
            ..Default::default()
        }];
        let service = KpiService::new(Arc::new(MemoryRepository::new(trips)));

        let err = service.summarize().await.unwrap_err();
        assert!(matches!(err, DashboardError::EmptyResult { metric: "avg_fare" }));
    }
}
