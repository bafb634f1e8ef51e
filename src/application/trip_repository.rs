// Repository trait for trip data access
use crate::domain::error::Result;
use crate::domain::pipeline::{GroupRecord, PipelineSpec};
use async_trait::async_trait;

#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Approximate number of trip documents (metadata count, not a scan)
    async fn estimated_trip_count(&self) -> Result<u64>;

    /// Run a group-and-sort aggregation, returning buckets in pipeline order
    async fn aggregate(&self, pipeline: &PipelineSpec) -> Result<Vec<GroupRecord>>;
}
