// In-memory repository evaluating pipelines over loaded trip records
use crate::application::trip_repository::TripRepository;
use crate::domain::error::{DashboardError, Result};
use crate::domain::pipeline::{Aggregate, GroupRecord, KeySource, PipelineSpec, SortRule};
use crate::domain::scalar::Scalar;
use crate::domain::trip::TripRecord;
use async_trait::async_trait;
use chrono::{Datelike, Timelike};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    trips: Vec<TripRecord>,
}

#[derive(Debug)]
struct Bucket {
    key: Scalar,
    count: u64,
    sum: f64,
    seen: u64,
}

impl MemoryRepository {
    pub fn new(trips: Vec<TripRecord>) -> Self {
        Self { trips }
    }

    /// Load a JSON array of trip documents
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Fixture(format!("{}: {}", path.display(), e)))?;
        let trips: Vec<TripRecord> = serde_json::from_str(&raw)
            .map_err(|e| DashboardError::Fixture(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded {} trips from {}", trips.len(), path.display());
        Ok(Self::new(trips))
    }

    fn group_key(trip: &TripRecord, key: KeySource) -> Scalar {
        match key {
            KeySource::All => Scalar::Null,
            KeySource::Field(field) => trip.scalar(field),
            KeySource::HourOf(field) => trip
                .timestamp(field)
                .map(|t| Scalar::Int(t.hour() as i64))
                .unwrap_or(Scalar::Null),
            KeySource::DayOfMonthOf(field) => trip
                .timestamp(field)
                .map(|t| Scalar::Int(t.day() as i64))
                .unwrap_or(Scalar::Null),
        }
    }

    fn evaluate(&self, pipeline: &PipelineSpec) -> Vec<GroupRecord> {
        // Kept sorted by key so the natural output is key-ascending
        let mut buckets: Vec<Bucket> = Vec::new();

        for trip in &self.trips {
            let key = Self::group_key(trip, pipeline.key);
            let idx = match buckets.binary_search_by(|b| b.key.canonical_cmp(&key)) {
                Ok(idx) => idx,
                Err(idx) => {
                    buckets.insert(
                        idx,
                        Bucket {
                            key,
                            count: 0,
                            sum: 0.0,
                            seen: 0,
                        },
                    );
                    idx
                }
            };

            let bucket = &mut buckets[idx];
            bucket.count += 1;
            if let Aggregate::Avg(field) | Aggregate::Sum(field) = pipeline.aggregate {
                if let Some(value) = trip.numeric(field) {
                    bucket.sum += value;
                    bucket.seen += 1;
                }
            }
        }

        let mut records: Vec<GroupRecord> = buckets
            .into_iter()
            .map(|b| {
                let value = match pipeline.aggregate {
                    Aggregate::Count => Scalar::Int(b.count as i64),
                    Aggregate::Avg(_) if b.seen == 0 => Scalar::Null,
                    Aggregate::Avg(_) => Scalar::Float(b.sum / b.seen as f64),
                    Aggregate::Sum(_) if b.seen == 0 => Scalar::Int(0),
                    Aggregate::Sum(_) => Scalar::Float(b.sum),
                };
                GroupRecord::new(b.key, vec![(pipeline.metric.to_string(), value)])
            })
            .collect();

        if let SortRule::MetricDescending { limit } = pipeline.sort {
            // Stable, so ties stay in key order
            records.sort_by(|a, b| {
                let (x, y) = (a.metric(pipeline.metric), b.metric(pipeline.metric));
                match (x, y) {
                    (Some(x), Some(y)) => y.canonical_cmp(x),
                    _ => std::cmp::Ordering::Equal,
                }
            });
            records.truncate(limit);
        }

        records
    }
}

#[async_trait]
impl TripRepository for MemoryRepository {
    async fn estimated_trip_count(&self) -> Result<u64> {
        Ok(self.trips.len() as u64)
    }

    async fn aggregate(&self, pipeline: &PipelineSpec) -> Result<Vec<GroupRecord>> {
        Ok(self.evaluate(pipeline))
    }
}
