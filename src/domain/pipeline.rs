// Data description of a group-and-sort aggregation
use super::scalar::Scalar;
use super::trip::TripField;

/// Where the grouping key of a pipeline comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeySource {
    /// One group over the whole collection (key is null)
    All,
    Field(TripField),
    /// Hour of day (0-23, UTC) of a timestamp field
    HourOf(TripField),
    /// Day of month (1-31, UTC) of a timestamp field
    DayOfMonthOf(TripField),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    Count,
    Avg(TripField),
    Sum(TripField),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortRule {
    None,
    KeyAscending,
    MetricDescending { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSpec {
    pub key: KeySource,
    pub aggregate: Aggregate,
    /// Name of the metric field in the raw output
    pub metric: &'static str,
    pub sort: SortRule,
}

impl PipelineSpec {
    pub const fn new(key: KeySource, aggregate: Aggregate, metric: &'static str, sort: SortRule) -> Self {
        Self {
            key,
            aggregate,
            metric,
            sort,
        }
    }

    /// Single-group average over the whole collection
    pub const fn overall_average(field: TripField, metric: &'static str) -> Self {
        Self::new(KeySource::All, Aggregate::Avg(field), metric, SortRule::None)
    }
}

/// One bucket as returned by the datastore
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    pub key: Scalar,
    pub metrics: Vec<(String, Scalar)>,
}

impl GroupRecord {
    pub fn new(key: Scalar, metrics: Vec<(String, Scalar)>) -> Self {
        Self { key, metrics }
    }

    pub fn metric(&self, name: &str) -> Option<&Scalar> {
        self.metrics.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}
