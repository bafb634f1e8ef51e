// View service - Resolve a view, run its pipeline and shape the output
use crate::application::trip_repository::TripRepository;
use crate::domain::error::{DashboardError, Result};
use crate::domain::pipeline::GroupRecord;
use crate::domain::scalar::Scalar;
use crate::domain::table::ResultTable;
use crate::domain::view::{KeyDomain, View, ViewSpec};
use std::sync::Arc;

#[derive(Clone)]
pub struct ViewService {
    repository: Arc<dyn TripRepository>,
}

impl ViewService {
    pub fn new(repository: Arc<dyn TripRepository>) -> Self {
        Self { repository }
    }

    /// Views in selection-control order
    pub fn list_views(&self) -> Vec<&'static ViewSpec> {
        View::ALL.iter().map(|v| v.spec()).collect()
    }

    /// Run the pipeline behind `view_name` and return its raw buckets
    pub async fn run(&self, view_name: &str) -> Result<Vec<GroupRecord>> {
        self.run_spec(View::resolve(view_name)?.spec()).await
    }

    /// Run and shape in one step
    pub async fn table(&self, view_name: &str) -> Result<(&'static ViewSpec, ResultTable)> {
        let spec = View::resolve(view_name)?.spec();
        let records = self.run_spec(spec).await?;
        let table = shape(records, spec)?;
        Ok((spec, table))
    }

    async fn run_spec(&self, spec: &ViewSpec) -> Result<Vec<GroupRecord>> {
        let records = self.repository.aggregate(&spec.pipeline).await?;
        tracing::debug!("View '{}' returned {} groups", spec.name, records.len());
        Ok(records)
    }
}

/// Turn raw buckets into a display table: rename columns, apply the key domain
pub fn shape(records: Vec<GroupRecord>, spec: &ViewSpec) -> Result<ResultTable> {
    let mut columns = vec![spec.key_label.to_string()];
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        if record.metrics.is_empty() {
            return Err(DashboardError::MalformedRecord(format!(
                "group {} of '{}' has no metric",
                record.key, spec.name
            )));
        }

        if let Some((name, value)) = record
            .metrics
            .iter()
            .find(|(_, v)| !(v.is_numeric() || v.is_null()))
        {
            return Err(DashboardError::MalformedRecord(format!(
                "metric '{}' of '{}' is not numeric: {}",
                name, spec.name, value
            )));
        }

        // Column set comes from the first bucket; later buckets must match it
        if columns.len() == 1 {
            columns.extend(record.metrics.iter().map(|(name, _)| metric_label(spec, name)));
        } else if columns.len() != record.metrics.len() + 1 {
            return Err(DashboardError::MalformedRecord(format!(
                "group {} of '{}' has {} metrics, expected {}",
                record.key,
                spec.name,
                record.metrics.len(),
                columns.len() - 1
            )));
        }

        let key = match spec.key_domain {
            KeyDomain::Any => record.key,
            KeyDomain::Integral => match integral_key(record.key, spec)? {
                Some(key) => key,
                None => continue,
            },
        };

        let mut row = Vec::with_capacity(columns.len());
        row.push(key);
        row.extend(record.metrics.into_iter().map(|(_, v)| v));
        rows.push(row);
    }

    if columns.len() == 1 {
        columns.push(spec.metric_label.to_string());
    }

    Ok(ResultTable::new(columns, rows))
}

fn metric_label(spec: &ViewSpec, raw_name: &str) -> String {
    if raw_name == spec.pipeline.metric {
        spec.metric_label.to_string()
    } else {
        raw_name.to_string()
    }
}

/// Null and NaN keys are dropped; numeric keys are truncated to integers
fn integral_key(key: Scalar, spec: &ViewSpec) -> Result<Option<Scalar>> {
    match key {
        Scalar::Null => Ok(None),
        Scalar::Float(f) if f.is_nan() => Ok(None),
        Scalar::Int(i) => Ok(Some(Scalar::Int(i))),
        Scalar::Float(f) if f.is_finite() => {
            if f.fract() != 0.0 {
                tracing::warn!("Truncating fractional key {} in '{}'", f, spec.name);
            }
            Ok(Some(Scalar::Int(f.trunc() as i64)))
        }
        other => Err(DashboardError::MalformedRecord(format!(
            "key {} of '{}' is not a number",
            other, spec.name
        ))),
    }
}
