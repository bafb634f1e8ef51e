// Error type shared by the query, shaping and rendering layers
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("datastore unreachable: {0}")]
    Connection(String),
    #[error("aggregation failed: {0}")]
    Query(String),
    #[error("no data to compute {metric}")]
    EmptyResult { metric: &'static str },
    #[error("unknown view \"{0}\"")]
    UnknownView(String),
    #[error("malformed group record: {0}")]
    MalformedRecord(String),
    #[error("failed to load trip fixture: {0}")]
    Fixture(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
