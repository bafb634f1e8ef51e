// Domain layer - Trip data, view registry and result shapes
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod kpi;
pub mod pipeline;
pub mod scalar;
pub mod table;
pub mod trip;
pub mod view;
