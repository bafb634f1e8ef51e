// Render-ready chart domain models
use serde::Serialize;

use super::table::ResultTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub label_column: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

/// A chart plus the full listing it was drawn from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView {
    pub title: String,
    pub chart: BarChart,
    pub table: ResultTable,
}
