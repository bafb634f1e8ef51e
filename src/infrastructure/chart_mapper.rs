// Mapper from result tables to render-ready bar charts
use crate::domain::chart::{BarChart, BarSeries, RenderedView};
use crate::domain::error::{DashboardError, Result};
use crate::domain::scalar::Scalar;
use crate::domain::table::ResultTable;

/// Bar chart keyed on `label_column` plus the full listing
pub fn render(table: ResultTable, label_column: &str, title: &str) -> Result<RenderedView> {
    if table.column_index(label_column) != Some(0) {
        return Err(DashboardError::MalformedRecord(format!(
            "label column '{}' must be the first column of {:?}",
            label_column, table.columns
        )));
    }

    let categories: Vec<String> = table
        .rows
        .iter()
        .map(|row| row.first().map(category_label).unwrap_or_default())
        .collect();

    let series: Vec<BarSeries> = table
        .columns
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, name)| BarSeries {
            name: name.clone(),
            values: table
                .rows
                .iter()
                .map(|row| row.get(idx).and_then(Scalar::as_f64))
                .collect(),
        })
        .collect();

    let chart = BarChart {
        label_column: label_column.to_string(),
        categories,
        series,
    };

    Ok(RenderedView {
        title: title.to_string(),
        chart,
        table,
    })
}

fn category_label(key: &Scalar) -> String {
    match key {
        Scalar::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
        other => other.to_string(),
    }
}
