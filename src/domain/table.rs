// Rectangular result table handed to the renderer
use serde::Serialize;

use super::scalar::Scalar;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
impl ResultTable {
    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Scalar>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(idx)).collect())
    }
}
