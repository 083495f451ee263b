// Tabular dataset: one row per produced document set

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// One immutable data row; values are looked up by column label
#[derive(Debug, Clone)]
pub struct DataRow {
    /// Zero-based position in the dataset
    pub index: usize,
    values: HashMap<String, String>,
}

impl DataRow {
    pub fn new(index: usize, values: HashMap<String, String>) -> Self {
        Self { index, values }
    }

    /// Look up a column value
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|s| s.as_str())
    }

    /// Look up a column value, erroring if the column is absent
    pub fn require(&self, column: &str) -> Result<&str> {
        self.get(column)
            .ok_or_else(|| Error::missing_column(column, self.index))
    }
}

/// The loaded dataset: ordered columns and ordered rows
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub columns: Vec<String>,
    pub rows: Vec<DataRow>,
}

impl DataSet {
    /// Load a dataset from a CSV file with a header row
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        let mut reader = csv::Reader::from_path(path)?;
        Self::from_reader(&mut reader)
    }

    /// Load a dataset from CSV text
    pub fn from_csv_str(csv_text: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        Self::from_reader(&mut reader)
    }

    fn from_reader<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Self> {
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let values: HashMap<String, String> = columns
                .iter()
                .zip(record.iter())
                .map(|(col, val)| (col.clone(), val.to_string()))
                .collect();
            rows.push(DataRow::new(index, values));
        }

        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
