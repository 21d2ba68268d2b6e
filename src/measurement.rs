// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Error;

use serde_derive::*;
use serde_json::Value as JsonValue;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

type DResult<T> = Result<T, String>;

/// A single benchmark sample.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Measurement {
    /// x-axis position: record size, field index, degree of polymorphism...
    pub index: f64,
    /// y-axis value, typically nanoseconds or seconds
    pub score: f64,
    /// implementation which produced the sample
    pub target: String,
}

impl Measurement {
    pub fn new(index: f64, score: f64, target: impl Into<String>) -> Self {
        Self {
            index,
            score,
            target: target.into(),
        }
    }
}

/// The measurement table for one chart, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurements {
    rows: Vec<Measurement>,
}

#[derive(Deserialize)]
struct Columns {
    index: Column<f64>,
    score: Column<f64>,
    target: Column<String>,
}

/// pandas writes columns keyed by row label, other tools write plain arrays
#[derive(Deserialize)]
#[serde(untagged)]
enum Column<T> {
    List(Vec<T>),
    Keyed(BTreeMap<String, T>),
}

impl<T> Column<T> {
    /// returns `(label, value)` pairs in row order
    fn into_rows(self) -> Vec<(String, T)> {
        match self {
            Column::List(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Column::Keyed(values) => {
                let mut rows: Vec<(String, T)> = values.into_iter().collect();
                if rows.iter().all(|(label, _)| label.parse::<u64>().is_ok()) {
                    rows.sort_by_key(|(label, _)| label.parse::<u64>().unwrap_or(0));
                }
                rows
            }
        }
    }
}

impl Measurements {
    pub fn new(rows: Vec<Measurement>) -> Self {
        Self { rows }
    }

    /// Read a measurement file. Both row-oriented (array of records) and
    /// column-oriented JSON are accepted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadData {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|reason| Error::MalformedData {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse measurements from JSON text. Empty tables are rejected.
    pub fn parse(json: &str) -> DResult<Self> {
        let value: JsonValue = serde_json::from_str(json).map_err(|e| e.to_string())?;

        let rows = match value {
            JsonValue::Array(_) => {
                serde_json::from_value::<Vec<Measurement>>(value).map_err(|e| e.to_string())?
            }
            JsonValue::Object(_) => {
                let columns: Columns = serde_json::from_value(value)
                    .map_err(|e| format!("bad column layout: {}", e))?;
                Self::zip_columns(columns)?
            }
            _ => {
                return Err("expected an array of records or an object of columns".to_string());
            }
        };

        if rows.is_empty() {
            return Err("no measurements".to_string());
        }

        Ok(Self { rows })
    }

    fn zip_columns(columns: Columns) -> DResult<Vec<Measurement>> {
        let index = columns.index.into_rows();
        let score = columns.score.into_rows();
        let target = columns.target.into_rows();

        if index.len() != score.len() || index.len() != target.len() {
            return Err(format!(
                "column lengths differ: index: {} score: {} target: {}",
                index.len(),
                score.len(),
                target.len()
            ));
        }

        index
            .into_iter()
            .zip(score)
            .zip(target)
            .map(|(((label, index), (s_label, score)), (t_label, target))| {
                if label != s_label || label != t_label {
                    return Err(format!("row labels differ at row: {}", label));
                }
                Ok(Measurement {
                    index,
                    score,
                    target,
                })
            })
            .collect()
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// largest `index` in the table
    pub fn max_index(&self) -> Option<f64> {
        self.rows.iter().map(|r| r.index).fold(None, max)
    }

    /// largest `score` in the table
    pub fn max_score(&self) -> Option<f64> {
        self.rows.iter().map(|r| r.score).fold(None, max)
    }

    /// Distinct targets in order of first appearance.
    pub fn targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !targets.contains(&row.target.as_str()) {
                targets.push(&row.target);
            }
        }
        targets
    }

    /// Rename every target through `rename`, which is called once per
    /// distinct identifier in order of first appearance. Distinct
    /// identifiers must keep distinct names. Nothing is modified on error.
    pub fn relabel<F>(&mut self, mut rename: F) -> Result<(), Error>
    where
        F: FnMut(&str) -> Result<String, Error>,
    {
        let mut renamed: HashMap<String, String> = HashMap::new();
        let mut owners: HashMap<String, String> = HashMap::new();
        for target in self.targets() {
            let label = rename(target)?;
            if let Some(first) = owners.insert(label.clone(), target.to_string()) {
                return Err(Error::DuplicateLabel {
                    name: label,
                    first,
                    second: target.to_string(),
                });
            }
            renamed.insert(target.to_string(), label);
        }

        for row in self.rows.iter_mut() {
            if let Some(label) = renamed.get(&row.target) {
                row.target = label.clone();
            }
        }
        Ok(())
    }
}

fn max(acc: Option<f64>, v: f64) -> Option<f64> {
    match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    }
}
