use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A small, schema-light tabular value: named columns plus string rows.
///
/// Everything the coordinator moves around — raw source frames, transformed
/// output, static lookup tables, emissions sub-chunks — uses this shape. The
/// per-source collaborators own any richer typing; by the time data reaches
/// the load step it has been flattened to strings ready for the CSV writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: Vec<S>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Builds a two-column lookup table from (abbr, value) pairs. Used for
    /// the static reference tables derived from built-in constants.
    pub fn from_pairs(left: &str, right: &str, pairs: &[(&str, &str)]) -> Self {
        let mut table = Table::new(vec![left, right]);
        for (a, b) in pairs {
            table.push_row(vec![*a, *b]);
        }
        table
    }

    /// Builds a one-column table from a list of values.
    pub fn from_column(name: &str, values: &[&str]) -> Self {
        let mut table = Table::new(vec![name]);
        for v in values {
            table.push_row(vec![*v]);
        }
        table
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Mapping from output table name to tabular data. BTreeMap keeps load order
/// deterministic across runs.
pub type TableMap = BTreeMap<String, Table>;
