use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{FigureError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell, guessed from the CSV text.
/// Used as a `BTreeSet` key downstream, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw CSV field: integer, float, bool, else text.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Finite numeric cells as `f64`; `NaN` and infinities read as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded CSV
// ---------------------------------------------------------------------------

pub type Row = BTreeMap<String, CellValue>;

/// A loaded table with pre-computed per-column unique values.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names in header order.
    pub column_names: Vec<String>,
    pub rows: Vec<Row>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Table {
    /// Build column indices from the loaded rows.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();

        for row in &rows {
            for (col, val) in row {
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        Table {
            column_names,
            rows,
            unique_values,
        }
    }

    /// Build a table from named numeric columns of equal length.
    pub fn from_columns(columns: &[(&str, &[f64])]) -> Result<Self> {
        let len = columns.first().map_or(0, |(_, v)| v.len());
        if let Some((name, v)) = columns.iter().find(|(_, v)| v.len() != len) {
            return Err(FigureError::InvalidInput(format!(
                "column '{name}' has {} values, expected {len}",
                v.len()
            )));
        }
        let rows = (0..len)
            .map(|i| {
                columns
                    .iter()
                    .map(|(name, v)| (name.to_string(), CellValue::Float(v[i])))
                    .collect()
            })
            .collect();
        let names = columns.iter().map(|(n, _)| n.to_string()).collect();
        Ok(Self::from_rows(names, rows))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// All cells of a column; missing cells read as `Null`.
    pub fn column(&self, name: &str) -> Result<Vec<CellValue>> {
        if !self.has_column(name) {
            return Err(FigureError::MissingColumn(name.to_string()));
        }
        Ok(self
            .rows
            .iter()
            .map(|r| r.get(name).cloned().unwrap_or(CellValue::Null))
            .collect())
    }

    /// A column as floats; any null or text cell is an error naming the row.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .iter()
            .enumerate()
            .map(|(row, v)| {
                v.as_f64().ok_or_else(|| FigureError::NonNumeric {
                    column: name.to_string(),
                    row,
                    value: v.to_string(),
                })
            })
            .collect()
    }

    /// Two numeric columns as an (x, y) pair.
    pub fn xy(&self, x: &str, y: &str) -> Result<(Vec<f64>, Vec<f64>)> {
        Ok((self.numeric_column(x)?, self.numeric_column(y)?))
    }

    /// New table with only the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Table {
        let rows = indices
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        Table::from_rows(self.column_names.clone(), rows)
    }

    /// Append (or replace) a column.
    pub fn with_column(&self, name: &str, values: Vec<CellValue>) -> Result<Table> {
        if values.len() != self.len() {
            return Err(FigureError::InvalidInput(format!(
                "column '{name}' has {} values, table has {} rows",
                values.len(),
                self.len()
            )));
        }
        let mut names = self.column_names.clone();
        if !self.has_column(name) {
            names.push(name.to_string());
        }
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, v)| {
                let mut row = row.clone();
                row.insert(name.to_string(), v);
                row
            })
            .collect();
        Ok(Table::from_rows(names, rows))
    }
}
