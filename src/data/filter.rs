use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, BTreeSet<CellValue>>;

/// Initialise a [`FilterState`] with all values selected (i.e., keep everything).
pub fn init_filter_state(table: &Table) -> FilterState {
    table
        .unique_values
        .iter()
        .map(|(col, vals)| (col.clone(), vals.clone()))
        .collect()
}

/// Restrict one column to the given values.
pub fn select_values<I, V>(filters: &mut FilterState, column: &str, values: I)
where
    I: IntoIterator<Item = V>,
    V: Into<CellValue>,
{
    filters.insert(
        column.to_string(),
        values.into_iter().map(Into::into).collect(),
    );
}

/// Return indices of rows that pass all active filters.
///
/// A row passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            for (col, selected) in filters {
                if selected.is_empty() {
                    return false;
                }
                // Everything selected → no effective filter
                if let Some(all_vals) = table.unique_values.get(col) {
                    if selected.len() == all_vals.len() {
                        continue;
                    }
                }
                let value = row.get(col).unwrap_or(&CellValue::Null);
                if !selected.contains(value) {
                    return false;
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

/// Indices of rows whose numeric `column` lies in `[lo, hi]`.
/// Rows with a missing or non-numeric value are dropped.
pub fn range_indices(table: &Table, column: &str, lo: f64, hi: f64) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            row.get(column)
                .and_then(CellValue::as_f64)
                .is_some_and(|v| v >= lo && v <= hi)
        })
        .map(|(i, _)| i)
        .collect()
}
