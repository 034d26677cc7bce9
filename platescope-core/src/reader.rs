//! Column reads by name.
//!
//! Names are resolved through an index built once from the headers
//! fetched at table-open time. Both read modes share the half-open
//! `[start, stop)` convention, with `stop` clamped to the declared row
//! count.

use crate::CoreError;
use protocol::{ColumnHeader, ColumnSlice, KeyValue};
use session::TableHandle;
use std::collections::HashMap;

/// Name to positional index map for one table.
pub struct ColumnIndex {
    indices: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(headers: &[ColumnHeader]) -> Self {
        let indices = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.name.clone(), index))
            .collect();
        Self { indices }
    }

    pub fn resolve(&self, name: &str) -> Result<usize, CoreError> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| CoreError::ColumnNotFound {
                name: name.to_string(),
            })
    }
}

impl ColumnIndex {
    fn resolve_all(&self, names: &[&str]) -> Result<Vec<usize>, CoreError> {
        names.iter().map(|name| self.resolve(name)).collect()
    }
}

/// Bulk read of `[start, stop)` across the named columns.
pub fn read_columns(
    table: &mut TableHandle<'_>,
    index: &ColumnIndex,
    names: &[&str],
    start: u64,
    stop: u64,
) -> Result<Vec<ColumnSlice>, CoreError> {
    let columns = index.resolve_all(names)?;
    let stop = stop.min(table.row_count());
    Ok(table.read(&columns, start, stop)?)
}

/// Predicate read: resolves the rows where `key_column == value`, then
/// fetches exactly those rows across the named columns.
pub fn read_matching(
    table: &mut TableHandle<'_>,
    index: &ColumnIndex,
    names: &[&str],
    key_column: &str,
    value: KeyValue,
) -> Result<Vec<ColumnSlice>, CoreError> {
    let columns = index.resolve_all(names)?;
    index.resolve(key_column)?;
    let rows = table.row_count();
    let matching = table.where_eq(key_column, value, 0, rows)?;
    Ok(table.read_coordinates(&columns, &matching)?)
}

/// Metric values as `f64`, accepting integer and float columns.
pub fn metric_values(column: &ColumnSlice) -> Result<Vec<f64>, CoreError> {
    match column {
        ColumnSlice::Float64 { values, .. } => Ok(values.clone()),
        ColumnSlice::Int64 { values, .. } => Ok(values.iter().map(|&v| v as f64).collect()),
        ColumnSlice::Text { name, .. } => Err(CoreError::NonNumericColumn { name: name.clone() }),
    }
}

/// Group keys as `i64` identifiers; only integer columns qualify.
pub fn key_values(column: &ColumnSlice) -> Result<Vec<i64>, CoreError> {
    match column {
        ColumnSlice::Int64 { values, .. } => Ok(values.clone()),
        ColumnSlice::Float64 { name, .. } | ColumnSlice::Text { name, .. } => {
            Err(CoreError::NonIntegerKey { name: name.clone() })
        }
    }
}
