//! Grouping and reduction of row-aligned key/metric columns.

use crate::CoreError;
use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

/// Requesting this metric name means "count rows per key" instead of
/// averaging a real column.
pub const CELL_COUNT_COLUMN: &str = "Image";

/// Encounter-ordered grouping of metric values by key.
pub struct Grouping {
    order: Vec<i64>,
    values: HashMap<i64, Vec<f64>>,
    counts: HashMap<i64, usize>,
}

impl Grouping {
    /// Grouping with counts only, for the cell-count pseudo-metric.
    pub fn from_keys(keys: &[i64]) -> Self {
        let mut order = Vec::new();
        let mut counts = HashMap::new();
        for &key in keys {
            *counts.entry(key).or_insert_with(|| {
                order.push(key);
                0
            }) += 1;
        }
        Self {
            order,
            values: HashMap::new(),
            counts,
        }
    }

    /// Groups `values[i]` under `keys[i]`; both columns must be
    /// row-aligned.
    pub fn from_rows(keys: &[i64], values: &[f64]) -> Result<Self, CoreError> {
        if keys.len() != values.len() {
            return Err(CoreError::RowMisaligned {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut grouping = Self::from_keys(keys);
        for (&key, &value) in keys.iter().zip(values) {
            grouping.values.entry(key).or_default().push(value);
        }
        Ok(grouping)
    }

    /// Distinct keys in encounter order.
    pub fn keys(&self) -> &[i64] {
        &self.order
    }

    /// Arithmetic mean per group, in encounter order.
    pub fn mean(&self) -> Vec<(i64, f64)> {
        self.order
            .iter()
            .filter_map(|key| {
                let values = self.values.get(key)?;
                if values.is_empty() {
                    return None;
                }
                let sum: f64 = values.iter().sum();
                Some((*key, sum / values.len() as f64))
            })
            .collect()
    }

    /// Row count per group, in encounter order. Independent of any
    /// metric column's values.
    pub fn counts(&self) -> Vec<(i64, usize)> {
        self.order
            .iter()
            .map(|key| (*key, self.counts.get(key).copied().unwrap_or(0)))
            .collect()
    }
}

/// Maps each group key to its display label and sorts the pairs by
/// label. All panels share this ordering.
pub fn labelled_sorted<F>(
    pairs: Vec<(i64, f64)>,
    label: F,
) -> Result<Vec<(String, f64)>, CoreError>
where
    F: Fn(i64) -> Result<String, CoreError>,
{
    let mut labelled = pairs
        .into_iter()
        .map(|(key, value)| Ok((label(key)?, value)))
        .collect::<Result<Vec<_>, CoreError>>()?;
    labelled.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(labelled)
}

/// Numeric-id groups (image ids) have no letter prefix, so they are
/// sorted numerically and labelled with the decimal id.
pub fn numeric_labels(mut pairs: Vec<(i64, f64)>) -> Vec<(String, f64)> {
    pairs.sort_by_key(|(key, _)| *key);
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

pub fn degrees_to_radians(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.to_radians()).collect()
}

/// Every angle appears twice, at itself and at itself plus pi, so the
/// rose diagram is symmetric across the origin. Results are normalized
/// into [0, 2*pi).
pub fn mirror_angles(angles: &[f64]) -> Vec<f64> {
    let mut mirrored = Vec::with_capacity(angles.len() * 2);
    for &angle in angles {
        mirrored.push(angle.rem_euclid(TAU));
        mirrored.push((angle + PI).rem_euclid(TAU));
    }
    mirrored
}

/// Counts per angular bin over [0, 2*pi).
pub fn polar_histogram(angles: &[f64], bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return counts;
    }
    let width = TAU / bins as f64;
    for &angle in angles {
        let bin = ((angle.rem_euclid(TAU) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    counts
}
