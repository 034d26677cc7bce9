//! Well display labels.
//!
//! A well at (row, column) is shown as a letter plus a two-digit
//! one-based column number: (0, 0) is "A01", (1, 11) is "B12".

use crate::CoreError;
use protocol::WellRecord;
use std::collections::HashMap;

pub fn well_label(row: u32, column: u32) -> Result<String, CoreError> {
    if row > 25 {
        return Err(CoreError::InvalidWellRow { row });
    }
    let letter = (b'A' + row as u8) as char;
    Ok(format!("{letter}{:02}", column + 1))
}

/// Total mapping from well id to display label, built eagerly when the
/// plate is located.
#[derive(Debug, Clone, Default)]
pub struct WellLabels {
    labels: HashMap<i64, String>,
}

impl WellLabels {
    pub fn from_wells(wells: &[WellRecord]) -> Result<Self, CoreError> {
        let mut labels = HashMap::with_capacity(wells.len());
        for well in wells {
            labels.insert(well.id, well_label(well.row, well.column)?);
        }
        Ok(Self { labels })
    }

    pub fn get(&self, well: i64) -> Result<&str, CoreError> {
        self.labels
            .get(&well)
            .map(String::as_str)
            .ok_or(CoreError::MissingWellLabel { well })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
