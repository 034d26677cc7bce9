//! Figure and panel layout.

use crate::RenderError;

/// Subplots never use more than three columns.
pub const MAX_GRID_COLUMNS: usize = 3;

/// Above this many groups only every twelfth x label is shown.
pub const LABEL_STRIDE: usize = 12;

const PANEL_WIDTH: u32 = 480;
const PANEL_HEIGHT: u32 = 420;

#[derive(Debug, Clone)]
pub enum Panel {
    /// Linear bar chart: one bar per group label.
    Bars {
        title: String,
        labels: Vec<String>,
        heights: Vec<f64>,
    },
    /// Circular histogram over [0, 2*pi): one wedge per non-empty bin.
    Rose { title: String, bins: Vec<usize> },
}

#[derive(Debug, Clone)]
pub struct Figure {
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new(panels: Vec<Panel>) -> Result<Self, RenderError> {
        if panels.is_empty() {
            return Err(RenderError::EmptyFigure);
        }
        Ok(Self { panels })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Pixel size of the rendered figure.
    pub fn size(&self) -> (u32, u32) {
        let (rows, cols) = grid_dims(self.panels.len());
        (cols as u32 * PANEL_WIDTH, rows as u32 * PANEL_HEIGHT)
    }
}

/// `(rows, columns)` of the subplot grid for `panels` subplots.
pub fn grid_dims(panels: usize) -> (usize, usize) {
    let panels = panels.max(1);
    let cols = panels.min(MAX_GRID_COLUMNS);
    let rows = panels.div_ceil(MAX_GRID_COLUMNS);
    (rows, cols)
}

/// Every n-th x label shown for a panel with `groups` groups.
pub fn label_stride(groups: usize) -> usize {
    if groups > LABEL_STRIDE {
        LABEL_STRIDE
    } else {
        1
    }
}
