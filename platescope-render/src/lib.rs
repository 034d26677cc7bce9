//! Bar and polar-histogram figures: layout, drawing, display, export.

pub mod figure;
pub mod viewer;

mod draw;

pub use draw::{render_to_file, render_to_rgb};
pub use figure::{grid_dims, label_stride, Figure, Panel};
pub use viewer::show_figure;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("figure has no panels")]
    EmptyFigure,
    #[error("could not draw figure: {0}")]
    Draw(String),
    #[error("could not write figure to '{path}': {reason}")]
    Export { path: String, reason: String },
    #[error("window error: {0}")]
    Window(String),
}
