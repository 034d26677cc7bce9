//! Locating, reading, and reducing plate measurement tables.

pub mod aggregate;
pub mod locator;
pub mod object;
pub mod reader;
pub mod wells;

use object::ObjectRef;
use session::SessionError;

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{object} was not found on the server")]
    PlateNotFound { object: ObjectRef },
    #[error("plate has no annotation with namespace '{namespace}'")]
    NoAnnotation { namespace: String },
    #[error("column '{name}' not found in table")]
    ColumnNotFound { name: String },
    #[error("column '{name}' is not numeric")]
    NonNumericColumn { name: String },
    #[error("column '{name}' does not hold integer identifiers")]
    NonIntegerKey { name: String },
    #[error("well row {row} is out of range, rows A-Z cover 0-25")]
    InvalidWellRow { row: u32 },
    #[error("no display label for well id {well}")]
    MissingWellLabel { well: i64 },
    #[error("key column has {keys} rows but metric column has {values}")]
    RowMisaligned { keys: usize, values: usize },
}
