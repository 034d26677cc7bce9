//! One query from a plate reference to its opened results table.

use crate::object::{ObjectKind, ObjectRef};
use crate::reader::ColumnIndex;
use crate::wells::WellLabels;
use crate::CoreError;
use log::{debug, info};
use session::{Session, TableHandle};

/// Default namespace tag selecting the annotation that points at the
/// results table.
pub const DEFAULT_NAMESPACE: &str = "bulk_annotations";

#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub namespace: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// The located table, its name-to-index column map, and the eagerly
/// built well label map.
pub struct PlateTable<'s> {
    pub table: TableHandle<'s>,
    pub columns: ColumnIndex,
    pub labels: WellLabels,
    pub plate_name: String,
}

/// Joins the plate to its wells and namespace-filtered annotations, then
/// opens the table behind the first matching annotation.
///
/// A plate with no annotation in the namespace is a distinct, named
/// error rather than an empty-iterator fault.
pub fn locate_plate_table<'s>(
    session: &'s mut Session,
    object: &ObjectRef,
    config: &LocatorConfig,
) -> Result<PlateTable<'s>, CoreError> {
    match object.kind {
        ObjectKind::Plate => {}
    }

    let plate = session
        .query_plate(object.id, &config.namespace)?
        .ok_or_else(|| CoreError::PlateNotFound {
            object: object.clone(),
        })?;

    let annotation =
        plate
            .annotations
            .first()
            .cloned()
            .ok_or_else(|| CoreError::NoAnnotation {
                namespace: config.namespace.clone(),
            })?;

    let labels = WellLabels::from_wells(&plate.wells)?;
    debug!(
        "plate '{}': {} wells, annotation file {}",
        plate.name,
        labels.len(),
        annotation.file_id
    );

    let table = session.open_table(annotation.file_id)?;
    let columns = ColumnIndex::new(table.headers());
    info!(
        "located table for {} ('{}'): {} rows",
        object,
        plate.name,
        table.row_count()
    );

    Ok(PlateTable {
        table,
        columns,
        labels,
        plate_name: plate.name,
    })
}
