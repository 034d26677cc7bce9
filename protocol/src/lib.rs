//! Wire types for the plate data server.
//!
//! Every remote call is one JSON request line answered by one JSON
//! response line. Requests and responses are internally tagged enums so
//! the mock server and the client agree on a single format.

use serde::{Deserialize, Serialize};

/// Port the server listens on when none is given.
pub const DEFAULT_PORT: u16 = 4064;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellRecord {
    pub id: i64,
    pub row: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: i64,
    pub namespace: String,
    pub file_id: i64,
}

/// A plate joined to its wells and its namespace-filtered annotations,
/// as returned by a single `plate_query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateRecord {
    pub id: i64,
    pub name: String,
    pub wells: Vec<WellRecord>,
    pub annotations: Vec<AnnotationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Int64,
    Float64,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Int64 => "int64",
            ColumnKind::Float64 => "float64",
            ColumnKind::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub name: String,
    pub kind: ColumnKind,
}

/// One column's worth of values from a read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSlice {
    Int64 { name: String, values: Vec<i64> },
    Float64 { name: String, values: Vec<f64> },
    Text { name: String, values: Vec<String> },
}

impl ColumnSlice {
    pub fn name(&self) -> &str {
        match self {
            ColumnSlice::Int64 { name, .. }
            | ColumnSlice::Float64 { name, .. }
            | ColumnSlice::Text { name, .. } => name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnSlice::Int64 { values, .. } => values.len(),
            ColumnSlice::Float64 { values, .. } => values.len(),
            ColumnSlice::Text { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnSlice::Int64 { .. } => ColumnKind::Int64,
            ColumnSlice::Float64 { .. } => ColumnKind::Float64,
            ColumnSlice::Text { .. } => ColumnKind::Text,
        }
    }
}

/// Right-hand side of a `column == value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerRequest {
    CreateSession {
        username: String,
        password: String,
    },
    JoinSession {
        key: String,
    },
    CloseSession,
    PlateQuery {
        id: i64,
        namespace: String,
    },
    OpenTable {
        file_id: i64,
    },
    TableHeaders {
        table: u64,
    },
    TableRows {
        table: u64,
    },
    TableRead {
        table: u64,
        columns: Vec<usize>,
        start: u64,
        stop: u64,
    },
    TableWhereEq {
        table: u64,
        column: String,
        value: KeyValue,
        start: u64,
        stop: u64,
    },
    TableReadCoordinates {
        table: u64,
        columns: Vec<usize>,
        rows: Vec<u64>,
    },
    CloseTable {
        table: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerResponse {
    Ok,
    Error { message: String },
    SessionOpen { key: String },
    Plate { plate: Option<PlateRecord> },
    TableOpened { table: u64 },
    Headers { headers: Vec<ColumnHeader> },
    RowCount { rows: u64 },
    Data { columns: Vec<ColumnSlice> },
    RowIndices { rows: Vec<u64> },
}
