//! `Kind:Id` object references from the command line.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Plate,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Plate => write!(f, "Plate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub id: i64,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ObjectRefError {
    #[error("object reference '{0}' is not of the form Kind:Id")]
    Malformed(String),
    #[error("unsupported object kind '{0}', only Plate is supported")]
    UnknownKind(String),
    #[error("object id '{0}' is not numeric")]
    BadId(String),
}

impl FromStr for ObjectRef {
    type Err = ObjectRefError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (kind, id) = text
            .split_once(':')
            .ok_or_else(|| ObjectRefError::Malformed(text.to_string()))?;
        let kind = match kind {
            "Plate" => ObjectKind::Plate,
            other => return Err(ObjectRefError::UnknownKind(other.to_string())),
        };
        let id = id
            .parse::<i64>()
            .map_err(|_| ObjectRefError::BadId(id.to_string()))?;
        Ok(ObjectRef { kind, id })
    }
}
