//! Session connector for the plate data server.
//!
//! One process opens one session over one TCP connection. Remote calls
//! are strictly sequential; nothing is retried. The session and every
//! table opened through it are released on drop, so cleanup happens on
//! every exit path.

use log::{debug, warn};
use protocol::{ColumnHeader, ColumnSlice, KeyValue, PlateRecord, ServerRequest, ServerResponse};

mod transport;

use transport::Transport;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("could not connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error talking to server: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed server message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("server closed the connection")]
    ConnectionClosed,
    #[error("unexpected response to {request}")]
    Unexpected { request: &'static str },
}

/// An authenticated connection to the server, exposing the query
/// capability (`query_plate`) and the shared-resources capability
/// (`open_table`).
pub struct Session {
    transport: Transport,
    key: Option<String>,
    closed: bool,
}

impl Session {
    /// Opens the TCP connection. The session is not usable until
    /// [`login`](Self::login) or [`join`](Self::join) succeeds.
    pub fn connect(host: &str, port: Option<u16>) -> Result<Self, SessionError> {
        let port = port.unwrap_or(protocol::DEFAULT_PORT);
        let transport = Transport::connect(host, port)?;
        debug!("connected to {host}:{port}");
        Ok(Self {
            transport,
            key: None,
            closed: false,
        })
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let response = self.transport.call(&ServerRequest::CreateSession {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        match response {
            ServerResponse::SessionOpen { key } => {
                debug!("session created for {username}");
                self.key = Some(key);
                Ok(())
            }
            _ => Err(SessionError::Unexpected {
                request: "create_session",
            }),
        }
    }

    pub fn join(&mut self, key: &str) -> Result<(), SessionError> {
        let response = self.transport.call(&ServerRequest::JoinSession {
            key: key.to_string(),
        })?;
        match response {
            ServerResponse::SessionOpen { key } => {
                debug!("joined existing session");
                self.key = Some(key);
                Ok(())
            }
            _ => Err(SessionError::Unexpected {
                request: "join_session",
            }),
        }
    }

    pub fn session_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// One query joining a plate to its wells and to its annotations
    /// filtered to `namespace`. `None` means the plate does not exist.
    pub fn query_plate(
        &mut self,
        id: i64,
        namespace: &str,
    ) -> Result<Option<PlateRecord>, SessionError> {
        let response = self.transport.call(&ServerRequest::PlateQuery {
            id,
            namespace: namespace.to_string(),
        })?;
        match response {
            ServerResponse::Plate { plate } => Ok(plate),
            _ => Err(SessionError::Unexpected {
                request: "plate_query",
            }),
        }
    }

    /// Opens the table behind `file_id` and eagerly fetches its headers
    /// and row count. The returned handle closes the table when dropped.
    pub fn open_table(&mut self, file_id: i64) -> Result<TableHandle<'_>, SessionError> {
        let response = self
            .transport
            .call(&ServerRequest::OpenTable { file_id })?;
        let id = match response {
            ServerResponse::TableOpened { table } => table,
            _ => {
                return Err(SessionError::Unexpected {
                    request: "open_table",
                })
            }
        };

        let headers = match self.transport.call(&ServerRequest::TableHeaders { table: id })? {
            ServerResponse::Headers { headers } => headers,
            _ => {
                return Err(SessionError::Unexpected {
                    request: "table_headers",
                })
            }
        };
        let rows = match self.transport.call(&ServerRequest::TableRows { table: id })? {
            ServerResponse::RowCount { rows } => rows,
            _ => {
                return Err(SessionError::Unexpected {
                    request: "table_rows",
                })
            }
        };
        debug!("opened table {id}: {} columns, {rows} rows", headers.len());

        Ok(TableHandle {
            session: self,
            id,
            headers,
            rows,
            closed: false,
        })
    }

    /// Idempotent; also invoked from `Drop` so the session is released
    /// on every exit path.
    pub fn close(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.transport.call(&ServerRequest::CloseSession)? {
            ServerResponse::Ok => Ok(()),
            _ => Err(SessionError::Unexpected {
                request: "close_session",
            }),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.close() {
                warn!("could not close session cleanly: {err}");
            }
        }
    }
}

/// Scoped handle over an opened remote table.
///
/// Holds the session exclusively for its lifetime, which matches the
/// single-threaded, one-table-at-a-time flow of both tools.
pub struct TableHandle<'s> {
    session: &'s mut Session,
    id: u64,
    headers: Vec<ColumnHeader>,
    rows: u64,
    closed: bool,
}

impl TableHandle<'_> {
    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    pub fn row_count(&self) -> u64 {
        self.rows
    }

    /// Bulk read of rows `[start, stop)` across the given column indices.
    pub fn read(
        &mut self,
        columns: &[usize],
        start: u64,
        stop: u64,
    ) -> Result<Vec<ColumnSlice>, SessionError> {
        let response = self.session.transport.call(&ServerRequest::TableRead {
            table: self.id,
            columns: columns.to_vec(),
            start,
            stop,
        })?;
        match response {
            ServerResponse::Data { columns } => Ok(columns),
            _ => Err(SessionError::Unexpected {
                request: "table_read",
            }),
        }
    }

    /// Row indices in `[start, stop)` where `column == value`.
    pub fn where_eq(
        &mut self,
        column: &str,
        value: KeyValue,
        start: u64,
        stop: u64,
    ) -> Result<Vec<u64>, SessionError> {
        let response = self.session.transport.call(&ServerRequest::TableWhereEq {
            table: self.id,
            column: column.to_string(),
            value,
            start,
            stop,
        })?;
        match response {
            ServerResponse::RowIndices { rows } => Ok(rows),
            _ => Err(SessionError::Unexpected {
                request: "table_where_eq",
            }),
        }
    }

    /// Reads exactly the given rows across the given column indices.
    pub fn read_coordinates(
        &mut self,
        columns: &[usize],
        rows: &[u64],
    ) -> Result<Vec<ColumnSlice>, SessionError> {
        let response = self
            .session
            .transport
            .call(&ServerRequest::TableReadCoordinates {
                table: self.id,
                columns: columns.to_vec(),
                rows: rows.to_vec(),
            })?;
        match response {
            ServerResponse::Data { columns } => Ok(columns),
            _ => Err(SessionError::Unexpected {
                request: "table_read_coordinates",
            }),
        }
    }

    pub fn close(mut self) -> Result<(), SessionError> {
        self.close_inner()
    }

    fn close_inner(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self
            .session
            .transport
            .call(&ServerRequest::CloseTable { table: self.id })?
        {
            ServerResponse::Ok => Ok(()),
            _ => Err(SessionError::Unexpected {
                request: "close_table",
            }),
        }
    }
}

impl Drop for TableHandle<'_> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.close_inner() {
                warn!("could not close table {}: {err}", self.id);
            }
        }
    }
}
