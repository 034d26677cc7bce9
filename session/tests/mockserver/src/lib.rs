//! In-process TCP server speaking the plate-server wire protocol from
//! fixed in-memory data. Integration tests drive the real client
//! against it.

use protocol::{
    ColumnHeader, ColumnSlice, KeyValue, PlateRecord, ServerRequest, ServerResponse,
};
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;

/// Session key handed out for every successful `create_session`.
pub const CREATED_KEY: &str = "mock-session-key";

#[derive(Clone)]
pub struct MockTable {
    pub file_id: i64,
    pub columns: Vec<ColumnSlice>,
}

impl MockTable {
    fn headers(&self) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|column| ColumnHeader {
                name: column.name().to_string(),
                kind: column.kind(),
            })
            .collect()
    }

    fn rows(&self) -> u64 {
        self.columns.first().map(|c| c.len() as u64).unwrap_or(0)
    }

    fn slice(&self, columns: &[usize], rows: &[u64]) -> Result<Vec<ColumnSlice>, String> {
        columns
            .iter()
            .map(|&index| {
                let column = self
                    .columns
                    .get(index)
                    .ok_or_else(|| format!("no column at index {index}"))?;
                Ok(pick_rows(column, rows))
            })
            .collect()
    }

    fn read(&self, columns: &[usize], start: u64, stop: u64) -> Result<Vec<ColumnSlice>, String> {
        let stop = stop.min(self.rows());
        let rows: Vec<u64> = (start..stop).collect();
        self.slice(columns, &rows)
    }

    fn where_eq(
        &self,
        column: &str,
        value: &KeyValue,
        start: u64,
        stop: u64,
    ) -> Result<Vec<u64>, String> {
        let column = self
            .columns
            .iter()
            .find(|c| c.name() == column)
            .ok_or_else(|| format!("no column named '{column}'"))?;
        let stop = stop.min(column.len() as u64);
        let mut rows = Vec::new();
        for row in start..stop {
            let index = row as usize;
            let matches = match (column, value) {
                (ColumnSlice::Int64 { values, .. }, KeyValue::Int(v)) => values[index] == *v,
                (ColumnSlice::Float64 { values, .. }, KeyValue::Float(v)) => values[index] == *v,
                (ColumnSlice::Text { values, .. }, KeyValue::Text(v)) => values[index] == *v,
                _ => false,
            };
            if matches {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

fn pick_rows(column: &ColumnSlice, rows: &[u64]) -> ColumnSlice {
    match column {
        ColumnSlice::Int64 { name, values } => ColumnSlice::Int64 {
            name: name.clone(),
            values: rows.iter().map(|&r| values[r as usize]).collect(),
        },
        ColumnSlice::Float64 { name, values } => ColumnSlice::Float64 {
            name: name.clone(),
            values: rows.iter().map(|&r| values[r as usize]).collect(),
        },
        ColumnSlice::Text { name, values } => ColumnSlice::Text {
            name: name.clone(),
            values: rows.iter().map(|&r| values[r as usize].clone()).collect(),
        },
    }
}

#[derive(Clone, Default)]
pub struct MockWorld {
    pub plates: Vec<PlateRecord>,
    pub tables: Vec<MockTable>,
    pub credentials: Vec<(String, String)>,
    pub session_keys: Vec<String>,
}

pub struct MockServer {
    addr: SocketAddr,
}

impl MockServer {
    /// Binds an ephemeral local port and serves `world` from a
    /// background thread for the rest of the test process.
    pub fn spawn(world: MockWorld) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        let world = world.clone();
                        thread::spawn(move || {
                            let _ = serve_connection(stream, &world);
                        });
                    }
                    Err(_) => break,
                }
            }
        });
        Ok(Self { addr })
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

struct ConnectionState {
    authenticated: bool,
    open_tables: HashSet<u64>,
}

fn serve_connection(stream: TcpStream, world: &MockWorld) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut state = ConnectionState {
        authenticated: false,
        open_tables: HashSet::new(),
    };

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let request: ServerRequest = match serde_json::from_str(line.trim()) {
            Ok(request) => request,
            Err(err) => {
                send(&mut writer, &error(format!("bad request: {err}")))?;
                continue;
            }
        };
        let session_done = matches!(request, ServerRequest::CloseSession);
        let response = answer(request, world, &mut state);
        send(&mut writer, &response)?;
        if session_done {
            return Ok(());
        }
    }
}

fn send(writer: &mut TcpStream, response: &ServerResponse) -> std::io::Result<()> {
    let payload = serde_json::to_string(response).expect("serializable response");
    writer.write_all(payload.as_bytes())?;
    writer.write_all(b"\n")
}

fn error(message: String) -> ServerResponse {
    ServerResponse::Error { message }
}

fn answer(request: ServerRequest, world: &MockWorld, state: &mut ConnectionState) -> ServerResponse {
    match request {
        ServerRequest::CreateSession { username, password } => {
            let known = world
                .credentials
                .iter()
                .any(|(u, p)| *u == username && *p == password);
            if known {
                state.authenticated = true;
                ServerResponse::SessionOpen {
                    key: CREATED_KEY.to_string(),
                }
            } else {
                error("authentication failed".to_string())
            }
        }
        ServerRequest::JoinSession { key } => {
            if key == CREATED_KEY || world.session_keys.contains(&key) {
                state.authenticated = true;
                ServerResponse::SessionOpen { key }
            } else {
                error("unknown session key".to_string())
            }
        }
        ServerRequest::CloseSession => ServerResponse::Ok,
        _ if !state.authenticated => error("not logged in".to_string()),
        ServerRequest::PlateQuery { id, namespace } => {
            let plate = world.plates.iter().find(|p| p.id == id).map(|plate| {
                let mut plate = plate.clone();
                plate
                    .annotations
                    .retain(|annotation| annotation.namespace == namespace);
                plate
            });
            ServerResponse::Plate { plate }
        }
        ServerRequest::OpenTable { file_id } => {
            match world.tables.iter().position(|t| t.file_id == file_id) {
                Some(index) => {
                    let table = index as u64;
                    state.open_tables.insert(table);
                    ServerResponse::TableOpened { table }
                }
                None => error(format!("no table file {file_id}")),
            }
        }
        ServerRequest::TableHeaders { table } => match lookup(world, state, table) {
            Ok(t) => ServerResponse::Headers {
                headers: t.headers(),
            },
            Err(message) => error(message),
        },
        ServerRequest::TableRows { table } => match lookup(world, state, table) {
            Ok(t) => ServerResponse::RowCount { rows: t.rows() },
            Err(message) => error(message),
        },
        ServerRequest::TableRead {
            table,
            columns,
            start,
            stop,
        } => match lookup(world, state, table).and_then(|t| t.read(&columns, start, stop)) {
            Ok(columns) => ServerResponse::Data { columns },
            Err(message) => error(message),
        },
        ServerRequest::TableWhereEq {
            table,
            column,
            value,
            start,
            stop,
        } => match lookup(world, state, table).and_then(|t| t.where_eq(&column, &value, start, stop))
        {
            Ok(rows) => ServerResponse::RowIndices { rows },
            Err(message) => error(message),
        },
        ServerRequest::TableReadCoordinates {
            table,
            columns,
            rows,
        } => match lookup(world, state, table).and_then(|t| t.slice(&columns, &rows)) {
            Ok(columns) => ServerResponse::Data { columns },
            Err(message) => error(message),
        },
        ServerRequest::CloseTable { table } => {
            if state.open_tables.remove(&table) {
                ServerResponse::Ok
            } else {
                error(format!("table {table} is not open"))
            }
        }
    }
}

fn lookup<'w>(
    world: &'w MockWorld,
    state: &ConnectionState,
    table: u64,
) -> Result<&'w MockTable, String> {
    if !state.open_tables.contains(&table) {
        return Err(format!("table {table} is not open"));
    }
    world
        .tables
        .get(table as usize)
        .ok_or_else(|| format!("table {table} does not exist"))
}
