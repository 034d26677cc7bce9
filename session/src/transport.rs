use crate::SessionError;
use protocol::{ServerRequest, ServerResponse};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

/// One JSON line out, one JSON line in, per remote call.
pub(crate) struct Transport {
    reader: BufReader<TcpStream>,
}

impl Transport {
    pub(crate) fn connect(host: &str, port: u16) -> Result<Self, SessionError> {
        let stream = TcpStream::connect((host, port)).map_err(|source| SessionError::Connect {
            host: host.to_string(),
            port,
            source,
        })?;
        Ok(Self {
            reader: BufReader::new(stream),
        })
    }

    pub(crate) fn call(&mut self, request: &ServerRequest) -> Result<ServerResponse, SessionError> {
        let payload = serde_json::to_string(request)?;
        let stream = self.reader.get_mut();
        stream.write_all(payload.as_bytes())?;
        stream.write_all(b"\n")?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 || line.trim().is_empty() {
            return Err(SessionError::ConnectionClosed);
        }
        let response: ServerResponse = serde_json::from_str(line.trim())?;
        if let ServerResponse::Error { message } = response {
            return Err(SessionError::Server(message));
        }
        Ok(response)
    }
}
