//! Framed synchronous transport to a single broker.
//!
//! A connection carries at most one request at a time. The wire protocol
//! would permit pipelining; forbidding it collapses the failure model to
//! "the one active call", so a transport error can only ever lose that
//! call.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};
use tracing::debug;

use crate::api::Request;
use crate::config;
use crate::error::{Error, Result};
use crate::wire::{Decoder, WireRead, WireWrite};

/// Upper bound on a response frame, to catch garbage length prefixes
/// before they turn into huge allocations.
const MAX_FRAME_SIZE: usize = 100 * 1024 * 1024;

/// A connection to one broker, plaintext or TLS.
pub enum BrokerConn {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl BrokerConn {
    /// Dial `host:port` within the process dial timeout. With a TLS config
    /// the handshake happens on first write; the config carries the root
    /// CA pool, any client certificates, and verification settings.
    pub fn dial(addr: &str, tls: Option<&Arc<ClientConfig>>) -> Result<BrokerConn> {
        let timeout = config::dial_timeout();
        let stream = dial_tcp(addr, timeout)?;
        stream.set_nodelay(true).ok();
        match tls {
            None => Ok(BrokerConn::Plain(stream)),
            Some(tls_config) => {
                let host = addr.rsplit_once(':').map(|(h, _)| h).unwrap_or(addr);
                let server_name = ServerName::try_from(host.to_string())
                    .map_err(|e| Error::Protocol(format!("invalid tls server name: {}", e)))?;
                let conn = ClientConnection::new(Arc::clone(tls_config), server_name)
                    .map_err(|e| Error::Protocol(format!("tls: {}", e)))?;
                Ok(BrokerConn::Tls(Box::new(StreamOwned::new(conn, stream))))
            }
        }
    }

    fn tcp(&self) -> &TcpStream {
        match self {
            BrokerConn::Plain(s) => s,
            BrokerConn::Tls(s) => s.get_ref(),
        }
    }

    /// Socket-level deadline for both reads and writes. None clears it.
    pub fn set_deadline(&self, d: Option<Duration>) -> Result<()> {
        self.tcp().set_read_timeout(d)?;
        self.tcp().set_write_timeout(d)?;
        Ok(())
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.tcp().peer_addr().ok()
    }
}

impl Read for BrokerConn {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            BrokerConn::Plain(s) => s.read(buf),
            BrokerConn::Tls(s) => s.read(buf),
        }
    }
}

impl Write for BrokerConn {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            BrokerConn::Plain(s) => s.write(buf),
            BrokerConn::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            BrokerConn::Plain(s) => s.flush(),
            BrokerConn::Tls(s) => s.flush(),
        }
    }
}

/// Resolve and connect, trying each resolved address until one accepts.
fn dial_tcp(addr: &str, timeout: Duration) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|e| Error::Protocol(format!("error resolving {}: {}", addr, e)))?
        .collect();
    let mut last: Option<std::io::Error> = None;
    for a in addrs {
        match TcpStream::connect_timeout(&a, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last = Some(e),
        }
    }
    Err(match last {
        Some(e) => Error::Io(e),
        None => Error::Protocol(format!("no addresses for {}", addr)),
    })
}

/// One synchronous request-response round trip.
///
/// Applies the process request timeout as the socket deadline, writes the
/// length-prefixed request, reads the length-prefixed response, strips the
/// correlation id, and decodes the rest into `R`. Any failure is returned
/// as is; closing the connection is the caller's job.
pub fn call<B: WireWrite, R: WireRead>(conn: &mut BrokerConn, req: &Request<B>) -> Result<R> {
    conn.set_deadline(config::request_timeout())?;
    let frame = req.to_bytes();
    conn.write_all(&frame)?;
    conn.flush()?;
    let body = read_frame(conn)?;
    debug!(
        api = crate::api::key_name(req.api_key),
        version = req.api_version,
        response_len = body.len(),
        "api call"
    );
    let mut body = body;
    let mut d = Decoder::new(&mut body);
    let _correlation_id = d.read_i32()?;
    R::read(&mut d)
}

fn read_frame(conn: &mut BrokerConn) -> Result<Bytes> {
    let mut len_buf = [0u8; 4];
    conn.read_exact(&mut len_buf)
        .map_err(|e| Error::Protocol(format!("error reading response size: {}", e)))?;
    let len = i32::from_be_bytes(len_buf);
    if len < 4 || len as usize > MAX_FRAME_SIZE {
        return Err(Error::Protocol(format!(
            "invalid response frame size: {}",
            len
        )));
    }
    let mut body = vec![0u8; len as usize];
    conn.read_exact(&mut body)
        .map_err(|e| Error::Protocol(format!("error reading response body: {}", e)))?;
    Ok(Bytes::from(body))
}
