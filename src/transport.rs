//! TCP transport layer for MC 1E communication.
//!
//! This module provides the [`Transport`] trait and its TCP implementation
//! [`TcpTransport`]. The transport layer only knows about sockets and ASCII
//! text; frame layout and end codes are handled by the protocol layer.
//!
//! # Design
//!
//! - **Synchronous** - blocking send/receive bounded by a configurable timeout
//! - **Two lifecycles** - one persistent connection, or a fresh connection per exchange
//! - **Fragment tolerant** - 1E over TCP has no length prefix, so after the first
//!   chunk the transport keeps reading while data keeps arriving within a short
//!   linger window
//!
//! # Constants
//!
//! - [`DEFAULT_MC_PORT`] - MC protocol port configured on the FX3U-ENET-L (1027)
//! - [`DEFAULT_TIMEOUT`] - Default connect/send/receive timeout (1.5 seconds)
//! - [`DEFAULT_LINGER`] - Default fragment drain window (100 ms)
//! - [`RECV_BUFFER_SIZE`] - Size of a single receive (4096 bytes)
//!
//! # Example
//!
//! ```no_run
//! use melsec_mc1e::{ConnectionMode, TcpTransport, Transport};
//! use std::time::{Duration, Instant};
//!
//! let mut transport = TcpTransport::new(
//!     "192.168.3.254:1027".parse().unwrap(),
//!     Duration::from_millis(1500),
//!     ConnectionMode::Persistent,
//! );
//!
//! let response = transport.exchange("00FF000A5820000000000008")?;
//! # Ok::<(), melsec_mc1e::McError>(())
//! ```

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{McError, Result};

/// Default MC protocol TCP port on the FX3U-ENET-L.
pub const DEFAULT_MC_PORT: u16 = 1027;

/// Default timeout for connect, send and the first receive.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1500);

/// Default idle window used to drain trailing response fragments.
pub const DEFAULT_LINGER: Duration = Duration::from_millis(100);

/// Size of a single receive call.
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Upper bound on collected response bytes. A full 256-word read is 1028
/// characters.
const MAX_RESPONSE_LEN: usize = 2 * RECV_BUFFER_SIZE;

/// Connection lifecycle strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// One connection opened on first use and reused across exchanges.
    #[default]
    Persistent,
    /// A fresh connection for every exchange, closed afterwards.
    PerCall,
}

/// Byte-level request/response exchange with a PLC.
///
/// Implementations must perform one request and collect one complete
/// response per [`exchange`](Transport::exchange) call.
pub trait Transport {
    /// Opens the connection ahead of the first exchange. No-op when a
    /// connection is already open or the transport connects per call.
    fn connect(&mut self) -> Result<()>;

    /// Sends one ASCII frame and returns the trimmed ASCII response.
    fn exchange(&mut self, frame: &str) -> Result<String>;

    /// Closes any open connection. Safe to call repeatedly.
    fn close(&mut self);

    /// Returns whether a connection is currently held open.
    fn is_connected(&self) -> bool;
}

/// TCP transport for MC 1E communication.
pub struct TcpTransport {
    plc_addr: SocketAddr,
    timeout: Duration,
    linger: Duration,
    mode: ConnectionMode,
    connect_attempts: u32,
    connect_backoff: Duration,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Creates a transport. No connection is opened until the first
    /// exchange or an explicit [`connect`](Transport::connect).
    pub fn new(plc_addr: SocketAddr, timeout: Duration, mode: ConnectionMode) -> Self {
        Self {
            plc_addr,
            timeout,
            linger: DEFAULT_LINGER,
            mode,
            connect_attempts: 1,
            connect_backoff: Duration::ZERO,
            stream: None,
        }
    }

    /// Sets the fragment drain window. `Duration::ZERO` disables draining.
    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    /// Retries a failed connect up to `attempts` times in total, sleeping
    /// `backoff` between attempts.
    pub fn with_connect_retries(mut self, attempts: u32, backoff: Duration) -> Self {
        self.connect_attempts = attempts.max(1);
        self.connect_backoff = backoff;
        self
    }

    /// Returns the connection mode.
    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    fn open(&self) -> Result<TcpStream> {
        if self.timeout.is_zero() {
            return Err(McError::invalid_parameter("timeout", "must be greater than zero"));
        }

        let mut last_err = None;

        for attempt in 1..=self.connect_attempts {
            debug!(addr = %self.plc_addr, attempt, "connecting");
            match TcpStream::connect_timeout(&self.plc_addr, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    stream.set_nodelay(true)?;
                    debug!(addr = %self.plc_addr, "connected");
                    return Ok(stream);
                }
                Err(e) => {
                    warn!(addr = %self.plc_addr, attempt, error = %e, "connect failed");
                    last_err = Some(e);
                    if attempt < self.connect_attempts && !self.connect_backoff.is_zero() {
                        std::thread::sleep(self.connect_backoff);
                    }
                }
            }
        }

        Err(McError::Transport(last_err.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "no connect attempt made")
        })))
    }

    fn send_and_collect(&self, stream: &mut TcpStream, frame: &str) -> Result<Response> {
        stream.write_all(frame.as_bytes())?;
        stream.flush()?;
        collect_response(stream, self.timeout, self.linger)
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self) -> Result<()> {
        if self.mode == ConnectionMode::PerCall || self.stream.is_some() {
            return Ok(());
        }
        self.stream = Some(self.open()?);
        Ok(())
    }

    fn exchange(&mut self, frame: &str) -> Result<String> {
        match self.mode {
            ConnectionMode::Persistent => {
                let mut stream = match self.stream.take() {
                    Some(stream) => stream,
                    None => self.open()?,
                };
                // On error the stream is dropped here, which closes it.
                let response = self.send_and_collect(&mut stream, frame)?;
                if response.peer_closed {
                    debug!(addr = %self.plc_addr, "peer closed connection after response");
                } else {
                    self.stream = Some(stream);
                }
                Ok(response.text)
            }
            ConnectionMode::PerCall => {
                let mut stream = self.open()?;
                let response = self.send_and_collect(&mut stream, frame);
                let _ = stream.shutdown(Shutdown::Both);
                Ok(response?.text)
            }
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            debug!(addr = %self.plc_addr, "connection closed");
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("plc_addr", &self.plc_addr)
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .field("linger", &self.linger)
            .field("connected", &self.stream.is_some())
            .finish()
    }
}

struct Response {
    text: String,
    peer_closed: bool,
}

/// Reads one response: a blocking first receive bounded by `timeout`, then
/// further receives for as long as each arrives within `linger`.
///
/// Draining stops once `timeout` has elapsed since the first chunk or
/// `MAX_RESPONSE_LEN` bytes are held, whichever comes first.
fn collect_response(stream: &mut TcpStream, timeout: Duration, linger: Duration) -> Result<Response> {
    let mut buffer = [0u8; RECV_BUFFER_SIZE];
    let mut data = Vec::new();

    stream.set_read_timeout(Some(timeout))?;
    match stream.read(&mut buffer) {
        Ok(0) => return Err(McError::EmptyResponse),
        Ok(size) => data.extend_from_slice(&buffer[..size]),
        Err(e) if is_timeout(&e) => return Err(McError::Timeout),
        Err(e) => return Err(McError::Transport(e)),
    }

    let mut peer_closed = false;
    if !linger.is_zero() {
        let deadline = Instant::now() + timeout;
        while data.len() < MAX_RESPONSE_LEN {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!(collected = data.len(), "drain deadline reached");
                break;
            }
            stream.set_read_timeout(Some(linger.min(remaining)))?;
            match stream.read(&mut buffer) {
                Ok(0) => {
                    peer_closed = true;
                    break;
                }
                Ok(size) => data.extend_from_slice(&buffer[..size]),
                Err(e) if is_timeout(&e) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!(error = %e, "receive failed while draining, keeping collected data");
                    peer_closed = true;
                    break;
                }
            }
        }
        stream.set_read_timeout(Some(timeout))?;
    }

    let text = decode_ascii(&data);
    if text.is_empty() {
        return Err(McError::EmptyResponse);
    }

    Ok(Response { text, peer_closed })
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

/// Keeps ASCII bytes only and trims surrounding whitespace.
fn decode_ascii(data: &[u8]) -> String {
    let ascii: String = data
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect();
    ascii.trim().to_string()
}
