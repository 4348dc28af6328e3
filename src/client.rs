//! High-level MC 1E client for FX-series PLCs.
//!
//! This module provides the [`Client`] struct, the primary interface for
//! batch reads and writes against D, X and Y devices.
//!
//! # Overview
//!
//! The client handles:
//! - Device validation (bit operations on X/Y, word operations on D, no writes to X)
//! - Frame construction and response decoding
//! - Points-mode detection and caching (through the [`Executor`])
//! - One reconnect-and-resend per frame on transport faults
//!
//! # Example
//!
//! ```no_run
//! use melsec_mc1e::{Client, ClientConfig, Device};
//! use std::net::Ipv4Addr;
//!
//! let mut client = Client::new(ClientConfig::new(Ipv4Addr::new(192, 168, 3, 254)))?;
//!
//! // X0..X7
//! let inputs = client.read_bits(Device::X, 0, 8)?;
//!
//! // Y0 = ON, Y1 = OFF
//! client.write_bits(Device::Y, 0, &[true, false])?;
//!
//! // D0..D9, then D5 = 26
//! let words = client.read_words(Device::D, 0, 10)?;
//! client.write_word(Device::D, 5, 26)?;
//! # Ok::<(), melsec_mc1e::McError>(())
//! ```
//!
//! # Thread Safety
//!
//! Every operation takes `&mut self`: one call is in flight at a time and
//! calls complete in issue order. Callers sharing a client across threads
//! must wrap it in their own lock. Separate clients share nothing.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::cache::PointsModeCache;
use crate::command::{BatchCommand, BitPadding};
use crate::device::Device;
use crate::error::{McError, Result};
use crate::executor::{ExchangeStats, Executor};
use crate::response::{decode_bits, decode_words};
use crate::transport::{
    ConnectionMode, TcpTransport, Transport, DEFAULT_LINGER, DEFAULT_MC_PORT, DEFAULT_TIMEOUT,
};

/// Default number of connect attempts.
const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;

/// Default sleep between connect attempts.
const DEFAULT_CONNECT_BACKOFF: Duration = Duration::from_millis(50);

/// Configuration for creating an MC client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// PLC address and MC port.
    pub plc_addr: SocketAddr,
    /// Timeout for connect, send and the first receive of each exchange.
    pub timeout: Duration,
    /// Idle window for draining trailing response fragments.
    pub linger: Duration,
    /// Connection lifecycle.
    pub mode: ConnectionMode,
    /// Handling of odd-length bit-write data.
    pub bit_padding: BitPadding,
    /// Total connect attempts before giving up (default 3).
    pub connect_attempts: u32,
    /// Sleep between connect attempts.
    pub connect_backoff: Duration,
    /// Log every frame sent and received.
    pub trace: bool,
}

impl ClientConfig {
    /// Creates a configuration with the default port (1027), timeout and a
    /// persistent connection.
    ///
    /// # Example
    ///
    /// ```
    /// use melsec_mc1e::ClientConfig;
    /// use std::net::Ipv4Addr;
    ///
    /// let config = ClientConfig::new(Ipv4Addr::new(192, 168, 3, 254));
    /// assert_eq!(config.plc_addr.port(), 1027);
    /// ```
    pub fn new(plc_ip: Ipv4Addr) -> Self {
        Self::from_socket_addr(SocketAddr::from((plc_ip, DEFAULT_MC_PORT)))
    }

    /// Creates a configuration for an explicit socket address.
    pub fn from_socket_addr(plc_addr: SocketAddr) -> Self {
        Self {
            plc_addr,
            timeout: DEFAULT_TIMEOUT,
            linger: DEFAULT_LINGER,
            mode: ConnectionMode::Persistent,
            bit_padding: BitPadding::default(),
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_backoff: DEFAULT_CONNECT_BACKOFF,
            trace: false,
        }
    }

    /// Sets a custom MC port (default is 1027).
    pub fn with_port(mut self, port: u16) -> Self {
        self.plc_addr.set_port(port);
        self
    }

    /// Sets a custom timeout (default is 1.5 seconds). Must be non-zero;
    /// [`Client::new`] rejects a zero timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use melsec_mc1e::ClientConfig;
    /// use std::net::Ipv4Addr;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new(Ipv4Addr::new(192, 168, 3, 254))
    ///     .with_timeout(Duration::from_secs(3));
    /// ```
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the fragment drain window (default is 100 ms).
    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    /// Sets the connection lifecycle (default is persistent).
    pub fn with_mode(mut self, mode: ConnectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the odd-length bit-write policy (default pads to a word).
    pub fn with_bit_padding(mut self, padding: BitPadding) -> Self {
        self.bit_padding = padding;
        self
    }

    /// Retries connects `attempts` times in total with `backoff` in between.
    pub fn with_connect_retries(mut self, attempts: u32, backoff: Duration) -> Self {
        self.connect_attempts = attempts;
        self.connect_backoff = backoff;
        self
    }

    /// Enables or disables per-frame tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Checks the settings a connection depends on.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidParameter` for a zero timeout or zero
    /// connect attempts.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(McError::invalid_parameter("timeout", "must be greater than zero"));
        }
        if self.connect_attempts == 0 {
            return Err(McError::invalid_parameter("connect_attempts", "must be at least 1"));
        }
        Ok(())
    }

    /// Builds the TCP transport described by this configuration.
    pub fn transport(&self) -> TcpTransport {
        TcpTransport::new(self.plc_addr, self.timeout, self.mode)
            .with_linger(self.linger)
            .with_connect_retries(self.connect_attempts, self.connect_backoff)
    }
}

/// MC 1E client for FX-series PLCs.
///
/// Generic over its [`Transport`] so tests can substitute a simulator;
/// [`Client::new`] uses TCP.
#[derive(Debug)]
pub struct Client<T: Transport = TcpTransport> {
    executor: Executor<T>,
    bit_padding: BitPadding,
}

impl Client<TcpTransport> {
    /// Creates a TCP client. No connection is made until the first call
    /// (or [`connect`](Client::connect)).
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidParameter` if the configuration fails
    /// [`ClientConfig::validate`].
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = config.transport();
        Ok(Self::from_transport(transport)
            .with_bit_padding(config.bit_padding)
            .with_trace(config.trace))
    }

    /// Creates a TCP client and, in persistent mode, connects right away.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidParameter` for an invalid configuration and
    /// `McError::Transport` if the connection cannot be opened.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.connect()?;
        Ok(client)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over an arbitrary transport with default settings.
    pub fn from_transport(transport: T) -> Self {
        Self {
            executor: Executor::new(transport),
            bit_padding: BitPadding::default(),
        }
    }

    /// Sets the odd-length bit-write policy.
    pub fn with_bit_padding(mut self, padding: BitPadding) -> Self {
        self.bit_padding = padding;
        self
    }

    /// Enables or disables per-frame tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.executor.set_trace(trace);
        self
    }

    /// Seeds the client with points modes learned by another client.
    pub fn with_points_modes(mut self, cache: PointsModeCache) -> Self {
        *self.executor.points_modes_mut() = cache;
        self
    }

    /// Opens the persistent connection now instead of on first use.
    pub fn connect(&mut self) -> Result<()> {
        self.executor.transport_mut().connect()
    }

    /// Closes the connection, if one is open. The next call reconnects.
    pub fn close(&mut self) {
        self.executor.transport_mut().close();
    }

    /// Returns whether a connection is currently held open.
    pub fn is_connected(&self) -> bool {
        self.executor.transport().is_connected()
    }

    /// Reads `count` consecutive bits starting at `head`.
    ///
    /// A count of 0 returns an empty vector without any I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `device` is not a bit device (X or Y)
    /// - `count` exceeds 65535
    /// - Communication fails or the PLC returns an error end code
    /// - The response carries fewer than `count` points
    pub fn read_bits(&mut self, device: Device, head: u32, count: usize) -> Result<Vec<bool>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let cmd = BatchCommand::read_bits(device, head, count)?;
        let payload = self.executor.execute(&cmd)?;
        decode_bits(&payload, count)
    }

    /// Writes consecutive bits starting at `head`. Empty `values` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if `device` is not a writable bit device (Y), or
    /// communication fails or the PLC returns an error end code.
    pub fn write_bits(&mut self, device: Device, head: u32, values: &[bool]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let cmd = BatchCommand::write_bits(device, head, values, self.bit_padding)?;
        self.executor.execute(&cmd)?;
        Ok(())
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, device: Device, head: u32, value: bool) -> Result<()> {
        self.write_bits(device, head, &[value])
    }

    /// Reads `count` consecutive words starting at `head`.
    ///
    /// A count of 0 returns an empty vector without any I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `device` is not a word device (D)
    /// - `count` exceeds 65535
    /// - Communication fails or the PLC returns an error end code
    /// - The response carries fewer than `count` words
    pub fn read_words(&mut self, device: Device, head: u32, count: usize) -> Result<Vec<u16>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let cmd = BatchCommand::read_words(device, head, count)?;
        let payload = self.executor.execute(&cmd)?;
        decode_words(&payload, count)
    }

    /// Writes consecutive words starting at `head`. Empty `values` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if `device` is not a word device (D), or
    /// communication fails or the PLC returns an error end code.
    pub fn write_words(&mut self, device: Device, head: u32, values: &[u16]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let cmd = BatchCommand::write_words(device, head, values)?;
        self.executor.execute(&cmd)?;
        Ok(())
    }

    /// Writes a single word.
    pub fn write_word(&mut self, device: Device, head: u32, value: u16) -> Result<()> {
        self.write_words(device, head, &[value])
    }

    /// Reads X inputs.
    pub fn read_x(&mut self, head: u32, count: usize) -> Result<Vec<bool>> {
        self.read_bits(Device::X, head, count)
    }

    /// Reads Y outputs.
    pub fn read_y(&mut self, head: u32, count: usize) -> Result<Vec<bool>> {
        self.read_bits(Device::Y, head, count)
    }

    /// Writes Y outputs.
    pub fn write_y(&mut self, head: u32, values: &[bool]) -> Result<()> {
        self.write_bits(Device::Y, head, values)
    }

    /// Writes a single Y output.
    pub fn write_y_bit(&mut self, head: u32, value: bool) -> Result<()> {
        self.write_bit(Device::Y, head, value)
    }

    /// Reads D registers.
    pub fn read_d(&mut self, head: u32, count: usize) -> Result<Vec<u16>> {
        self.read_words(Device::D, head, count)
    }

    /// Writes D registers.
    pub fn write_d(&mut self, head: u32, values: &[u16]) -> Result<()> {
        self.write_words(Device::D, head, values)
    }

    /// Writes a single D register.
    pub fn write_d_word(&mut self, head: u32, value: u16) -> Result<()> {
        self.write_word(Device::D, head, value)
    }

    /// Returns the points modes learned so far.
    pub fn points_modes(&self) -> &PointsModeCache {
        self.executor.points_modes()
    }

    /// Returns the exchange counters (frames, reconnects, detections).
    pub fn stats(&self) -> ExchangeStats {
        self.executor.stats()
    }

    /// Returns a reference to the transport.
    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// Returns a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        self.executor.transport_mut()
    }
}
