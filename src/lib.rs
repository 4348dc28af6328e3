//! # MELSEC MC Protocol (1E frame) Library
//!
//! A Rust client for Mitsubishi FX-series PLCs behind an Ethernet adapter
//! (FX3U-ENET-L and compatibles) using the MC protocol A-compatible 1E frame
//! in ASCII mode.
//!
//! The client performs batch reads and writes of three device families:
//!
//! | Device | Description | Unit | Read | Write |
//! |--------|-------------|------|:----:|:-----:|
//! | [`Device::D`] | Data registers | word (16 bit) | ✓ | ✓ |
//! | [`Device::X`] | Inputs | bit | ✓ | ✗ |
//! | [`Device::Y`] | Outputs | bit | ✓ | ✓ |
//!
//! ## Features
//!
//! - **Points-mode detection** - adapters disagree on the byte order of the
//!   point-count field. The client tries the documented big-endian form first,
//!   falls back to the byte-swapped form, and remembers what worked per
//!   `(command, device)`
//! - **Connection recovery** - a socket fault triggers one reconnect and resend
//!   of the identical frame
//! - **Fragment tolerant** - responses split over several TCP segments are
//!   reassembled
//! - **No panics** - all errors returned as `Result<T, McError>`
//!
//! ## Quick Start
//!
//! ```no_run
//! use melsec_mc1e::{Client, ClientConfig};
//! use std::net::Ipv4Addr;
//!
//! fn main() -> melsec_mc1e::Result<()> {
//!     let config = ClientConfig::new(Ipv4Addr::new(192, 168, 3, 254));
//!     let mut client = Client::new(config)?;
//!
//!     // X0..X7
//!     let inputs = client.read_x(0, 8)?;
//!     println!("X0-X7 = {:?}", inputs);
//!
//!     // Y0..Y3
//!     client.write_y(0, &[true, false, true, false])?;
//!
//!     // D0..D9, then D5 = 26
//!     let words = client.read_d(0, 10)?;
//!     println!("D0-D9 = {:?}", words);
//!     client.write_d_word(5, 26)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use melsec_mc1e::{Client, ClientConfig, McError};
//! use std::net::Ipv4Addr;
//!
//! let mut client = Client::new(ClientConfig::new(Ipv4Addr::new(192, 168, 3, 254)))?;
//!
//! match client.read_d(100, 10) {
//!     Ok(data) => println!("Data: {:?}", data),
//!     Err(McError::Timeout) => println!("Communication timeout"),
//!     Err(McError::CommandFailed { source }) => println!("PLC rejected both encodings: {}", source),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok::<(), McError>(())
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use melsec_mc1e::{BitPadding, ClientConfig, ConnectionMode};
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new(Ipv4Addr::new(192, 168, 3, 254))
//!     .with_port(5000)                          // default: 1027
//!     .with_timeout(Duration::from_secs(3))     // default: 1.5s
//!     .with_mode(ConnectionMode::PerCall)       // default: Persistent
//!     .with_bit_padding(BitPadding::Unpadded)   // default: PadToWord
//!     .with_trace(true);                        // log frames under `melsec_mc1e::wire`
//! ```
//!
//! ## Logging
//!
//! The library logs through [`tracing`] and never installs a subscriber.
//! Connection events are emitted at `debug`/`warn`; frame dumps only when
//! [`ClientConfig::trace`] is enabled.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod cache;
mod client;
mod command;
mod device;
mod error;
mod executor;
mod header;
#[cfg(test)]
mod mock;
mod response;
mod transport;
pub mod utils;

// Public re-exports
pub use cache::PointsModeCache;
pub use client::{Client, ClientConfig};
pub use command::{
    build_frame, encode_bits, encode_words, BatchCommand, BitPadding, Command, PointsMode,
    MAX_POINTS_PER_COMMAND,
};
pub use device::{Device, DeviceUnit};
pub use error::{McError, Result};
pub use executor::{ExchangeStats, Executor};
pub use header::{
    RequestHeader, DATA_OFFSET, DEFAULT_MONITOR_TIMER, DEFAULT_PC_NUMBER, DEVICE_CODE_OFFSET,
    HEAD_ADDRESS_OFFSET, POINT_COUNT_OFFSET, REQUEST_HEADER_LEN, RESPONSE_HEADER_LEN,
};
pub use response::{decode_bits, decode_words, McResponse, END_CODE_OK};
pub use transport::{
    ConnectionMode, TcpTransport, Transport, DEFAULT_LINGER, DEFAULT_MC_PORT, DEFAULT_TIMEOUT,
    RECV_BUFFER_SIZE,
};
