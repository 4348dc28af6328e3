//! 1E request header and fixed field layout.
//!
//! Every A-compatible 1E ASCII request starts with the same fixed-width
//! header followed by the device code, head address and point count:
//!
//! | Offset | Width | Field | Value |
//! |-------:|------:|-------|-------|
//! | 0 | 2 | Command | `00`..`03` |
//! | 2 | 2 | PC number | `FF` (own station) |
//! | 4 | 4 | Monitor timer | `000A` (10 x 250 ms) |
//! | 8 | 4 | Device code | `4420` / `5820` / `5920` |
//! | 12 | 8 | Head address | 32-bit hex |
//! | 20 | 4 | Point count | big-endian or byte-swapped hex |
//! | 24 | .. | Data | write commands only |
//!
//! # Example
//!
//! ```
//! use melsec_mc1e::{Command, RequestHeader};
//!
//! let header = RequestHeader::new(Command::ReadWords);
//! assert_eq!(header.to_ascii(), "01FF000A");
//! ```

use crate::command::Command;
use crate::error::{McError, Result};

/// PC number addressing the station the Ethernet adapter is mounted on.
pub const DEFAULT_PC_NUMBER: u8 = 0xFF;

/// ACPU monitoring timer in 250 ms units.
pub const DEFAULT_MONITOR_TIMER: u16 = 0x000A;

/// Length of the command + PC number + monitor timer prefix.
pub const REQUEST_HEADER_LEN: usize = 8;

/// Offset of the device code field.
pub const DEVICE_CODE_OFFSET: usize = REQUEST_HEADER_LEN;

/// Offset of the head address field.
pub const HEAD_ADDRESS_OFFSET: usize = DEVICE_CODE_OFFSET + 4;

/// Offset of the point count field.
pub const POINT_COUNT_OFFSET: usize = HEAD_ADDRESS_OFFSET + 8;

/// Offset of the data field (write commands).
pub const DATA_OFFSET: usize = POINT_COUNT_OFFSET + 4;

/// Response subheader + end code length.
pub const RESPONSE_HEADER_LEN: usize = 4;

/// Fixed 1E request prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    /// Command code.
    pub command: Command,
    /// PC number (`FF` for the local station).
    pub pc_number: u8,
    /// Monitor timer.
    pub monitor_timer: u16,
}

impl RequestHeader {
    /// Creates a header for the local station with the default monitor timer.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            pc_number: DEFAULT_PC_NUMBER,
            monitor_timer: DEFAULT_MONITOR_TIMER,
        }
    }

    /// Serializes the header as 8 uppercase ASCII hex characters.
    pub fn to_ascii(self) -> String {
        format!(
            "{:02X}{:02X}{:04X}",
            self.command.code(),
            self.pc_number,
            self.monitor_timer
        )
    }

    /// Parses the header prefix of a request frame.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidParameter` if the frame is too short, a
    /// field is not hex, or the command code is not one of `00`..`03`.
    pub fn from_ascii(frame: &str) -> Result<Self> {
        let prefix = frame.get(..REQUEST_HEADER_LEN).ok_or_else(|| {
            McError::invalid_parameter(
                "frame",
                format!("expected at least {REQUEST_HEADER_LEN} chars"),
            )
        })?;

        let hex_field = |range: std::ops::Range<usize>, name: &str| {
            prefix
                .get(range)
                .and_then(|field| u16::from_str_radix(field, 16).ok())
                .ok_or_else(|| McError::invalid_parameter(name.to_string(), "not hex"))
        };

        let code = hex_field(0..2, "command")?;
        let command = u8::try_from(code)
            .ok()
            .and_then(Command::from_code)
            .ok_or_else(|| {
                McError::invalid_parameter("command", format!("unknown code 0x{code:02X}"))
            })?;

        Ok(Self {
            command,
            pc_number: hex_field(2..4, "pc_number")? as u8,
            monitor_timer: hex_field(4..8, "monitor_timer")?,
        })
    }
}
