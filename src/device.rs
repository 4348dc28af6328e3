//! Device space definitions for the MC 1E protocol.
//!
//! This module defines the [`Device`] enum which represents the PLC device
//! spaces this client can address. Each device has a fixed 4-character
//! ASCII device code used in 1E frames and an access unit.
//!
//! # Devices Overview
//!
//! | Device | Description | Code | Unit | Writable |
//! |--------|-------------|------|------|:--------:|
//! | D | Data registers | `4420` | word | ✓ |
//! | X | Inputs | `5820` | bit | ✗ |
//! | Y | Outputs | `5920` | bit | ✓ |
//!
//! # Example
//!
//! ```
//! use melsec_mc1e::{Device, DeviceUnit};
//!
//! assert_eq!(Device::D.code(), "4420");
//! assert_eq!(Device::X.unit(), DeviceUnit::Bit);
//! assert!(!Device::X.is_writable());
//! assert_eq!(Device::Y.to_string(), "Y");
//! ```

/// Access width of a device space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceUnit {
    /// One point is one bit, transferred as a single `'0'`/`'1'` character.
    Bit,
    /// One point is one 16-bit word, transferred as 4 hex characters.
    Word,
}

impl DeviceUnit {
    /// Number of payload characters one point occupies on the wire.
    pub fn chars_per_point(self) -> usize {
        match self {
            DeviceUnit::Bit => 1,
            DeviceUnit::Word => 4,
        }
    }
}

/// Device spaces addressable through the 1E frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// D - data registers (word).
    D,
    /// X - inputs (bit, read-only).
    X,
    /// Y - outputs (bit).
    Y,
}

impl Device {
    /// Returns the 4-character 1E device code.
    pub fn code(self) -> &'static str {
        match self {
            Device::D => "4420",
            Device::X => "5820",
            Device::Y => "5920",
        }
    }

    /// Returns the access unit of this device.
    pub fn unit(self) -> DeviceUnit {
        match self {
            Device::D => DeviceUnit::Word,
            Device::X | Device::Y => DeviceUnit::Bit,
        }
    }

    /// Returns whether batch writes are permitted. X inputs are driven by
    /// field wiring and are never written.
    pub fn is_writable(self) -> bool {
        !matches!(self, Device::X)
    }

    /// Looks a device up by its 1E device code (case-insensitive).
    ///
    /// ```
    /// use melsec_mc1e::Device;
    ///
    /// assert_eq!(Device::from_code("5920"), Some(Device::Y));
    /// assert_eq!(Device::from_code("4D20"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        [Device::D, Device::X, Device::Y]
            .into_iter()
            .find(|device| device.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::D => write!(f, "D"),
            Device::X => write!(f, "X"),
            Device::Y => write!(f, "Y"),
        }
    }
}
