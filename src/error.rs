//! Error types for the MC 1E protocol client.

use std::io;
use thiserror::Error;

use crate::device::Device;

/// Result type alias for MC operations.
pub type Result<T> = std::result::Result<T, McError>;

/// Errors that can occur during MC communication.
#[derive(Debug, Error)]
pub enum McError {
    /// Socket-level failure (connect, send or receive).
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    /// No data received within the configured deadline.
    #[error("Communication timeout")]
    Timeout,

    /// The PLC closed the exchange without sending any usable ASCII.
    #[error("Empty response from PLC")]
    EmptyResponse,

    /// Response shorter than the 4-character subheader + end code.
    #[error("Malformed response: {raw:?}")]
    MalformedResponse {
        /// Raw response text as received.
        raw: String,
    },

    /// PLC returned a non-"00" end code.
    #[error("PLC end code 0x{end_code} (raw response {raw:?})")]
    ProtocolError {
        /// End code characters from the response.
        end_code: String,
        /// Raw response text, kept for diagnostics.
        raw: String,
    },

    /// End code was "00" but the payload is shorter than the request implies.
    #[error("Insufficient payload: expected {expected} chars, got {actual} ({payload:?})")]
    InsufficientPayload {
        /// Number of payload characters required.
        expected: usize,
        /// Number of payload characters received.
        actual: usize,
        /// The short payload.
        payload: String,
    },

    /// Both points-mode encodings were tried and neither succeeded.
    #[error("Command failed in both points modes: {source}")]
    CommandFailed {
        /// The last error observed.
        #[source]
        source: Box<McError>,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// The device space does not support the requested operation.
    #[error("Device {device} does not support {operation}")]
    UnsupportedDevice {
        /// Device the call targeted.
        device: Device,
        /// Operation that was attempted.
        operation: &'static str,
    },
}

impl McError {
    /// Creates a new `ProtocolError` from an end code and the raw response.
    ///
    /// # Example
    ///
    /// ```
    /// use melsec_mc1e::McError;
    ///
    /// let err = McError::protocol_error("05", "8005");
    /// ```
    pub fn protocol_error(end_code: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::ProtocolError {
            end_code: end_code.into(),
            raw: raw.into(),
        }
    }

    /// Creates a new `MalformedResponse` error.
    pub fn malformed_response(raw: impl Into<String>) -> Self {
        Self::MalformedResponse { raw: raw.into() }
    }

    /// Creates a new `InsufficientPayload` error.
    pub fn insufficient_payload(expected: usize, payload: &str) -> Self {
        Self::InsufficientPayload {
            expected,
            actual: payload.len(),
            payload: payload.to_string(),
        }
    }

    /// Wraps the last error of an exhausted points-mode detection.
    pub fn command_failed(last: McError) -> Self {
        Self::CommandFailed {
            source: Box::new(last),
        }
    }

    /// Creates a new `InvalidParameter` error.
    ///
    /// # Example
    ///
    /// ```
    /// use melsec_mc1e::McError;
    ///
    /// let err = McError::invalid_parameter("count", "must not exceed 65535");
    /// ```
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `UnsupportedDevice` error.
    pub fn unsupported_device(device: Device, operation: &'static str) -> Self {
        Self::UnsupportedDevice { device, operation }
    }

    /// Returns `true` for faults at the socket layer, which warrant a
    /// reconnect and resend. PLC end codes and decode errors return `false`.
    pub fn is_transport_fault(&self) -> bool {
        matches!(
            self,
            McError::Transport(_) | McError::Timeout | McError::EmptyResponse
        )
    }
}
