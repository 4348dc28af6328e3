//! Command execution with points-mode detection and reconnect-and-resend.
//!
//! The [`Executor`] turns one [`BatchCommand`] into one validated response
//! payload. Per `(command, device)` it tracks which point-count encoding the
//! adapter accepts:
//!
//! ```text
//! Unknown --standard ok--> Known(Standard)
//! Unknown --standard err, swap ok--> Known(Swapped)
//! Unknown --both err--> CommandFailed
//! Known(m) --m err--> Unknown (re-detected within the same call)
//! ```
//!
//! Independently, every frame gets a single transport-level retry: when the
//! socket fails (not when the PLC answers with an error end code) the
//! connection is closed, reopened and the identical frame is sent again.

use tracing::{debug, warn};

use crate::cache::PointsModeCache;
use crate::command::{BatchCommand, PointsMode};
use crate::error::{McError, Result};
use crate::response::McResponse;
use crate::transport::Transport;

const WIRE_TARGET: &str = "melsec_mc1e::wire";

/// Counters describing what the executor has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeStats {
    /// Frames handed to the transport, retries included.
    pub frames_sent: u64,
    /// Reconnect-and-resend recoveries triggered by transport faults.
    pub reconnects: u64,
    /// Frames sent while detecting the points mode of an unknown key.
    pub detections: u64,
    /// Cached points modes dropped after they stopped working.
    pub invalidations: u64,
}

/// Runs batch commands over a [`Transport`], learning points modes as it goes.
#[derive(Debug)]
pub struct Executor<T: Transport> {
    transport: T,
    cache: PointsModeCache,
    stats: ExchangeStats,
    trace: bool,
}

impl<T: Transport> Executor<T> {
    /// Creates an executor with an empty points-mode cache.
    pub fn new(transport: T) -> Self {
        Self::with_cache(transport, PointsModeCache::new())
    }

    /// Creates an executor seeded with previously learned points modes.
    pub fn with_cache(transport: T, cache: PointsModeCache) -> Self {
        Self {
            transport,
            cache,
            stats: ExchangeStats::default(),
            trace: false,
        }
    }

    /// Enables or disables per-frame wire tracing.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Executes one command and returns its end-code-validated payload.
    ///
    /// # Errors
    ///
    /// Returns `McError::CommandFailed` wrapping the last error when neither
    /// points mode succeeds.
    pub fn execute(&mut self, cmd: &BatchCommand) -> Result<String> {
        let (command, device) = (cmd.command(), cmd.device());

        if let Some(mode) = self.cache.get(command, device) {
            match self.attempt(cmd, mode) {
                Ok(payload) => return Ok(payload),
                Err(e) => {
                    warn!(%command, %device, %mode, error = %e, "cached points mode failed, re-detecting");
                    self.cache.invalidate(command, device);
                    self.stats.invalidations += 1;
                }
            }
        }

        let [first, second] = PointsMode::DETECTION_ORDER;
        match self.try_mode(cmd, first) {
            Ok(payload) => Ok(payload),
            Err(e) => {
                if self.trace {
                    debug!(target: WIRE_TARGET, %command, %device, mode = %first, error = %e, "encoding rejected");
                }
                self.try_mode(cmd, second).map_err(McError::command_failed)
            }
        }
    }

    fn try_mode(&mut self, cmd: &BatchCommand, mode: PointsMode) -> Result<String> {
        self.stats.detections += 1;
        let payload = self.attempt(cmd, mode)?;
        debug!(command = %cmd.command(), device = %cmd.device(), %mode, "points mode detected");
        self.cache.set(cmd.command(), cmd.device(), mode);
        Ok(payload)
    }

    fn attempt(&mut self, cmd: &BatchCommand, mode: PointsMode) -> Result<String> {
        let frame = cmd.to_frame(mode);
        let raw = self.exchange_with_retry(&frame)?;
        Ok(McResponse::parse(&raw)?.payload)
    }

    fn exchange_with_retry(&mut self, frame: &str) -> Result<String> {
        match self.send(frame) {
            Err(e) if e.is_transport_fault() => {
                warn!(error = %e, "transport fault, reconnecting and resending");
                self.transport.close();
                self.stats.reconnects += 1;
                self.send(frame).inspect_err(|_| self.transport.close())
            }
            result => result,
        }
    }

    fn send(&mut self, frame: &str) -> Result<String> {
        if self.trace {
            debug!(target: WIRE_TARGET, frame, "TX");
        }
        self.stats.frames_sent += 1;
        let raw = self.transport.exchange(frame)?;
        if self.trace {
            debug!(target: WIRE_TARGET, response = %raw, "RX");
        }
        Ok(raw)
    }

    /// Returns the learned points modes.
    pub fn points_modes(&self) -> &PointsModeCache {
        &self.cache
    }

    /// Returns the learned points modes for modification.
    pub fn points_modes_mut(&mut self) -> &mut PointsModeCache {
        &mut self.cache
    }

    /// Returns the exchange counters.
    pub fn stats(&self) -> ExchangeStats {
        self.stats
    }

    /// Returns a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
