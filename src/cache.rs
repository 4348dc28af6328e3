//! Learned point-count encodings.
//!
//! [`PointsModeCache`] remembers, per `(command, device)` pair, which
//! [`PointsMode`] the adapter last accepted. Entries are added on the first
//! successful exchange and removed when a cached encoding stops working.
//! The cache lives in memory only and belongs to one client.
//!
//! # Example
//!
//! ```
//! use melsec_mc1e::{Command, Device, PointsMode, PointsModeCache};
//!
//! let mut cache = PointsModeCache::new();
//! assert_eq!(cache.get(Command::WriteBits, Device::Y), None);
//!
//! cache.set(Command::WriteBits, Device::Y, PointsMode::Swapped);
//! assert_eq!(cache.get(Command::WriteBits, Device::Y), Some(PointsMode::Swapped));
//!
//! cache.invalidate(Command::WriteBits, Device::Y);
//! assert!(cache.is_empty());
//! ```

use std::collections::HashMap;

use crate::command::{Command, PointsMode};
use crate::device::Device;

/// Map from `(command, device)` to the point-count encoding that worked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointsModeCache {
    modes: HashMap<(Command, Device), PointsMode>,
}

impl PointsModeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the learned mode for a key, if any.
    pub fn get(&self, command: Command, device: Device) -> Option<PointsMode> {
        self.modes.get(&(command, device)).copied()
    }

    /// Records the mode that succeeded for a key.
    pub fn set(&mut self, command: Command, device: Device, mode: PointsMode) {
        self.modes.insert((command, device), mode);
    }

    /// Forgets a key. Returns the mode that was cached.
    pub fn invalidate(&mut self, command: Command, device: Device) -> Option<PointsMode> {
        self.modes.remove(&(command, device))
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.modes.clear();
    }

    /// Number of learned keys.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Returns `true` if nothing has been learned yet.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Iterates over learned entries.
    pub fn iter(&self) -> impl Iterator<Item = ((Command, Device), PointsMode)> + '_ {
        self.modes.iter().map(|(key, mode)| (*key, *mode))
    }
}
