//! In-memory PLC used by the unit tests.
//!
//! [`SimulatedPlc`] implements [`Transport`] by interpreting 1E request
//! frames against D/X/Y memory. Each `(command, device)` key accepts one
//! point-count encoding (standard big-endian unless configured otherwise); a frame in
//! the other encoding decodes to a wrong count and is rejected the way a
//! real adapter would. Faults queued with [`SimulatedPlc::inject`] replace
//! the next responses.

use std::collections::{HashMap, VecDeque};
use std::io;

use crate::command::{Command, PointsMode};
use crate::device::Device;
use crate::error::{McError, Result};
use crate::header::{
    RequestHeader, DATA_OFFSET, DEVICE_CODE_OFFSET, HEAD_ADDRESS_OFFSET, POINT_COUNT_OFFSET,
};
use crate::transport::Transport;

const D_POINTS: usize = 1024;
const BIT_POINTS: usize = 256;
const END_CODE_OUT_OF_RANGE: &str = "56";

/// A queued fault for the next exchange.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fault {
    /// Fail the exchange at socket level.
    Transport(io::ErrorKind),
    /// Answer with this end code.
    EndCode(&'static str),
    /// Answer with this literal text.
    Raw(&'static str),
}

#[derive(Debug)]
pub(crate) struct SimulatedPlc {
    d: Vec<u16>,
    x: Vec<bool>,
    y: Vec<bool>,
    accepted: HashMap<(Command, Device), PointsMode>,
    faults: VecDeque<Fault>,
    frames: Vec<String>,
    connected: bool,
    connects: usize,
    closes: usize,
}

impl SimulatedPlc {
    pub(crate) fn new() -> Self {
        Self {
            d: vec![0; D_POINTS],
            x: vec![false; BIT_POINTS],
            y: vec![false; BIT_POINTS],
            accepted: HashMap::new(),
            faults: VecDeque::new(),
            frames: Vec::new(),
            connected: false,
            connects: 0,
            closes: 0,
        }
    }

    pub(crate) fn accepting(mut self, command: Command, device: Device, mode: PointsMode) -> Self {
        self.set_accepted(command, device, mode);
        self
    }

    pub(crate) fn set_accepted(&mut self, command: Command, device: Device, mode: PointsMode) {
        self.accepted.insert((command, device), mode);
    }

    pub(crate) fn inject(&mut self, fault: Fault) {
        self.faults.push_back(fault);
    }

    pub(crate) fn frames(&self) -> &[String] {
        &self.frames
    }

    pub(crate) fn reset_frames(&mut self) {
        self.frames.clear();
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes
    }

    pub(crate) fn memory_word(&self, address: usize) -> u16 {
        self.d[address]
    }

    pub(crate) fn set_input(&mut self, address: usize, value: bool) {
        self.x[address] = value;
    }

    fn respond(&mut self, frame: &str) -> String {
        let Ok(header) = RequestHeader::from_ascii(frame) else {
            return "FF50".to_string();
        };
        let command = header.command;
        let subheader = format!("{:02X}", command.code() | 0x80);

        match self.apply(command, frame) {
            Ok(payload) => format!("{subheader}00{payload}"),
            Err(end_code) => format!("{subheader}{end_code}"),
        }
    }

    fn apply(&mut self, command: Command, frame: &str) -> std::result::Result<String, &'static str> {
        let field = |range: std::ops::Range<usize>| frame.get(range).ok_or(END_CODE_OUT_OF_RANGE);

        let device = Device::from_code(field(DEVICE_CODE_OFFSET..HEAD_ADDRESS_OFFSET)?)
            .ok_or(END_CODE_OUT_OF_RANGE)?;
        let head = u32::from_str_radix(field(HEAD_ADDRESS_OFFSET..POINT_COUNT_OFFSET)?, 16)
            .map_err(|_| END_CODE_OUT_OF_RANGE)? as usize;
        let raw_count = u16::from_str_radix(field(POINT_COUNT_OFFSET..DATA_OFFSET)?, 16)
            .map_err(|_| END_CODE_OUT_OF_RANGE)?;
        let mode = self
            .accepted
            .get(&(command, device))
            .copied()
            .unwrap_or(PointsMode::Standard);
        let count = match mode {
            PointsMode::Standard => raw_count,
            PointsMode::Swapped => raw_count.swap_bytes(),
        } as usize;
        let data = frame.get(DATA_OFFSET..).unwrap_or("");

        let size = match device {
            Device::D => self.d.len(),
            Device::X => self.x.len(),
            Device::Y => self.y.len(),
        };
        if count == 0 || head + count > size {
            return Err(END_CODE_OUT_OF_RANGE);
        }

        match command {
            Command::ReadBits => {
                let bits = if device == Device::X { &self.x } else { &self.y };
                let mut payload: String = bits[head..head + count]
                    .iter()
                    .map(|&b| if b { '1' } else { '0' })
                    .collect();
                if count % 2 == 1 {
                    payload.push('0');
                }
                Ok(payload)
            }
            Command::ReadWords => Ok(self.d[head..head + count]
                .iter()
                .map(|w| format!("{w:04X}"))
                .collect()),
            Command::WriteBits => {
                if data.len() != count && data.len() != count + 1 {
                    return Err(END_CODE_OUT_OF_RANGE);
                }
                let bits = if device == Device::X { &mut self.x } else { &mut self.y };
                for (slot, c) in bits[head..head + count].iter_mut().zip(data.bytes()) {
                    *slot = c == b'1';
                }
                Ok(String::new())
            }
            Command::WriteWords => {
                if data.len() != count * 4 {
                    return Err(END_CODE_OUT_OF_RANGE);
                }
                let bytes = hex::decode(data).map_err(|_| END_CODE_OUT_OF_RANGE)?;
                for (slot, pair) in self.d[head..head + count].iter_mut().zip(bytes.chunks_exact(2)) {
                    *slot = u16::from_be_bytes([pair[0], pair[1]]);
                }
                Ok(String::new())
            }
        }
    }
}

impl Transport for SimulatedPlc {
    fn connect(&mut self) -> Result<()> {
        if !self.connected {
            self.connected = true;
            self.connects += 1;
        }
        Ok(())
    }

    fn exchange(&mut self, frame: &str) -> Result<String> {
        self.connect()?;
        self.frames.push(frame.to_string());

        match self.faults.pop_front() {
            Some(Fault::Transport(kind)) => {
                self.connected = false;
                Err(McError::Transport(io::Error::from(kind)))
            }
            Some(Fault::EndCode(code)) => {
                let code_byte = frame.get(..2).unwrap_or("FF");
                let subheader = u8::from_str_radix(code_byte, 16).unwrap_or(0x7F) | 0x80;
                Ok(format!("{subheader:02X}{code}"))
            }
            Some(Fault::Raw(text)) => Ok(text.to_string()),
            None => Ok(self.respond(frame)),
        }
    }

    fn close(&mut self) {
        self.connected = false;
        self.closes += 1;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{BatchCommand, BitPadding};

    #[test]
    fn test_simulator_word_round_trip() {
        let mut plc = SimulatedPlc::new();
        let write = BatchCommand::write_words(Device::D, 3, &[0x1234, 26]).unwrap();
        assert_eq!(plc.exchange(&write.to_frame(PointsMode::Standard)).unwrap(), "8300");

        let read = BatchCommand::read_words(Device::D, 3, 2).unwrap();
        assert_eq!(
            plc.exchange(&read.to_frame(PointsMode::Standard)).unwrap(),
            "81001234001A"
        );
    }

    #[test]
    fn test_simulator_rejects_wrong_mode() {
        let mut plc =
            SimulatedPlc::new().accepting(Command::WriteBits, Device::Y, PointsMode::Swapped);
        let cmd = BatchCommand::write_bits(Device::Y, 0, &[true], BitPadding::PadToWord).unwrap();
        assert_eq!(plc.exchange(&cmd.to_frame(PointsMode::Standard)).unwrap(), "8256");
        assert_eq!(plc.exchange(&cmd.to_frame(PointsMode::Swapped)).unwrap(), "8200");
    }

    #[test]
    fn test_simulator_faults() {
        let mut plc = SimulatedPlc::new();
        plc.inject(Fault::Transport(io::ErrorKind::ConnectionReset));
        plc.inject(Fault::Raw("80"));
        let frame = "00FF000A5820000000000008";
        assert!(matches!(plc.exchange(frame), Err(McError::Transport(_))));
        assert!(!plc.is_connected());
        assert_eq!(plc.exchange(frame).unwrap(), "80");
        assert_eq!(plc.exchange(frame).unwrap(), "800000000000");
        assert_eq!(plc.connects(), 2);
    }
}
