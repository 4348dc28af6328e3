//! 1E command structures and ASCII frame encoding.
//!
//! A request frame is the fixed [`RequestHeader`](crate::RequestHeader), the
//! device code, the head address as 8 hex digits, the point count and, for
//! write commands, the data field:
//!
//! ```text
//! 00 FF 000A 5820 00000000 0008
//! |  |  |    |    |        +-- point count (big-endian, or byte-swapped "0800")
//! |  |  |    |    +----------- head address
//! |  |  |    +---------------- device code (X)
//! |  |  +--------------------- monitor timer
//! |  +------------------------ PC number
//! +--------------------------- command (batch bit read)
//! ```
//!
//! The FX3U-ENET adapters are inconsistent about the byte order of the point
//! count, so every frame is built for an explicit [`PointsMode`].
//!
//! # Example
//!
//! ```
//! use melsec_mc1e::{BatchCommand, Device, PointsMode};
//!
//! let cmd = BatchCommand::read_bits(Device::X, 0, 8).unwrap();
//! assert_eq!(cmd.to_frame(PointsMode::Standard), "00FF000A5820000000000008");
//! assert_eq!(cmd.to_frame(PointsMode::Swapped), "00FF000A5820000000000800");
//! ```

use crate::device::{Device, DeviceUnit};
use crate::error::{McError, Result};
use crate::header::RequestHeader;

/// Maximum number of points a single 1E request can carry in its count field.
pub const MAX_POINTS_PER_COMMAND: usize = u16::MAX as usize;

/// 1E batch command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Batch read in bit units (`00`).
    ReadBits,
    /// Batch read in word units (`01`).
    ReadWords,
    /// Batch write in bit units (`02`).
    WriteBits,
    /// Batch write in word units (`03`).
    WriteWords,
}

impl Command {
    /// Returns the command code.
    pub fn code(self) -> u8 {
        match self {
            Command::ReadBits => 0x00,
            Command::ReadWords => 0x01,
            Command::WriteBits => 0x02,
            Command::WriteWords => 0x03,
        }
    }

    /// Looks a command up by its code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Command::ReadBits),
            0x01 => Some(Command::ReadWords),
            0x02 => Some(Command::WriteBits),
            0x03 => Some(Command::WriteWords),
            _ => None,
        }
    }

    /// Returns the access unit this command operates in.
    pub fn unit(self) -> DeviceUnit {
        match self {
            Command::ReadBits | Command::WriteBits => DeviceUnit::Bit,
            Command::ReadWords | Command::WriteWords => DeviceUnit::Word,
        }
    }

    /// Returns a short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Command::ReadBits => "bit read",
            Command::ReadWords => "word read",
            Command::WriteBits => "bit write",
            Command::WriteWords => "word write",
        }
    }

    /// Returns whether the command carries a data field.
    pub fn is_write(self) -> bool {
        matches!(self, Command::WriteBits | Command::WriteWords)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of the point count field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointsMode {
    /// Big-endian, as documented (`0x0005` -> `"0005"`).
    Standard,
    /// Low byte first (`0x0005` -> `"0500"`).
    Swapped,
}

impl PointsMode {
    /// Detection order: documented encoding first.
    pub const DETECTION_ORDER: [PointsMode; 2] = [PointsMode::Standard, PointsMode::Swapped];

    /// Formats a point count (masked to 16 bits) as 4 hex characters.
    pub fn encode_count(self, count: usize) -> String {
        let count = (count & 0xFFFF) as u16;
        match self {
            PointsMode::Standard => format!("{count:04X}"),
            PointsMode::Swapped => format!("{:02X}{:02X}", count & 0xFF, count >> 8),
        }
    }
}

impl std::fmt::Display for PointsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointsMode::Standard => write!(f, "standard"),
            PointsMode::Swapped => write!(f, "swap"),
        }
    }
}

/// Policy for odd-length bit-write data fields.
///
/// Some adapter firmware wants the bit data word-aligned and some does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitPadding {
    /// Append a trailing `'0'` when the number of points is odd.
    #[default]
    PadToWord,
    /// Send exactly one character per point.
    Unpadded,
}

/// Builds a complete 1E request frame.
///
/// The head address is formatted as 8 hex digits and the count is masked to
/// 16 bits before encoding. `data` is appended verbatim.
///
/// # Example
///
/// ```
/// use melsec_mc1e::{build_frame, Command, Device, PointsMode};
///
/// let frame = build_frame(Command::WriteWords, Device::D, 5, 1, PointsMode::Standard, Some("001A"));
/// assert_eq!(frame, "03FF000A4420000000050001001A");
/// ```
pub fn build_frame(
    command: Command,
    device: Device,
    head: u32,
    count: usize,
    mode: PointsMode,
    data: Option<&str>,
) -> String {
    let data = data.unwrap_or("");
    let mut frame = String::with_capacity(crate::header::DATA_OFFSET + data.len());
    frame.push_str(&RequestHeader::new(command).to_ascii());
    frame.push_str(device.code());
    frame.push_str(&format!("{head:08X}"));
    frame.push_str(&mode.encode_count(count));
    frame.push_str(data);
    frame
}

/// Encodes bit values as one `'0'`/`'1'` character each, in request order.
///
/// ```
/// use melsec_mc1e::{encode_bits, BitPadding};
///
/// assert_eq!(encode_bits(&[true, false, true], BitPadding::PadToWord), "1010");
/// assert_eq!(encode_bits(&[true, false, true], BitPadding::Unpadded), "101");
/// ```
pub fn encode_bits(values: &[bool], padding: BitPadding) -> String {
    let mut data: String = values.iter().map(|&v| if v { '1' } else { '0' }).collect();
    if padding == BitPadding::PadToWord && values.len() % 2 == 1 {
        data.push('0');
    }
    data
}

/// Encodes words as 4 uppercase hex characters each, in request order.
///
/// ```
/// use melsec_mc1e::encode_words;
///
/// assert_eq!(encode_words(&[26, 0xABCD]), "001AABCD");
/// ```
pub fn encode_words(values: &[u16]) -> String {
    values.iter().map(|v| format!("{v:04X}")).collect()
}

/// One batch read or write, validated against the target device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCommand {
    command: Command,
    device: Device,
    head: u32,
    count: usize,
    data: Option<String>,
}

impl BatchCommand {
    /// Creates a batch bit read.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not a bit device or the count is
    /// 0 or exceeds [`MAX_POINTS_PER_COMMAND`].
    pub fn read_bits(device: Device, head: u32, count: usize) -> Result<Self> {
        Self::new(Command::ReadBits, device, head, count, None)
    }

    /// Creates a batch bit write.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not a writable bit device or
    /// `values` is empty or too long.
    pub fn write_bits(
        device: Device,
        head: u32,
        values: &[bool],
        padding: BitPadding,
    ) -> Result<Self> {
        let data = encode_bits(values, padding);
        Self::new(Command::WriteBits, device, head, values.len(), Some(data))
    }

    /// Creates a batch word read.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not a word device or the count is
    /// 0 or exceeds [`MAX_POINTS_PER_COMMAND`].
    pub fn read_words(device: Device, head: u32, count: usize) -> Result<Self> {
        Self::new(Command::ReadWords, device, head, count, None)
    }

    /// Creates a batch word write.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not a writable word device or
    /// `values` is empty or too long.
    pub fn write_words(device: Device, head: u32, values: &[u16]) -> Result<Self> {
        let data = encode_words(values);
        Self::new(Command::WriteWords, device, head, values.len(), Some(data))
    }

    fn new(
        command: Command,
        device: Device,
        head: u32,
        count: usize,
        data: Option<String>,
    ) -> Result<Self> {
        if device.unit() != command.unit() {
            return Err(McError::unsupported_device(device, command.name()));
        }
        if command.is_write() && !device.is_writable() {
            return Err(McError::unsupported_device(device, command.name()));
        }
        if count == 0 {
            return Err(McError::invalid_parameter(
                "count",
                "must be greater than 0",
            ));
        }
        if count > MAX_POINTS_PER_COMMAND {
            return Err(McError::invalid_parameter(
                "count",
                format!("must not exceed {}", MAX_POINTS_PER_COMMAND),
            ));
        }

        Ok(Self {
            command,
            device,
            head,
            count,
            data,
        })
    }

    /// Returns the command code.
    pub fn command(&self) -> Command {
        self.command
    }

    /// Returns the target device.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the head address.
    pub fn head(&self) -> u32 {
        self.head
    }

    /// Returns the number of points.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the encoded data field, if any.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Serializes the command to an ASCII frame with the given count encoding.
    pub fn to_frame(&self, mode: PointsMode) -> String {
        build_frame(
            self.command,
            self.device,
            self.head,
            self.count,
            mode,
            self.data.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{DATA_OFFSET, DEVICE_CODE_OFFSET, HEAD_ADDRESS_OFFSET, POINT_COUNT_OFFSET};

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::ReadBits.code(), 0x00);
        assert_eq!(Command::ReadWords.code(), 0x01);
        assert_eq!(Command::WriteBits.code(), 0x02);
        assert_eq!(Command::WriteWords.code(), 0x03);
        assert_eq!(Command::from_code(0x02), Some(Command::WriteBits));
        assert_eq!(Command::from_code(0x04), None);
    }

    #[test]
    fn test_encode_count() {
        assert_eq!(PointsMode::Standard.encode_count(5), "0005");
        assert_eq!(PointsMode::Swapped.encode_count(5), "0500");
        assert_eq!(PointsMode::Standard.encode_count(0x1234), "1234");
        assert_eq!(PointsMode::Swapped.encode_count(0x1234), "3412");
    }

    #[test]
    fn test_encode_count_masks_to_16_bits() {
        assert_eq!(PointsMode::Standard.encode_count(0x1_0003), "0003");
        assert_eq!(PointsMode::Swapped.encode_count(0x1_0003), "0300");
    }

    #[test]
    fn test_detection_order() {
        assert_eq!(
            PointsMode::DETECTION_ORDER,
            [PointsMode::Standard, PointsMode::Swapped]
        );
        assert_eq!(PointsMode::Standard.to_string(), "standard");
        assert_eq!(PointsMode::Swapped.to_string(), "swap");
    }

    #[test]
    fn test_read_bits_frame() {
        let cmd = BatchCommand::read_bits(Device::X, 0, 8).unwrap();
        assert_eq!(cmd.to_frame(PointsMode::Standard), "00FF000A5820000000000008");
        assert_eq!(cmd.to_frame(PointsMode::Swapped), "00FF000A5820000000000800");
    }

    #[test]
    fn test_write_words_frame() {
        let cmd = BatchCommand::write_words(Device::D, 5, &[26]).unwrap();
        let frame = cmd.to_frame(PointsMode::Standard);
        assert_eq!(frame, "03FF000A4420000000050001001A");
        assert_eq!(&frame[DATA_OFFSET..], "001A");
    }

    #[test]
    fn test_write_bits_frame_padding() {
        let cmd = BatchCommand::write_bits(Device::Y, 2, &[true], BitPadding::PadToWord).unwrap();
        assert_eq!(cmd.to_frame(PointsMode::Swapped), "02FF000A592000000002010010");

        let cmd = BatchCommand::write_bits(Device::Y, 2, &[true], BitPadding::Unpadded).unwrap();
        assert_eq!(cmd.to_frame(PointsMode::Swapped), "02FF000A59200000000201001");
    }

    #[test]
    fn test_frame_field_offsets_fixed() {
        for count in [1usize, 7, 64, 255, 256] {
            let values = vec![0x1111u16; count];
            let frame = BatchCommand::write_words(Device::D, 0x10, &values)
                .unwrap()
                .to_frame(PointsMode::Standard);
            assert_eq!(frame.len(), DATA_OFFSET + count * 4);
            assert_eq!(&frame[DEVICE_CODE_OFFSET..HEAD_ADDRESS_OFFSET], "4420");
            assert_eq!(&frame[HEAD_ADDRESS_OFFSET..POINT_COUNT_OFFSET], "00000010");
            assert_eq!(
                &frame[POINT_COUNT_OFFSET..DATA_OFFSET],
                format!("{count:04X}")
            );
        }
    }

    #[test]
    fn test_head_address_full_width() {
        let frame = build_frame(
            Command::ReadWords,
            Device::D,
            u32::MAX,
            1,
            PointsMode::Standard,
            None,
        );
        assert_eq!(&frame[HEAD_ADDRESS_OFFSET..POINT_COUNT_OFFSET], "FFFFFFFF");
    }

    #[test]
    fn test_encode_bits() {
        assert_eq!(encode_bits(&[true, false], BitPadding::PadToWord), "10");
        assert_eq!(encode_bits(&[false, true, true], BitPadding::PadToWord), "0110");
        assert_eq!(encode_bits(&[false, true, true], BitPadding::Unpadded), "011");
        assert_eq!(encode_bits(&[], BitPadding::PadToWord), "");
    }

    #[test]
    fn test_encode_words() {
        assert_eq!(encode_words(&[0, 1, 0xFFFF, 0x00ab]), "00000001FFFF00AB");
    }

    #[test]
    fn test_device_mismatch() {
        assert!(matches!(
            BatchCommand::read_bits(Device::D, 0, 1),
            Err(McError::UnsupportedDevice { device: Device::D, .. })
        ));
        assert!(matches!(
            BatchCommand::read_words(Device::Y, 0, 1),
            Err(McError::UnsupportedDevice { .. })
        ));
        assert!(matches!(
            BatchCommand::write_bits(Device::X, 0, &[true], BitPadding::Unpadded),
            Err(McError::UnsupportedDevice { device: Device::X, .. })
        ));
    }

    #[test]
    fn test_invalid_count() {
        assert!(matches!(
            BatchCommand::read_words(Device::D, 0, 0),
            Err(McError::InvalidParameter { .. })
        ));
        assert!(matches!(
            BatchCommand::read_bits(Device::X, 0, MAX_POINTS_PER_COMMAND + 1),
            Err(McError::InvalidParameter { .. })
        ));
        assert!(BatchCommand::read_bits(Device::X, 0, MAX_POINTS_PER_COMMAND).is_ok());
    }
}
