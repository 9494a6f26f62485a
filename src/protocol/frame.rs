use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::core::{Direction, Error, Result};
use crate::util::format_hex;
use super::device_type::DeviceType;
use super::numeric::{encoded_len, Operand};
use super::{FRAME_INDEX, FRAME_PREFIX};

/// Bytes before the body: prefix plus the length byte
pub const HEADER_LEN: usize = FRAME_PREFIX.len() + 1;

/// Body bytes that precede the operands: index, direction, device type
const BODY_FIXED_LEN: usize = 3;

/// An encoded command frame
///
/// Layout: `ff 55 <len> <index> <direction> <device> <operands...>`, where `len`
/// counts every byte after itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Encodes a frame from raw parts
    ///
    /// Operands are packed as given; only an operand list too large for the
    /// one-byte length field is refused.
    pub fn encode(direction: Direction, device: DeviceType, operands: &[Operand]) -> Result<Self> {
        let body_len = BODY_FIXED_LEN + encoded_len(operands);
        if body_len > u8::MAX as usize {
            return Err(Error::protocol(format!(
                "frame body of {} bytes exceeds the length field",
                body_len
            )));
        }
        Ok(Self::build(direction, device, operands))
    }

    /// Builds a frame whose operand list is known to fit the length field
    pub(crate) fn build(direction: Direction, device: DeviceType, operands: &[Operand]) -> Self {
        let body_len = BODY_FIXED_LEN + encoded_len(operands);
        debug_assert!(body_len <= u8::MAX as usize);

        let mut buf = BytesMut::with_capacity(HEADER_LEN + body_len);
        buf.put_slice(&FRAME_PREFIX);
        buf.put_u8(body_len as u8);
        buf.put_u8(FRAME_INDEX);
        buf.put_u8(direction.code());
        buf.put_u8(device.code());
        for operand in operands {
            operand.put(&mut buf);
        }

        Frame { bytes: buf.freeze() }
    }

    /// Returns the full frame
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a cheap clone of the underlying buffer
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// Total frame size including the prefix
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Frames always carry at least the header and fixed body
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Value of the length byte
    pub fn length_byte(&self) -> u8 {
        self.bytes[2]
    }

    /// Direction encoded in the frame
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_code(self.bytes[4])
    }

    /// Device type byte
    pub fn device_code(&self) -> u8 {
        self.bytes[5]
    }

    /// Operand bytes following the device type
    pub fn operands(&self) -> &[u8] {
        &self.bytes[HEADER_LEN + BODY_FIXED_LEN..]
    }

    /// Textual form, e.g. `ff 55 04 00 01 01 03`
    pub fn to_hex(&self) -> String {
        format_hex(&self.bytes)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_length_consistent(frame: &Frame) {
        assert_eq!(frame.length_byte() as usize, frame.len() - HEADER_LEN);
    }

    #[test]
    fn test_dc_motor_example() {
        let frame = Frame::encode(
            Direction::Write,
            DeviceType::Motor,
            &[Operand::Byte(1), Operand::Word(85)],
        )
        .unwrap();
        assert_eq!(
            frame.as_bytes(),
            &[0xFF, 0x55, 0x06, 0x00, 0x02, 0x0A, 0x01, 0x55, 0x00]
        );
        assert_length_consistent(&frame);
    }

    #[test]
    fn test_ultrasonic_example() {
        let frame = Frame::encode(Direction::Read, DeviceType::UltrasonicSensor, &[Operand::Byte(3)])
            .unwrap();
        assert_eq!(frame.as_bytes(), &[0xFF, 0x55, 0x04, 0x00, 0x01, 0x01, 0x03]);
        assert_eq!(frame.direction(), Some(Direction::Read));
        assert_eq!(frame.device_code(), 0x01);
        assert_eq!(frame.operands(), &[0x03]);
    }

    #[test]
    fn test_empty_operand_list() {
        let frame = Frame::encode(Direction::Read, DeviceType::Version, &[]).unwrap();
        assert_eq!(frame.as_bytes(), &[0xFF, 0x55, 0x03, 0x00, 0x01, 0x00]);
        assert!(frame.operands().is_empty());
        assert_length_consistent(&frame);
    }

    #[test]
    fn test_length_tracks_mixed_operands() {
        let operands = [
            Operand::Byte(4),
            Operand::Float(1.5),
            Operand::Word(-1),
            Operand::Byte(999),
        ];
        let frame = Frame::encode(Direction::Write, DeviceType::SevenSegment, &operands).unwrap();
        assert_eq!(frame.length_byte(), 3 + 1 + 4 + 2 + 1);
        assert_length_consistent(&frame);
    }

    #[test]
    fn test_oversized_body_is_refused() {
        let operands = vec![Operand::Word(0); 127];
        let err = Frame::encode(Direction::Write, DeviceType::LedMatrix, &operands).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        // 3 + 2 * 126 == 255 still fits
        let operands = vec![Operand::Word(0); 126];
        let frame = Frame::encode(Direction::Write, DeviceType::LedMatrix, &operands).unwrap();
        assert_eq!(frame.length_byte(), 255);
    }

    #[test]
    fn test_display_is_hex() {
        let frame = Frame::encode(Direction::Read, DeviceType::CommonCommand, &[Operand::Byte(0x70)])
            .unwrap();
        assert_eq!(frame.to_string(), "ff 55 04 00 01 3c 70");
    }
}
