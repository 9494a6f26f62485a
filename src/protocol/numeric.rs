use bytes::BufMut;

/// Wire encoding of a numeric operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// One byte
    Uint8,
    /// Two bytes, low byte first
    Uint16,
    /// Four bytes, IEEE-754 single precision, little-endian
    Float32,
}

impl NumericKind {
    /// Number of bytes this kind always occupies on the wire
    pub fn width(&self) -> usize {
        match self {
            NumericKind::Uint8 => 1,
            NumericKind::Uint16 => 2,
            NumericKind::Float32 => 4,
        }
    }
}

/// A numeric field of a command frame
///
/// Integer operands carry the raw caller value and are masked to their width when
/// written: `Word(-100)` goes out as `9c ff`, `Byte(300)` as `2c`. The boards accept
/// raw values, so nothing here is range checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// Single byte (ports, slots, angles, colour channels)
    Byte(i64),
    /// Little-endian 16-bit word (speeds, distances, frequencies, durations)
    Word(i64),
    /// Little-endian float32 (seven-segment display value)
    Float(f64),
}

impl Operand {
    /// Returns the wire kind of this operand
    pub fn kind(&self) -> NumericKind {
        match self {
            Operand::Byte(_) => NumericKind::Uint8,
            Operand::Word(_) => NumericKind::Uint16,
            Operand::Float(_) => NumericKind::Float32,
        }
    }

    /// Number of bytes written by [`Operand::put`]
    pub fn width(&self) -> usize {
        self.kind().width()
    }

    /// Writes the operand into `dst`
    pub fn put<B: BufMut>(&self, dst: &mut B) {
        match *self {
            Operand::Byte(value) => dst.put_u8((value & 0xFF) as u8),
            Operand::Word(value) => dst.put_u16_le((value & 0xFFFF) as u16),
            // nearest float32, out of range values saturate to infinity
            Operand::Float(value) => dst.put_f32_le(value as f32),
        }
    }
}

/// Encodes a single operand into exactly `operand.width()` bytes
pub fn to_bytes(operand: Operand) -> Vec<u8> {
    let mut out = Vec::with_capacity(operand.width());
    operand.put(&mut out);
    out
}

/// Total encoded size of an operand list
pub fn encoded_len(operands: &[Operand]) -> usize {
    operands.iter().map(Operand::width).sum()
}
