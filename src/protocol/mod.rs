//! Wire protocol module
//!
//! This module defines the command frame layout, the numeric operand encoding
//! and the logical commands understood by the board firmware.

pub mod codec;
pub mod command;
pub mod device_type;
pub mod frame;
pub mod numeric;
pub mod tone;

pub use self::codec::FrameCodec;
pub use self::command::{
    Command, EncoderReading, GyroAxis, JoystickAxis, KitMode, LedPosition, ShutterAction,
};
pub use self::device_type::DeviceType;
pub use self::frame::Frame;
pub use self::numeric::{to_bytes, NumericKind, Operand};
pub use self::tone::note_frequency;

// Constants
/// Leading bytes of every frame
pub const FRAME_PREFIX: [u8; 2] = [0xFF, 0x55];

/// Index byte of outgoing frames; the firmware echoes it in replies
pub const FRAME_INDEX: u8 = 0x00;
