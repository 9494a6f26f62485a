//! Core types shared by the frame encoder, the polling registry and the transports
//!
//! This module contains the error type, the configuration structures and the
//! protocol-wide constants.

pub mod error;
pub mod types;
pub mod serde;

pub use self::error::{Error, Result};
pub use self::types::{
    Direction,
    SerialConfig,
    SessionConfig,
};

/// Direction byte for read requests
pub const READ_MODULE: u8 = 1;

/// Direction byte for write requests
pub const WRITE_MODULE: u8 = 2;

/// Default sensor polling period in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 800;

/// Default line speed of the boards' USB/Bluetooth serial bridge
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
