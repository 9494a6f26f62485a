//! mblock_serial: command frames for Makeblock serial boards
//!
//! This library builds the binary command frames understood by the firmware of
//! the 2560 (Auriga/MegaPi), mCore, Orion and ZeroPi boards, hands them to a
//! transport, and keeps recurring sensor reads running on tokio timers.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mblock_serial::{ChannelTransport, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> mblock_serial::Result<()> {
//!     let (transport, mut requests) = ChannelTransport::new();
//!     let session = Session::new(SessionConfig::default(), Arc::new(transport))?;
//!
//!     session.set_dc_motor(9, 100);
//!     session.open_ultrasonic(3);
//!
//!     while let Some(request) = requests.recv().await {
//!         println!("{}", request.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```
pub mod core;
pub mod device;
pub mod polling;
pub mod protocol;
pub mod session;
pub mod transport;
mod util;

// Re-export commonly used items
pub use self::core::{Direction, Error, Result, SerialConfig, SessionConfig};
pub use device::{BoardType, DeviceContext, DeviceDescriptor, PortTable};
pub use polling::{PollChannel, PollingRegistry};
pub use protocol::{Command, Frame, Operand};
pub use session::Session;
pub use transport::{ChannelTransport, SerialRequest, SerialTransport, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
