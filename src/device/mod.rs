//! Board selection
//!
//! Holds the selected board type and its port table. Board-specific frame
//! layouts are looked up here through [`BoardProfile`].

mod board;
mod context;

pub use self::board::{BoardProfile, BoardType, PortRole, PortTable, Ports, KIT_AURIGA, KIT_STARTER};
pub use self::context::{DeviceContext, DeviceDescriptor, DeviceInfo};
