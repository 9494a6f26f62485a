use std::sync::{Arc, PoisonError, RwLock};

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use super::board::{BoardType, PortTable};

/// Board selection as received from the host application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Board identifier: `2560`, `mcore`, `orion`, `zeroPi` or `default`
    #[serde(rename = "type")]
    pub device_type: String,
}

impl DeviceDescriptor {
    /// Creates a descriptor for a board identifier
    pub fn new(device_type: impl Into<String>) -> Self {
        DeviceDescriptor {
            device_type: device_type.into(),
        }
    }
}

/// Snapshot of the selected board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Normalised identifier (`default` becomes `mcore`)
    pub name: String,
    /// Board family, `None` when the identifier is not recognised
    pub board: Option<BoardType>,
    /// Port table of the board, empty when the identifier is not recognised
    pub ports: PortTable,
}

impl DeviceInfo {
    fn from_descriptor(descriptor: &DeviceDescriptor) -> Self {
        match BoardType::from_name(&descriptor.device_type) {
            Some(board) => DeviceInfo {
                name: board.name().to_string(),
                board: Some(board),
                ports: board.port_table(),
            },
            None => DeviceInfo {
                name: descriptor.device_type.clone(),
                board: None,
                ports: PortTable::default(),
            },
        }
    }
}

/// Shared, atomically replaced board selection
///
/// Clones share the same selection. Readers get an `Arc` snapshot, so a
/// concurrent `set_device` never exposes a half-updated table.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    current: Arc<RwLock<Arc<DeviceInfo>>>,
}

impl DeviceContext {
    /// Creates a context with an initial board selection
    pub fn new(descriptor: &DeviceDescriptor) -> Self {
        DeviceContext {
            current: Arc::new(RwLock::new(Arc::new(DeviceInfo::from_descriptor(descriptor)))),
        }
    }

    /// Replaces the whole selection
    pub fn set_device(&self, descriptor: &DeviceDescriptor) {
        let info = Arc::new(DeviceInfo::from_descriptor(descriptor));
        if info.board.is_none() {
            warn!(device = %descriptor.device_type, "unknown board type, port table is empty");
        } else {
            debug!(device = %info.name, "board selected");
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = info;
    }

    /// Current selection
    pub fn info(&self) -> Arc<DeviceInfo> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current board family
    pub fn board(&self) -> Option<BoardType> {
        self.info().board
    }

    /// Port table of the current selection
    pub fn port_table(&self) -> PortTable {
        self.info().ports.clone()
    }
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::new(&DeviceDescriptor::new("default"))
    }
}
