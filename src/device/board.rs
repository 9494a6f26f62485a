use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

/// Kit code sent with firmware mode changes on Auriga (2560) boards
pub const KIT_AURIGA: u8 = 0x11;

/// Kit code sent with firmware mode changes on every other board
pub const KIT_STARTER: u8 = 0x10;

/// Microcontroller board family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardType {
    /// Mega 2560 based boards (Auriga, MegaPi)
    #[serde(rename = "2560")]
    Mega2560,
    #[serde(rename = "mcore")]
    MCore,
    #[serde(rename = "orion")]
    Orion,
    #[serde(rename = "zeroPi")]
    ZeroPi,
}

impl BoardType {
    /// Resolves a board identifier; `"default"` is an alias for mCore
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "2560" => Some(BoardType::Mega2560),
            "mcore" | "default" => Some(BoardType::MCore),
            "orion" => Some(BoardType::Orion),
            "zeroPi" => Some(BoardType::ZeroPi),
            _ => None,
        }
    }

    /// Canonical identifier of the board
    pub fn name(&self) -> &'static str {
        match self {
            BoardType::Mega2560 => "2560",
            BoardType::MCore => "mcore",
            BoardType::Orion => "orion",
            BoardType::ZeroPi => "zeroPi",
        }
    }

    /// Ports and default assignments wired on this board
    pub fn port_table(&self) -> PortTable {
        let mut table = PortTable::default();
        match self {
            BoardType::Mega2560 => {
                table.insert(PortRole::Common, Ports::Many(vec![6, 7, 8, 9, 10]));
                table.insert(PortRole::Light, Ports::One(11));
                table.insert(PortRole::Temperature, Ports::One(13));
                table.insert(PortRole::Gyroscope, Ports::One(6));
                table.insert(PortRole::Volume, Ports::One(14));
                table.insert(PortRole::Motor, Ports::Many(vec![1, 2]));
                table.insert(PortRole::LedPanel, Ports::One(0));
            }
            BoardType::MCore => {
                table.insert(PortRole::Common, Ports::Many(vec![1, 2, 3, 4]));
                table.insert(PortRole::Motor, Ports::Many(vec![9, 10]));
                table.insert(PortRole::Led, Ports::One(7));
                table.insert(PortRole::Light, Ports::One(6));
            }
            BoardType::Orion => {
                table.insert(PortRole::Common, Ports::Many((1..=8).collect()));
                table.insert(PortRole::Motor, Ports::Many(vec![9, 10]));
            }
            BoardType::ZeroPi => {
                table.insert(PortRole::Motor, Ports::Many(vec![9, 10]));
            }
        }
        table
    }
}

/// What a port table entry is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortRole {
    /// General purpose RJ25 ports
    #[serde(rename = "COMMON_LIST")]
    Common,
    Light,
    Temperature,
    Gyroscope,
    Volume,
    Motor,
    Led,
    LedPanel,
}

/// A single port or a list of ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ports {
    One(u8),
    Many(Vec<u8>),
}

impl Ports {
    /// Returns the ports as a slice
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Ports::One(port) => std::slice::from_ref(port),
            Ports::Many(ports) => ports,
        }
    }

    /// Whether `port` is part of this entry
    pub fn contains(&self, port: u8) -> bool {
        self.as_slice().contains(&port)
    }
}

/// Mapping from port role to the board's port numbers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortTable(BTreeMap<PortRole, Ports>);

impl PortTable {
    /// Looks up a role
    pub fn get(&self, role: PortRole) -> Option<&Ports> {
        self.0.get(&role)
    }

    /// Ports assigned to a role, empty when the board has none
    pub fn ports(&self, role: PortRole) -> &[u8] {
        self.get(role).map(Ports::as_slice).unwrap_or(&[])
    }

    /// Whether the table has any entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in role order
    pub fn iter(&self) -> impl Iterator<Item = (&PortRole, &Ports)> {
        self.0.iter()
    }

    fn insert(&mut self, role: PortRole, ports: Ports) {
        self.0.insert(role, ports);
    }
}

/// Layout rules that differ between boards, resolved once per encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardProfile {
    /// Tone frames carry a port byte before the frequency
    pub tone_has_port: bool,
    /// Kit code used by firmware mode changes
    pub kit_code: u8,
}

impl BoardProfile {
    /// Profile for a board; unrecognised boards use the mCore rules
    pub fn for_board(board: Option<BoardType>) -> Self {
        match board {
            Some(BoardType::Mega2560) => BoardProfile {
                tone_has_port: true,
                kit_code: KIT_AURIGA,
            },
            _ => BoardProfile {
                tone_has_port: false,
                kit_code: KIT_STARTER,
            },
        }
    }
}
