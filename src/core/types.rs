use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Serialize, Deserialize};

use super::{Error, Result};

/// Direction byte of a command frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Ask the board for a value
    Read,
    /// Drive an actuator or change board state
    Write,
}

impl Direction {
    /// Returns the wire value of this direction
    pub fn code(&self) -> u8 {
        match self {
            Direction::Read => super::READ_MODULE,
            Direction::Write => super::WRITE_MODULE,
        }
    }

    /// Maps a wire value back to a direction
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            super::READ_MODULE => Some(Direction::Read),
            super::WRITE_MODULE => Some(Direction::Write),
            _ => None,
        }
    }
}

/// Configuration for a command session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Period shared by every polled sensor unless overridden per call
    #[serde(serialize_with = "super::serde::serialize_millis")]
    #[serde(deserialize_with = "super::serde::deserialize_millis")]
    pub poll_interval: Duration,
    /// Board type selected when the session starts
    pub device: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            poll_interval: Duration::from_millis(super::DEFAULT_POLL_INTERVAL_MS),
            device: "mcore".to_string(),
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks the configuration for values the scheduler cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::config("poll_interval must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration for a physical serial link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`
    pub path: String,
    /// Line speed in baud
    pub baud_rate: u32,
    /// Write timeout
    #[serde(serialize_with = "super::serde::serialize_millis")]
    #[serde(deserialize_with = "super::serde::deserialize_millis")]
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            path: "/dev/ttyUSB0".to_string(),
            baud_rate: super::DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(100),
        }
    }
}
