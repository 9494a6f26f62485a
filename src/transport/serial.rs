use std::io::Write;
use std::sync::{Mutex, PoisonError};

use bytes::BytesMut;
use serialport::SerialPort;
use tokio_util::codec::Encoder;
use tracing::{trace, warn};

use crate::core::{Result, SerialConfig};
use crate::protocol::FrameCodec;
use super::{SerialRequest, Transport};

/// Writes requests straight to a serial port
pub struct SerialTransport {
    /// Port name, for logging
    name: String,
    port: Mutex<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Opens the configured serial device
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.path, config.baud_rate)
            .timeout(config.timeout)
            .open()?;
        Ok(Self::from_port(config.path.clone(), port))
    }

    /// Wraps an already opened port
    pub fn from_port(name: impl Into<String>, port: Box<dyn SerialPort>) -> Self {
        SerialTransport {
            name: name.into(),
            port: Mutex::new(port),
        }
    }

    fn write_request(&self, request: &SerialRequest) -> Result<()> {
        let mut buf = BytesMut::with_capacity(request.params.len());
        FrameCodec::new().encode(&request.params[..], &mut buf)?;

        let mut port = self.port.lock().unwrap_or_else(PoisonError::into_inner);
        port.write_all(&buf)?;
        port.flush()?;
        Ok(())
    }
}

impl Transport for SerialTransport {
    fn deliver(&self, request: SerialRequest) {
        if request.params.is_empty() {
            return;
        }
        match self.write_request(&request) {
            Ok(()) => trace!(port = %self.name, bytes = request.params.len(), "frame written"),
            Err(e) => warn!(port = %self.name, error = %e, "serial write failed"),
        }
    }
}
