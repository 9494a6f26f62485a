//! Transport bridge
//!
//! Frames leave the crate as a [`SerialRequest`], the request shape the host
//! application's socket layer forwards to the serial port. Delivery is one-way:
//! transports return nothing and report their own failures through logging.

mod channel;
mod serial;

pub use self::channel::ChannelTransport;
pub use self::serial::SerialTransport;

use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::core::Result;
use crate::protocol::Frame;

/// Method name the host application dispatches serial writes under
pub const METHOD_NAME: &str = "action.sendSerialData";

/// Request type tag for serial writes
pub const REQUEST_TYPE: &str = "serialData";

/// Original form of the data handed to the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodParams {
    /// Space-separated hex text
    Text(String),
    /// Byte array
    Bytes(Vec<u8>),
}

/// A serial write request for the host bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialRequest {
    pub method_name: String,
    pub method_params: MethodParams,
    #[serde(rename = "type")]
    pub kind: String,
    /// Bytes to put on the wire
    pub params: Vec<u8>,
}

impl SerialRequest {
    fn new(method_params: MethodParams, params: Vec<u8>) -> Self {
        SerialRequest {
            method_name: METHOD_NAME.to_string(),
            method_params,
            kind: REQUEST_TYPE.to_string(),
            params,
        }
    }

    /// Request for an encoded frame, carrying its hex text as `methodParams`
    pub fn from_frame(frame: &Frame) -> Self {
        Self::new(MethodParams::Text(frame.to_hex()), frame.as_bytes().to_vec())
    }

    /// Request for hex text that has already been parsed into `params`
    pub fn from_text(text: impl Into<String>, params: Vec<u8>) -> Self {
        Self::new(MethodParams::Text(text.into()), params)
    }

    /// Request for a raw byte array
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(MethodParams::Bytes(bytes.clone()), bytes)
    }

    /// JSON form sent over the host socket
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Out-of-process delivery of serial requests
pub trait Transport: Send + Sync {
    /// Hands a request over for delivery; fire-and-forget
    fn deliver(&self, request: SerialRequest);
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn deliver(&self, request: SerialRequest) {
        (**self).deliver(request)
    }
}
