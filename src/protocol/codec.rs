use bytes::BytesMut;
use tokio_util::codec::Encoder;

use crate::core::Error;
use super::frame::Frame;

/// Writes command frames onto a serial byte stream
///
/// Frames are already self-delimiting, so encoding is a plain copy. Replies are
/// not decoded by this crate.
#[derive(Clone, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec
    }
}

impl Encoder<&Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, item: &Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        dst.extend_from_slice(item.as_bytes());
        Ok(())
    }
}

impl Encoder<&[u8]> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(item);
        Ok(())
    }
}
