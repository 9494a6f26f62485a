use tokio::sync::mpsc;
use tracing::warn;

use super::{SerialRequest, Transport};

/// Forwards requests to an in-process consumer, typically the socket task
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    request_tx: mpsc::UnboundedSender<SerialRequest>,
}

impl ChannelTransport {
    /// Creates a transport and the receiver its requests arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SerialRequest>) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        (ChannelTransport { request_tx }, request_rx)
    }

    /// Whether the consumer has gone away
    pub fn is_closed(&self) -> bool {
        self.request_tx.is_closed()
    }
}

impl Transport for ChannelTransport {
    fn deliver(&self, request: SerialRequest) {
        if let Err(e) = self.request_tx.send(request) {
            warn!(frame = ?e.0.method_params, "dropping serial request, consumer closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_arrive_in_order() {
        let (transport, mut rx) = ChannelTransport::new();
        transport.deliver(SerialRequest::from_bytes(vec![1]));
        transport.deliver(SerialRequest::from_bytes(vec![2]));

        assert_eq!(rx.try_recv().unwrap().params, vec![1]);
        assert_eq!(rx.try_recv().unwrap().params, vec![2]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_consumer_is_not_fatal() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);
        assert!(transport.is_closed());
        transport.deliver(SerialRequest::from_bytes(vec![1]));
    }
}
