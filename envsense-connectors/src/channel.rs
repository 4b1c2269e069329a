//! In-process connector over a tokio channel
//!
//! The receiving half is handed to whoever consumes deltas (an embedding
//! host or a test). Sending never blocks, so it is safe on the sampler's
//! emit path.

use tokio::sync::mpsc;

use crate::{ConnectionStats, Connector, ConnectorError};

/// One published payload and the topic it was sent on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Payload decoded as JSON
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.payload)
    }
}

/// Connector that forwards payloads to an unbounded channel
#[derive(Debug)]
pub struct ChannelConnector {
    tx: mpsc::UnboundedSender<Envelope>,
    stats: ConnectionStats,
}

impl ChannelConnector {
    /// Create a connector and the receiver its payloads arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, stats: ConnectionStats::default() }, rx)
    }
}

impl Connector for ChannelConnector {
    type Error = ConnectorError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        let envelope = Envelope { topic: topic.to_owned(), payload: data.to_vec() };

        match self.tx.send(envelope) {
            Ok(()) => {
                self.stats.record_sent(data.len());
                Ok(())
            }
            Err(_) => {
                let error = ConnectorError::NotConnected;
                self.stats.record_failure(&error);
                Err(error)
            }
        }
    }

    fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }

    fn stats(&self) -> ConnectionStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_payloads_in_order() {
        let (mut connector, mut rx) = ChannelConnector::new();
        connector.send("a", b"1").unwrap();
        connector.send("b", b"22").unwrap();

        assert_eq!(rx.try_recv().unwrap(), Envelope { topic: "a".into(), payload: b"1".to_vec() });
        assert_eq!(rx.try_recv().unwrap().topic, "b");
        assert_eq!(connector.stats().bytes_sent, 3);
    }

    #[test]
    fn dropped_receiver_disconnects() {
        let (mut connector, rx) = ChannelConnector::new();
        assert!(connector.is_connected());
        drop(rx);

        assert!(!connector.is_connected());
        assert!(matches!(connector.send("a", b"1"), Err(ConnectorError::NotConnected)));

        let stats = connector.stats();
        assert_eq!(stats.messages_sent, 0);
        assert_eq!(stats.messages_failed, 1);
    }
}
