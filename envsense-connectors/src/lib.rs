//! Signal K publishing for EnvSense
//!
//! ## Overview
//!
//! The core sampler hands every [`SampleResult`](envsense_core::SampleResult)
//! to a sink. This crate provides the sink a Signal K host expects: a
//! [`DeltaPublisher`] that turns each sample into a Signal K delta message and
//! pushes the serialized JSON through a [`Connector`].
//!
//! ## Connectors
//!
//! ### Channel
//!
//! **When to use:**
//! - The host runs in the same process (a Signal K server embedding the
//!   sampler, or tests)
//! - Deltas are consumed by an async task
//!
//! ### MQTT
//!
//! **When to use:**
//! - The Signal K server (or any other consumer) sits on a broker
//! - Several consumers want the same environment data
//!
//! Deltas are published under `<prefix>/vessels/<self id>`.
//!
//! ## Publishing Rules
//!
//! - One delta per sample, in tick order
//! - Absent fields are published as JSON `null`, never skipped
//! - A connector failure is logged and the sample is dropped; sampling
//!   carries on
//!
//! ## Example Usage
//!
//! ```rust
//! use envsense_connectors::{channel::ChannelConnector, DeltaPublisher};
//! use envsense_core::{SamplerConfig, SampleResult, SampleSink};
//!
//! let (connector, mut deltas) = ChannelConnector::new();
//! let mut publisher = DeltaPublisher::new(connector, "urn:mrn:imo:mmsi:230099999", &SamplerConfig::default());
//!
//! publisher.emit(&SampleResult::absent(0));
//!
//! let envelope = deltas.try_recv().unwrap();
//! assert_eq!(envelope.topic, "vessels.urn:mrn:imo:mmsi:230099999");
//! ```

pub mod channel;
pub mod delta;

#[cfg(feature = "mqtt")]
pub mod mqtt;

// Re-export common types
pub use channel::{ChannelConnector, Envelope};
pub use delta::{DeltaMessage, DeltaPublisher, PathValue, PublishError, Source, Update, PLUGIN_ID};

#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttConnector, QoS};

use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The receiving side has gone away
    #[error("Not connected")]
    NotConnected,
}

/// Transport for serialized deltas
///
/// `send` is called from the sampler's emit path while its state lock is
/// held, so implementations hand the payload off without waiting on the
/// network.
pub trait Connector: Send {
    type Error: std::error::Error + 'static;

    /// Send one payload on `topic`
    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Get connection statistics
    fn stats(&self) -> ConnectionStats;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Number of reconnections
    pub reconnections: u32,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    /// Account for a successful send of `bytes`
    pub fn record_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    /// Account for a failed send
    pub fn record_failure(&mut self, error: &impl std::fmt::Display) {
        self.messages_failed += 1;
        self.last_error = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_track_sends_and_failures() {
        let mut stats = ConnectionStats::default();
        stats.record_sent(120);
        stats.record_sent(80);
        stats.record_failure(&ConnectorError::NotConnected);

        assert_eq!(stats.messages_sent, 2);
        assert_eq!(stats.bytes_sent, 200);
        assert_eq!(stats.messages_failed, 1);
        assert_eq!(stats.last_error.as_deref(), Some("Not connected"));
    }
}
