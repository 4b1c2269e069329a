//! MQTT connector for EnvSense
//!
//! Publishes deltas to a broker with `rumqttc`. The client's event loop runs
//! on its own tokio task and owns the network connection; [`Connector::send`]
//! only enqueues the publish, so the sampler never waits on the broker.
//!
//! Topics mirror the delta context: `vessels.<self id>` under prefix
//! `signalk` becomes `signalk/vessels/<self id>`.
//!
//! ```rust,no_run
//! use envsense_connectors::{mqtt::{MqttConfig, MqttConnector}, DeltaPublisher, QoS};
//! use envsense_core::SamplerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MqttConfig::new("broker.local", 1883)
//!     .client_id("bme680-cabin")
//!     .topic_prefix("boat")
//!     .qos(QoS::AtLeastOnce);
//!
//! let connector = MqttConnector::new(config)?;
//! let publisher = DeltaPublisher::new(connector, "self", &SamplerConfig::default());
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{info, warn};
use rumqttc::{AsyncClient, ClientError, ConnectionError, Event, EventLoop, MqttOptions, Packet};
use thiserror::Error;

pub use rumqttc::QoS;

use crate::{ConnectionStats, Connector};

/// MQTT-specific errors
#[derive(Debug, Error)]
pub enum MqttError {
    /// The publish could not be queued
    #[error("Publish failed: {0}")]
    Client(#[from] ClientError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// MQTT configuration
#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// Broker host name or address
    pub host: String,
    /// Broker port
    pub port: u16,
    /// Client identifier
    pub client_id: String,
    /// Keep-alive interval
    pub keep_alive: Duration,
    /// Optional username and password
    pub credentials: Option<(String, String)>,
    /// Topic prefix, without trailing slash
    pub topic_prefix: String,
    /// Delivery guarantee for deltas
    pub qos: QoS,
    /// Retain the latest delta on the broker
    pub retain: bool,
    /// Publishes queued while disconnected
    pub capacity: usize,
    /// Delay before retrying after a connection error
    pub reconnect_delay: Duration,
}

impl MqttConfig {
    /// Create new configuration for a broker
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            client_id: format!("envsense-{}", std::process::id()),
            keep_alive: Duration::from_secs(30),
            credentials: None,
            topic_prefix: "signalk".into(),
            qos: QoS::AtMostOnce,
            retain: false,
            capacity: 10,
            reconnect_delay: Duration::from_secs(5),
        }
    }

    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    pub fn keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    pub fn topic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.topic_prefix = prefix.into();
        self
    }

    pub fn qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }

    pub fn retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    /// Topic for a delta context
    pub fn topic_for(&self, context: &str) -> String {
        let path = context.replace('.', "/");
        match self.topic_prefix.trim_end_matches('/') {
            "" => path,
            prefix => format!("{}/{}", prefix, path),
        }
    }

    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        if let Some((username, password)) = &self.credentials {
            options.set_credentials(username, password);
        }
        options
    }
}

/// State shared with the event loop task
#[derive(Debug, Default)]
struct Link {
    connected: AtomicBool,
    stats: Mutex<ConnectionStats>,
}

impl Link {
    fn stats(&self) -> MutexGuard<'_, ConnectionStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// MQTT connector backed by a `rumqttc` async client
pub struct MqttConnector {
    config: MqttConfig,
    client: AsyncClient,
    link: Arc<Link>,
}

impl MqttConnector {
    /// Create the client and spawn its event loop
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: MqttConfig) -> Result<Self, MqttError> {
        if config.host.is_empty() {
            return Err(MqttError::Config("Broker host must not be empty".into()));
        }
        if config.capacity == 0 {
            return Err(MqttError::Config("Queue capacity must be at least 1".into()));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| MqttError::Config("No tokio runtime to drive the client".into()))?;

        let (client, eventloop) = AsyncClient::new(config.options(), config.capacity);
        let link = Arc::new(Link::default());
        runtime.spawn(run_event_loop(eventloop, Arc::clone(&link), config.reconnect_delay));

        info!("MQTT connector for {}:{} as {}", config.host, config.port, config.client_id);
        Ok(Self { config, client, link })
    }

    pub fn config(&self) -> &MqttConfig {
        &self.config
    }
}

impl Connector for MqttConnector {
    type Error = MqttError;

    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        let topic = self.config.topic_for(topic);
        let result = self.client.try_publish(topic, self.config.qos, self.config.retain, data.to_vec());

        let mut stats = self.link.stats();
        match result {
            Ok(()) => {
                stats.record_sent(data.len());
                Ok(())
            }
            Err(e) => {
                stats.record_failure(&e);
                Err(e.into())
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.link.connected.load(Ordering::Acquire)
    }

    fn stats(&self) -> ConnectionStats {
        self.link.stats().clone()
    }
}

async fn run_event_loop(mut eventloop: EventLoop, link: Arc<Link>, reconnect_delay: Duration) {
    let mut was_connected = false;

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                link.connected.store(true, Ordering::Release);
                if was_connected {
                    link.stats().reconnections += 1;
                }
                was_connected = true;
                info!("MQTT connected");
            }
            Ok(_) => {}
            Err(ConnectionError::RequestsDone) => {
                link.connected.store(false, Ordering::Release);
                break;
            }
            Err(e) => {
                link.connected.store(false, Ordering::Release);
                warn!("MQTT connection error: {}; retrying in {:?}", e, reconnect_delay);
                link.stats().last_error = Some(e.to_string());
                tokio::time::sleep(reconnect_delay).await;
            }
        }
    }
}
