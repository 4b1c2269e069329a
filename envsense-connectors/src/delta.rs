//! Signal K delta messages
//!
//! Every sample becomes one delta with a single update:
//!
//! ```json
//! {
//!   "context": "vessels.urn:mrn:imo:mmsi:230099999",
//!   "updates": [{
//!     "source": { "label": "signalk-raspberry-pi-bme680" },
//!     "timestamp": "2024-05-01T12:00:00.000Z",
//!     "values": [
//!       { "path": "environment.inside.temperature", "value": 293.15 },
//!       { "path": "environment.inside.humidity", "value": 45.0 },
//!       { "path": "environment.inside.pressure", "value": 101325.0 },
//!       { "path": "environment.inside.gas", "value": 104000.0 },
//!       { "path": "environment.inside.airquality", "value": 12 }
//!     ]
//!   }]
//! }
//! ```
//!
//! Absent fields keep their path and carry `null`, so consumers see the
//! sensor drop out instead of holding on to stale values.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use envsense_core::{time::Timestamp, SampleResult, SampleSink, SamplerConfig};

use crate::Connector;

/// Source label the deltas are published under
pub const PLUGIN_ID: &str = "signalk-raspberry-pi-bme680";

/// Top-level delta message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaMessage {
    pub context: String,
    pub updates: Vec<Update>,
}

/// One timestamped batch of values from a single source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub source: Source,
    pub timestamp: String,
    pub values: Vec<PathValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
}

/// A Signal K path and its value (`null` when absent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    pub path: String,
    pub value: Value,
}

impl PathValue {
    fn new(path: String, value: Option<impl Into<Value>>) -> Self {
        Self { path, value: value.map_or(Value::Null, Into::into) }
    }
}

/// Errors from publishing one delta
#[derive(Debug, Error)]
pub enum PublishError<E: std::error::Error + 'static> {
    #[error("failed to serialize delta: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("connector rejected delta: {0}")]
    Send(#[source] E),
}

/// Sample sink that publishes Signal K deltas through a connector
pub struct DeltaPublisher<C> {
    connector: C,
    context: String,
    label: String,
    path_prefix: String,
}

impl<C: Connector> DeltaPublisher<C> {
    /// Publisher for vessel `self_id` using the configured `path`
    pub fn new(connector: C, self_id: &str, config: &SamplerConfig) -> Self {
        Self {
            connector,
            context: format!("vessels.{}", self_id),
            label: PLUGIN_ID.to_owned(),
            path_prefix: config.path_prefix(),
        }
    }

    /// Override the source label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Build the delta for one sample
    pub fn delta_for(&self, sample: &SampleResult) -> DeltaMessage {
        let path = |leaf: &str| format!("{}.{}", self.path_prefix, leaf);

        DeltaMessage {
            context: self.context.clone(),
            updates: vec![Update {
                source: Source { label: self.label.clone() },
                timestamp: iso_timestamp(sample.captured_at),
                values: vec![
                    PathValue::new(path("temperature"), sample.temperature),
                    PathValue::new(path("humidity"), sample.humidity),
                    PathValue::new(path("pressure"), sample.pressure),
                    PathValue::new(path("gas"), sample.gas_resistance),
                    PathValue::new(path("airquality"), sample.air_quality_index),
                ],
            }],
        }
    }

    /// Serialize and send the delta for one sample
    pub fn publish(&mut self, sample: &SampleResult) -> Result<(), PublishError<C::Error>> {
        let payload = serde_json::to_vec(&self.delta_for(sample))?;
        self.connector.send(&self.context, &payload).map_err(PublishError::Send)?;

        debug!("Published delta for {} ({} bytes)", self.context, payload.len());
        Ok(())
    }
}

impl<C: Connector> SampleSink for DeltaPublisher<C> {
    fn emit(&mut self, result: &SampleResult) {
        if let Err(e) = self.publish(result) {
            warn!("Dropping sample for {}: {}", self.context, e);
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
///
/// Falls back to the current time when the capture time is out of range.
fn iso_timestamp(captured_at: Timestamp) -> String {
    let time: DateTime<Utc> = i64::try_from(captured_at)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now);

    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
