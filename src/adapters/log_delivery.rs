//! Log-backed telemetry delivery.
//!
//! Implements [`DeliveryPort`] by rendering the payload as JSON and writing
//! it to the serial log.  Stands in for a cloud transport until one is
//! wired up; a real HTTP/MQTT adapter would implement the same trait.

use log::{error, info};

use crate::app::ports::{DeliveryError, DeliveryPort, DeliveryResult};
use crate::telemetry::TelemetryPayload;

#[derive(Debug, Default)]
pub struct LogDelivery {
    delivered: u32,
    last_json: String,
}

impl LogDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads accepted since construction.
    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    /// JSON body of the most recent accepted payload.
    pub fn last_json(&self) -> &str {
        &self.last_json
    }
}

impl DeliveryPort for LogDelivery {
    fn deliver(&mut self, payload: &TelemetryPayload) -> DeliveryResult {
        let json = payload.to_json().map_err(|e| {
            error!("Delivery: JSON encoding failed: {}", e);
            DeliveryError::Encoding
        })?;

        info!("Sending JSON payload: {}", json);
        self.delivered += 1;
        self.last_json = json;
        Ok(())
    }
}
