//! Telemetry: the per-cycle status report sent off-device.
//!
//! ```json
//! {"fan_speed":"HIGH","trap_status":"FILLING","uv_status":"ON","last_updated":120000}
//! ```
//!
//! Field names and the uppercase enum spellings are the wire contract with
//! the backend.  `last_updated` is milliseconds since boot.
//!
//! The reporter only builds the payload and hands it to a [`DeliveryPort`];
//! whether to report at all (connectivity) is decided by the caller.

use log::{debug, warn};
use serde::Serialize;

use crate::app::ports::{DeliveryPort, DeliveryResult};
use crate::app::state::SystemState;
use crate::control::classifier::FullnessState;
use crate::control::policy::OperatingMode;

/// UV lure state as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UvStatus {
    On,
    Off,
}

impl From<bool> for UvStatus {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// One status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetryPayload {
    pub fan_speed: OperatingMode,
    pub trap_status: FullnessState,
    pub uv_status: UvStatus,
    pub last_updated: u64,
}

impl TelemetryPayload {
    pub fn from_state(state: &SystemState) -> Self {
        Self {
            fan_speed: state.fan,
            trap_status: state.fullness,
            uv_status: UvStatus::from(state.uv_on),
            last_updated: state.last_updated.as_millis(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builds payloads from [`SystemState`] and pushes them through a transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryReporter;

impl TelemetryReporter {
    pub fn new() -> Self {
        Self
    }

    /// Deliver one report.  Failures are logged and returned; the caller
    /// carries on either way.
    pub fn report(&self, state: &SystemState, delivery: &mut impl DeliveryPort) -> DeliveryResult {
        let payload = TelemetryPayload::from_state(state);
        debug!("Telemetry: reporting {:?}", payload);
        let result = delivery.deliver(&payload);
        if let Err(e) = result {
            warn!("Telemetry: delivery failed: {}", e);
        }
        result
    }
}
