//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, count them in tests.

use super::ports::DeliveryError;
use super::state::SystemState;
use crate::control::classifier::FullnessState;
use crate::control::policy::OperatingMode;
use crate::telemetry::TelemetryPayload;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service applied its boot state (carries that state).
    Started(SystemState),

    /// A ranging cycle completed and was classified.
    Measured {
        distance_mm: f32,
        fullness: FullnessState,
    },

    /// The operating mode changed this cycle.
    ModeChanged {
        from: OperatingMode,
        to: OperatingMode,
    },

    /// Offline and not full: the previous mode was kept.
    ModeHeld(OperatingMode),

    /// A telemetry report was accepted by the transport.
    Reported(TelemetryPayload),

    /// A telemetry report failed; the cycle continued regardless.
    ReportFailed(DeliveryError),
}
