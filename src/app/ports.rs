//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (ranging sensor, actuators, network, telemetry transport,
//! clock, event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly.

use core::fmt;

use embassy_time::Instant;

use super::state::Measurement;
use crate::telemetry::TelemetryPayload;

// ───────────────────────────────────────────────────────────────
// Ranging port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait RangingPort {
    /// Run one trigger/echo cycle.  Blocks for at most the echo timeout.
    /// Never fails: faults come back as the maximum-depth sentinel.
    fn measure(&mut self) -> Measurement;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// Writes are fire-and-forget; adapters log and absorb hardware errors.
pub trait ActuatorPort {
    /// Set the fan PWM duty in raw counts at the configured resolution.
    fn set_fan_duty(&mut self, duty: u16);

    /// Duty most recently written to the fan channel.
    fn fan_duty(&self) -> u16;

    /// Drive the UV lure enable line.
    fn set_uv(&mut self, on: bool);

    /// Query whether the UV lure is currently lit.
    fn is_uv_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: network stack → domain)
// ───────────────────────────────────────────────────────────────

/// Association state of the network link.  Polled once per cycle.
pub trait ConnectivityPort {
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Delivery port (driven adapter: domain → telemetry transport)
// ───────────────────────────────────────────────────────────────

/// Hands a telemetry payload to whatever transport carries it off-device.
///
/// Transport, authentication and retry policy all belong to the adapter.
pub trait DeliveryPort {
    fn deliver(&mut self, payload: &TelemetryPayload) -> DeliveryResult;
}

/// Outcome of one delivery attempt.
pub type DeliveryResult = Result<(), DeliveryError>;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: timer → scheduler)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  Never goes backwards.
pub trait ClockPort {
    fn now(&self) -> Instant;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the cycle body)
// ───────────────────────────────────────────────────────────────

/// Callback the [`CycleScheduler`](crate::scheduler::CycleScheduler)
/// invokes when a cycle is due.  The main loop implements this by running
/// [`AppService::run_cycle`](super::service::AppService::run_cycle).
pub trait SchedulerDelegate {
    /// Run one cycle to completion.  `now` is the instant the cycle became due.
    fn on_cycle_due(&mut self, now: Instant);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`DeliveryPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The payload could not be encoded for the transport.
    Encoding,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => write!(f, "payload encoding failed"),
        }
    }
}
