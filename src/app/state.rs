//! Process-wide trap state.
//!
//! [`SystemState`] is the one record the cycle body writes and the
//! telemetry reporter reads.  It is owned by
//! [`AppService`](super::service::AppService) and only reachable through
//! its borrows, so there is exactly one writer and no ambient global.

use embassy_time::Instant;

use crate::control::classifier::FullnessState;
use crate::control::policy::OperatingMode;

/// A single ranging result in millimetres.
///
/// Failed or out-of-range readings are already clamped to the trap depth,
/// so a `Measurement` is always a usable distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub distance_mm: f32,
}

impl Measurement {
    pub fn new(distance_mm: f32) -> Self {
        Self { distance_mm }
    }
}

/// Snapshot of the actuators and the last classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemState {
    /// Mode currently applied to the fan.
    pub fan: OperatingMode,
    /// Fullness from the most recent cycle.
    pub fullness: FullnessState,
    /// UV lure enable line as last written.
    pub uv_on: bool,
    /// Monotonic time of the most recent cycle (boot = 0).
    pub last_updated: Instant,
}

impl Default for SystemState {
    /// Boot state: fan LOW with the lure lit, nothing sensed yet.
    fn default() -> Self {
        Self {
            fan: OperatingMode::Low,
            fullness: FullnessState::Empty,
            uv_on: true,
            last_updated: Instant::from_ticks(0),
        }
    }
}
