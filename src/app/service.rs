//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the [`SystemState`] and the three decision stages
//! (classifier, actuator controller, telemetry reporter).  It exposes a
//! hardware-agnostic API; all I/O flows through port traits injected at
//! call sites, so the entire cycle is testable with mock adapters.
//!
//! ```text
//!   RangingPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                   │          AppService           │
//!  ActuatorPort ◀── │ classify · decide · apply     │ ──▶ DeliveryPort
//!                   └──────────────────────────────┘
//!                               ▲
//!                      ConnectivityPort
//! ```
//!
//! One cycle:
//!
//! 1. measure distance
//! 2. classify fullness
//! 3. poll connectivity (once; the same answer gates steps 4 and 7)
//! 4. decide the operating mode
//! 5. apply it to fan + UV
//! 6. stamp fullness and time into the state
//! 7. report, if connected

use embassy_time::Instant;

use crate::config::TrapConfig;
use crate::control::actuation::ActuatorController;
use crate::control::classifier::{FullnessClassifier, FullnessState};
use crate::control::policy::{self, OperatingMode};
use crate::telemetry::{TelemetryPayload, TelemetryReporter};

use super::events::AppEvent;
use super::ports::{
    ActuatorPort, ConnectivityPort, DeliveryPort, DeliveryResult, EventSink, RangingPort,
};
use super::state::SystemState;

/// Summary of one completed cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    pub distance_mm: f32,
    pub fullness: FullnessState,
    pub mode: OperatingMode,
    /// `None` when offline (no delivery attempted).
    pub delivery: Option<DeliveryResult>,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    state: SystemState,
    classifier: FullnessClassifier,
    actuators: ActuatorController,
    reporter: TelemetryReporter,
    cycle_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware — call [`start`](Self::start) next.
    pub fn new(config: &TrapConfig) -> Self {
        Self {
            state: SystemState::default(),
            classifier: FullnessClassifier::from_config(config),
            actuators: ActuatorController::from_config(config),
            reporter: TelemetryReporter::new(),
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the actuators to the boot state (fan LOW, UV on).
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.state = SystemState::default();
        self.actuators.apply(self.state.fan, hw, &mut self.state);
        sink.emit(&AppEvent::Started(self.state));
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle: sense → classify → decide → actuate → report.
    ///
    /// The `hw` parameter satisfies **both** [`RangingPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    ///
    /// Never fails.  Sensor faults arrive as the depth sentinel and
    /// delivery failures are carried in the outcome.
    pub fn run_cycle(
        &mut self,
        now: Instant,
        hw: &mut (impl RangingPort + ActuatorPort),
        net: &impl ConnectivityPort,
        delivery: &mut impl DeliveryPort,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        self.cycle_count += 1;

        // 1–2. Sense and classify
        let distance_mm = hw.measure().distance_mm;
        let fullness = self.classifier.classify(distance_mm);
        sink.emit(&AppEvent::Measured {
            distance_mm,
            fullness,
        });

        // 3–4. Decide
        let connected = net.is_connected();
        let previous = self.state.fan;
        let mode = policy::decide(fullness, connected, previous);

        // 5. Actuate
        self.actuators.apply(mode, hw, &mut self.state);
        if mode != previous {
            sink.emit(&AppEvent::ModeChanged {
                from: previous,
                to: mode,
            });
        } else if !connected && fullness != FullnessState::Full {
            sink.emit(&AppEvent::ModeHeld(mode));
        }

        // 6. Record
        self.state.fullness = fullness;
        self.state.last_updated = now;

        // 7. Report
        let report = if connected {
            let result = self.reporter.report(&self.state, delivery);
            match result {
                Ok(()) => sink.emit(&AppEvent::Reported(TelemetryPayload::from_state(
                    &self.state,
                ))),
                Err(e) => sink.emit(&AppEvent::ReportFailed(e)),
            }
            Some(result)
        } else {
            None
        };

        CycleOutcome {
            distance_mm,
            fullness,
            mode,
            delivery: report,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current system state snapshot.
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// Total cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}
