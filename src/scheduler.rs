//! Control-loop scheduler.
//!
//! A two-state machine polled from the main loop.  It notifies a
//! [`SchedulerDelegate`] when a cycle is due; the main loop implements the
//! delegate to run [`AppService::run_cycle`](crate::app::service::AppService::run_cycle).
//!
//! ```text
//!             elapsed ≥ period
//!   ┌─────────┐ ─────────────▶ ┌─────┐
//!   │ WAITING │                │ DUE │ ── delegate.on_cycle_due(now)
//!   └─────────┘ ◀───────────── └─────┘
//!         record completion time
//! ```
//!
//! The period is measured from the completion of the previous cycle, so a
//! long cycle pushes the next one back rather than shortening the gap.
//! Missed periods are not buffered: a cycle observed late runs once.

use embassy_time::{Duration, Instant};
use log::{debug, info};

use crate::app::ports::{ClockPort, SchedulerDelegate};
use crate::config::TrapConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Waiting,
    Due,
}

/// The scheduler engine.
///
/// Decoupled from the cycle body: when a cycle is due it invokes the
/// [`SchedulerDelegate`] callback rather than calling the service directly.
/// This makes the scheduler testable with a manual clock.
pub struct CycleScheduler {
    period: Duration,
    last_completed: Instant,
    state: CycleState,
    cycles: u64,
}

impl CycleScheduler {
    /// `started_at` counts as a completed cycle, so the first one fires a
    /// full period after it.
    pub fn new(period: Duration, started_at: Instant) -> Self {
        info!("Scheduler: cycle period {} ms", period.as_millis());
        Self {
            period,
            last_completed: started_at,
            state: CycleState::Waiting,
            cycles: 0,
        }
    }

    pub fn from_config(config: &TrapConfig, started_at: Instant) -> Self {
        Self::new(Duration::from_millis(u64::from(config.cycle_period_ms)), started_at)
    }

    /// Whether a full period has elapsed since the last completed cycle.
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_completed) >= self.period
    }

    /// Time left until the next cycle is due (zero if already due).
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.period
            .checked_sub(now.saturating_duration_since(self.last_completed))
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Poll the scheduler.  Call as often as the main loop likes.
    ///
    /// Runs at most one cycle per call.  Returns `true` if a cycle ran.
    pub fn tick(&mut self, clock: &impl ClockPort, delegate: &mut dyn SchedulerDelegate) -> bool {
        let now = clock.now();
        if !self.is_due(now) {
            return false;
        }

        self.state = CycleState::Due;
        delegate.on_cycle_due(now);

        self.last_completed = clock.now();
        self.state = CycleState::Waiting;
        self.cycles += 1;
        debug!(
            "Scheduler: cycle {} completed at {} ms",
            self.cycles,
            self.last_completed.as_millis()
        );
        true
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Cycles run since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
