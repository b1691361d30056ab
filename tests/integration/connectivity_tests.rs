//! WiFi adapter + scheduler in the shape of the firmware main loop:
//! `wifi.poll(now)` then `sched.tick(..)` every 500 ms.

use embassy_time::Instant;

use crate::mock_hw::{LogSink, ManualClock, MockDelivery, MockHardware};

use smarttrap::adapters::wifi::{CONNECT_TIMEOUT_SECS, WifiAdapter, WifiState};
use smarttrap::app::ports::{ClockPort, ConnectivityPort, SchedulerDelegate};
use smarttrap::app::service::AppService;
use smarttrap::config::TrapConfig;
use smarttrap::control::policy::OperatingMode;
use smarttrap::scheduler::CycleScheduler;

const LOOP_STEP_MS: u64 = 500;

struct Cycle<'a, N> {
    app: &'a mut AppService,
    hw: &'a mut MockHardware,
    net: &'a N,
    delivery: &'a mut MockDelivery,
    sink: &'a mut LogSink,
    /// (cycle time, link state when it ran)
    ran: &'a mut Vec<(u64, WifiState)>,
    wifi_state: WifiState,
}

impl<N: ConnectivityPort> SchedulerDelegate for Cycle<'_, N> {
    fn on_cycle_due(&mut self, now: Instant) {
        self.app
            .run_cycle(now, self.hw, self.net, self.delivery, self.sink);
        self.ran.push((now.as_millis(), self.wifi_state));
    }
}

struct Board {
    app: AppService,
    hw: MockHardware,
    wifi: WifiAdapter,
    delivery: MockDelivery,
    sink: LogSink,
    sched: CycleScheduler,
    clock: ManualClock,
    ran: Vec<(u64, WifiState)>,
}

impl Board {
    fn boot() -> Self {
        let config = TrapConfig::default();
        let mut app = AppService::new(&config);
        let mut hw = MockHardware::new(85.0);
        let mut sink = LogSink::new();
        app.start(&mut hw, &mut sink);
        let mut wifi = WifiAdapter::new();
        wifi.set_credentials("TrapNet", "password1").unwrap();
        Self {
            app,
            hw,
            wifi,
            delivery: MockDelivery::new(),
            sink,
            sched: CycleScheduler::from_config(&config, Instant::from_millis(0)),
            clock: ManualClock::at_ms(0),
            ran: Vec::new(),
        }
    }

    /// One main-loop iteration, then advance the clock by one step.
    fn step(&mut self) {
        self.wifi.poll(self.clock.now());
        let mut cycle = Cycle {
            app: &mut self.app,
            hw: &mut self.hw,
            net: &self.wifi,
            delivery: &mut self.delivery,
            sink: &mut self.sink,
            ran: &mut self.ran,
            wifi_state: self.wifi.state(),
        };
        self.sched.tick(&self.clock, &mut cycle);
        self.clock.advance_ms(LOOP_STEP_MS);
    }

    fn run_for_ms(&mut self, ms: u64) {
        for _ in 0..(ms / LOOP_STEP_MS) {
            self.step();
        }
    }
}

#[test]
fn unanswered_joins_never_push_cycles_late() {
    let mut board = Board::boot();
    board.wifi.sim_fail_next(u32::MAX);
    board.wifi.connect(board.clock.now()).unwrap();

    board.run_for_ms(150_000);

    let times: Vec<u64> = board.ran.iter().map(|(t, _)| *t).collect();
    assert_eq!(times, vec![30_000, 60_000, 90_000, 120_000]);
    assert!(board.ran.iter().all(|(_, link)| *link != WifiState::Connected));
    assert!(board.delivery.sent.is_empty());
    assert_eq!(board.app.state().fan, OperatingMode::Low, "offline: boot mode held");
}

#[test]
fn cycle_runs_on_time_while_a_join_is_in_flight() {
    let mut board = Board::boot();
    // First join hangs; it is still pending when the first cycle is due.
    board.wifi.sim_fail_next(1);
    board.clock.set_ms(30_000 - CONNECT_TIMEOUT_SECS * 1_000 + 1_000);
    board.wifi.connect(board.clock.now()).unwrap();
    board.clock.set_ms(30_000);

    board.step();

    assert_eq!(board.ran, vec![(30_000, WifiState::Connecting)]);
    assert!(board.delivery.sent.is_empty());
}

#[test]
fn reports_start_once_a_retry_associates() {
    let mut board = Board::boot();
    board.wifi.sim_fail_next(1);
    board.wifi.connect(board.clock.now()).unwrap();

    // Join times out at 15 s, retry at 17 s succeeds; first cycle at 30 s.
    board.run_for_ms(30_500);

    assert_eq!(board.ran, vec![(30_000, WifiState::Connected)]);
    assert_eq!(board.delivery.sent.len(), 1);
    assert_eq!(board.app.state().fan, OperatingMode::High);
}
