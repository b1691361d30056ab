//! Scheduler → AppService wiring, the way `main` drives it.

use embassy_time::Instant;

use crate::mock_hw::{LogSink, ManualClock, MockDelivery, MockHardware, MockLink};

use smarttrap::app::ports::SchedulerDelegate;
use smarttrap::app::service::AppService;
use smarttrap::app::state::SystemState;
use smarttrap::config::TrapConfig;
use smarttrap::scheduler::{CycleScheduler, CycleState};

struct Cycle<'a> {
    app: &'a mut AppService,
    hw: &'a mut MockHardware,
    link: &'a MockLink,
    delivery: &'a mut MockDelivery,
    sink: &'a mut LogSink,
}

impl SchedulerDelegate for Cycle<'_> {
    fn on_cycle_due(&mut self, now: Instant) {
        self.app
            .run_cycle(now, self.hw, self.link, self.delivery, self.sink);
    }
}

struct Rig {
    app: AppService,
    hw: MockHardware,
    link: MockLink,
    delivery: MockDelivery,
    sink: LogSink,
    sched: CycleScheduler,
    clock: ManualClock,
}

impl Rig {
    fn new() -> Self {
        let config = TrapConfig::default();
        let mut app = AppService::new(&config);
        let mut hw = MockHardware::new(85.0);
        let mut sink = LogSink::new();
        app.start(&mut hw, &mut sink);
        let clock = ManualClock::at_ms(0);
        Self {
            app,
            hw,
            link: MockLink::new(true),
            delivery: MockDelivery::new(),
            sink,
            sched: CycleScheduler::from_config(&config, Instant::from_millis(0)),
            clock,
        }
    }

    fn poll(&mut self) -> bool {
        let mut cycle = Cycle {
            app: &mut self.app,
            hw: &mut self.hw,
            link: &self.link,
            delivery: &mut self.delivery,
            sink: &mut self.sink,
        };
        self.sched.tick(&self.clock, &mut cycle)
    }
}

#[test]
fn first_cycle_one_period_after_boot() {
    let mut rig = Rig::new();
    rig.clock.set_ms(29_999);
    assert!(!rig.poll());
    assert_eq!(rig.hw.measurements, 0);

    rig.clock.set_ms(30_000);
    assert!(rig.poll());
    assert_eq!(rig.hw.measurements, 1);
    assert_eq!(rig.sched.state(), CycleState::Waiting);
}

#[test]
fn second_poll_within_period_leaves_state_untouched() {
    let mut rig = Rig::new();
    rig.clock.set_ms(30_000);
    rig.poll();
    let snapshot: SystemState = *rig.app.state();
    let sent = rig.delivery.sent.len();

    rig.clock.set_ms(59_999);
    assert!(!rig.poll());

    assert_eq!(*rig.app.state(), snapshot);
    assert_eq!(rig.delivery.sent.len(), sent);
    assert_eq!(rig.app.cycle_count(), 1);
}

#[test]
fn long_stall_runs_exactly_one_cycle() {
    let mut rig = Rig::new();
    rig.clock.set_ms(10 * 30_000);
    assert!(rig.poll());
    assert!(!rig.poll());
    assert_eq!(rig.app.cycle_count(), 1);
    assert_eq!(rig.app.state().last_updated.as_millis(), 300_000);
}

#[test]
fn steady_polling_yields_one_cycle_per_period() {
    let mut rig = Rig::new();
    for _ in 0..(5 * 30) {
        rig.clock.advance_ms(1_000);
        rig.poll();
    }
    assert_eq!(rig.app.cycle_count(), 5);
    assert_eq!(rig.delivery.sent.len(), 5);
}
