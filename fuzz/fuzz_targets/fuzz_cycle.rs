//! Fuzz target: `AppService::run_cycle` over arbitrary cycle sequences
//!
//! Each 3-byte chunk is one cycle: a distance (u16, tenths of a mm),
//! a connectivity bit and a delivery-failure bit.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - FULL always ends with fan duty 0 and the lure dark
//! - The lure is lit iff the mode is not OFF
//! - A report is attempted iff the link was up
//!
//! cargo fuzz run fuzz_cycle

#![no_main]

use embassy_time::Instant;
use libfuzzer_sys::fuzz_target;
use smarttrap::app::events::AppEvent;
use smarttrap::app::ports::{
    ActuatorPort, ConnectivityPort, DeliveryError, DeliveryPort, DeliveryResult, EventSink,
    RangingPort,
};
use smarttrap::app::service::AppService;
use smarttrap::app::state::Measurement;
use smarttrap::config::TrapConfig;
use smarttrap::control::classifier::FullnessState;
use smarttrap::control::policy::OperatingMode;
use smarttrap::telemetry::TelemetryPayload;

struct Rig {
    distance_mm: f32,
    duty: u16,
    uv: bool,
}

impl RangingPort for Rig {
    fn measure(&mut self) -> Measurement {
        Measurement::new(self.distance_mm)
    }
}

impl ActuatorPort for Rig {
    fn set_fan_duty(&mut self, duty: u16) {
        self.duty = duty;
    }
    fn fan_duty(&self) -> u16 {
        self.duty
    }
    fn set_uv(&mut self, on: bool) {
        self.uv = on;
    }
    fn is_uv_on(&self) -> bool {
        self.uv
    }
}

struct Link(bool);

impl ConnectivityPort for Link {
    fn is_connected(&self) -> bool {
        self.0
    }
}

struct Outbox {
    attempts: usize,
    fail: bool,
}

impl DeliveryPort for Outbox {
    fn deliver(&mut self, _payload: &TelemetryPayload) -> DeliveryResult {
        self.attempts += 1;
        if self.fail { Err(DeliveryError::Encoding) } else { Ok(()) }
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = TrapConfig::default();
    let mut app = AppService::new(&config);
    let mut hw = Rig {
        distance_mm: config.max_distance_mm,
        duty: 0,
        uv: false,
    };
    let mut outbox = Outbox { attempts: 0, fail: false };
    app.start(&mut hw, &mut Discard);

    for (i, chunk) in data.chunks_exact(3).enumerate() {
        hw.distance_mm = f32::from(u16::from_le_bytes([chunk[0], chunk[1]])) / 10.0;
        let connected = chunk[2] & 1 != 0;
        outbox.fail = chunk[2] & 2 != 0;
        let attempts_before = outbox.attempts;

        let now = Instant::from_millis((i as u64 + 1) * u64::from(config.cycle_period_ms));
        let out = app.run_cycle(now, &mut hw, &Link(connected), &mut outbox, &mut Discard);

        if out.fullness == FullnessState::Full {
            assert_eq!(out.mode, OperatingMode::Off);
            assert_eq!(hw.duty, 0);
        }
        assert_eq!(hw.uv, out.mode != OperatingMode::Off);
        assert_eq!(app.state().uv_on, hw.uv);
        assert_eq!(outbox.attempts - attempts_before, usize::from(connected));
        assert_eq!(out.delivery.is_some(), connected);
    }
});
