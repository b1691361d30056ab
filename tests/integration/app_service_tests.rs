//! Integration tests for the AppService cycle pipeline.
//!
//! Sense → classify → decide → actuate → report, driven through mock
//! adapters on the host.

use embassy_time::Instant;

use crate::mock_hw::{ActuatorCall, LogSink, MockDelivery, MockHardware, MockLink};

use smarttrap::app::events::AppEvent;
use smarttrap::app::ports::DeliveryError;
use smarttrap::app::service::AppService;
use smarttrap::config::TrapConfig;
use smarttrap::control::classifier::FullnessState;
use smarttrap::control::policy::OperatingMode;
use smarttrap::telemetry::UvStatus;

fn make_app(distance_mm: f32) -> (AppService, MockHardware, LogSink) {
    let config = TrapConfig::default();
    let mut app = AppService::new(&config);
    let mut hw = MockHardware::new(distance_mm);
    let mut sink = LogSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_drives_low_with_uv_on() {
    let (app, hw, sink) = make_app(85.0);

    assert_eq!(hw.calls, vec![ActuatorCall::SetFanDuty(400), ActuatorCall::SetUv(true)]);
    assert_eq!(app.state().fan, OperatingMode::Low);
    assert!(app.state().uv_on);
    assert!(matches!(sink.events.first(), Some(AppEvent::Started(_))));
    assert_eq!(app.cycle_count(), 0);
}

// ── Full trap ────────────────────────────────────────────────

#[test]
fn full_trap_turns_everything_off_and_still_reports() {
    let (mut app, mut hw, mut sink) = make_app(17.0);
    let link = MockLink::new(true);
    let mut delivery = MockDelivery::new();

    let out = app.run_cycle(at(30_000), &mut hw, &link, &mut delivery, &mut sink);

    assert_eq!(out.fullness, FullnessState::Full);
    assert_eq!(out.mode, OperatingMode::Off);
    assert_eq!(hw.duty(), 0);
    assert!(!hw.uv());
    assert_eq!(delivery.sent.len(), 1);
    assert_eq!(delivery.sent[0].trap_status, FullnessState::Full);
    assert_eq!(delivery.sent[0].uv_status, UvStatus::Off);
}

#[test]
fn full_trap_turns_off_while_offline() {
    let (mut app, mut hw, mut sink) = make_app(25.0);
    let link = MockLink::new(false);
    let mut delivery = MockDelivery::new();

    let out = app.run_cycle(at(30_000), &mut hw, &link, &mut delivery, &mut sink);

    assert_eq!(out.mode, OperatingMode::Off);
    assert_eq!(hw.duty(), 0);
    assert!(!hw.uv());
    assert!(delivery.sent.is_empty());
    assert_eq!(out.delivery, None);
}

// ── Connected, not full ──────────────────────────────────────

#[test]
fn empty_trap_connected_runs_high() {
    let (mut app, mut hw, mut sink) = make_app(85.0);
    let link = MockLink::new(true);
    let mut delivery = MockDelivery::new();

    let out = app.run_cycle(at(30_000), &mut hw, &link, &mut delivery, &mut sink);

    assert_eq!(out.fullness, FullnessState::Empty);
    assert_eq!(out.mode, OperatingMode::High);
    assert_eq!(hw.duty(), 900);
    assert!(hw.uv());
    assert!(sink.events.contains(&AppEvent::ModeChanged {
        from: OperatingMode::Low,
        to: OperatingMode::High,
    }));
}

#[test]
fn filling_trap_connected_runs_high() {
    let (mut app, mut hw, mut sink) = make_app(45.0);
    let out = app.run_cycle(at(30_000), &mut hw, &MockLink::new(true), &mut MockDelivery::new(), &mut sink);
    assert_eq!(out.fullness, FullnessState::Filling);
    assert_eq!(out.mode, OperatingMode::High);
}

#[test]
fn sentinel_reading_is_empty_never_full() {
    let (mut app, mut hw, mut sink) = make_app(100.0);
    let out = app.run_cycle(at(30_000), &mut hw, &MockLink::new(true), &mut MockDelivery::new(), &mut sink);
    assert_eq!(out.fullness, FullnessState::Empty);
    assert_ne!(out.mode, OperatingMode::Off);
}

// ── Offline, not full ────────────────────────────────────────

#[test]
fn offline_holds_mode_across_cycles() {
    let (mut app, mut hw, mut sink) = make_app(85.0);
    let link = MockLink::new(true);
    let mut delivery = MockDelivery::new();

    app.run_cycle(at(30_000), &mut hw, &link, &mut delivery, &mut sink);
    assert_eq!(app.state().fan, OperatingMode::High);

    link.set(false);
    hw.set_distance(45.0);
    let out = app.run_cycle(at(60_000), &mut hw, &link, &mut delivery, &mut sink);

    assert_eq!(out.mode, OperatingMode::High);
    assert_eq!(hw.duty(), 900);
    assert!(hw.uv());
    assert_eq!(app.state().fullness, FullnessState::Filling);
    assert_eq!(delivery.sent.len(), 1, "no report while offline");
    assert_eq!(sink.events.last(), Some(&AppEvent::ModeHeld(OperatingMode::High)));
}

#[test]
fn offline_after_full_stays_off() {
    let (mut app, mut hw, mut sink) = make_app(17.0);
    let link = MockLink::new(false);
    let mut delivery = MockDelivery::new();

    app.run_cycle(at(30_000), &mut hw, &link, &mut delivery, &mut sink);
    hw.set_distance(85.0);
    let out = app.run_cycle(at(60_000), &mut hw, &link, &mut delivery, &mut sink);

    // Emptied but offline: no escalation.
    assert_eq!(out.fullness, FullnessState::Empty);
    assert_eq!(out.mode, OperatingMode::Off);
    assert!(!hw.uv());
}

// ── Connectivity polling ─────────────────────────────────────

#[test]
fn connectivity_polled_once_per_cycle() {
    let (mut app, mut hw, mut sink) = make_app(85.0);
    let link = MockLink::new(true);
    let mut delivery = MockDelivery::new();

    app.run_cycle(at(30_000), &mut hw, &link, &mut delivery, &mut sink);
    app.run_cycle(at(60_000), &mut hw, &link, &mut delivery, &mut sink);

    assert_eq!(link.polls.get(), 2);
    assert_eq!(hw.measurements, 2);
}

// ── Delivery ─────────────────────────────────────────────────

#[test]
fn delivery_failure_does_not_stop_the_cycle() {
    let (mut app, mut hw, mut sink) = make_app(85.0);
    let link = MockLink::new(true);
    let mut delivery = MockDelivery::failing(DeliveryError::Encoding);

    let first = app.run_cycle(at(30_000), &mut hw, &link, &mut delivery, &mut sink);
    assert_eq!(first.delivery, Some(Err(DeliveryError::Encoding)));
    assert_eq!(first.mode, OperatingMode::High);
    assert_eq!(delivery.sent.len(), 1, "no in-cycle retry");

    delivery.fail_with = None;
    let second = app.run_cycle(at(60_000), &mut hw, &link, &mut delivery, &mut sink);
    assert_eq!(second.delivery, Some(Ok(())));
    assert_eq!(delivery.sent.len(), 2);
}

#[test]
fn report_reflects_post_actuation_state() {
    let (mut app, mut hw, mut sink) = make_app(85.0);
    let mut delivery = MockDelivery::new();

    app.run_cycle(at(30_000), &mut hw, &MockLink::new(true), &mut delivery, &mut sink);

    let p = delivery.sent[0];
    assert_eq!(p.fan_speed, OperatingMode::High);
    assert_eq!(p.trap_status, FullnessState::Empty);
    assert_eq!(p.uv_status, UvStatus::On);
    assert_eq!(p.last_updated, 30_000);
    assert!(sink.events.contains(&AppEvent::Reported(p)));
}

#[test]
fn event_order_within_a_cycle() {
    let (mut app, mut hw, mut sink) = make_app(85.0);
    sink.events.clear();

    app.run_cycle(at(30_000), &mut hw, &MockLink::new(true), &mut MockDelivery::new(), &mut sink);

    let kinds: Vec<&str> = sink
        .events
        .iter()
        .map(|e| match e {
            AppEvent::Started(_) => "started",
            AppEvent::Measured { .. } => "measured",
            AppEvent::ModeChanged { .. } => "mode_changed",
            AppEvent::ModeHeld(_) => "mode_held",
            AppEvent::Reported(_) => "reported",
            AppEvent::ReportFailed(_) => "report_failed",
        })
        .collect();
    assert_eq!(kinds, vec!["measured", "mode_changed", "reported"]);
}
