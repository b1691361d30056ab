//! Telemetry reporter → log-backed delivery.

use embassy_time::Instant;

use smarttrap::adapters::log_delivery::LogDelivery;
use smarttrap::app::state::SystemState;
use smarttrap::control::classifier::FullnessState;
use smarttrap::control::policy::OperatingMode;
use smarttrap::telemetry::{TelemetryPayload, TelemetryReporter};

#[test]
fn boot_state_renders_as_json() {
    let p = TelemetryPayload::from_state(&SystemState::default());
    assert_eq!(
        p.to_json().unwrap(),
        r#"{"fan_speed":"LOW","trap_status":"EMPTY","uv_status":"ON","last_updated":0}"#
    );
}

#[test]
fn reporter_pushes_through_log_delivery() {
    let state = SystemState {
        fan: OperatingMode::Off,
        fullness: FullnessState::Full,
        uv_on: false,
        last_updated: Instant::from_millis(90_000),
    };
    let mut delivery = LogDelivery::new();

    assert_eq!(TelemetryReporter::new().report(&state, &mut delivery), Ok(()));
    assert_eq!(delivery.delivered(), 1);
    assert_eq!(
        delivery.last_json(),
        r#"{"fan_speed":"OFF","trap_status":"FULL","uv_status":"OFF","last_updated":90000}"#
    );
}

#[test]
fn payload_has_exactly_four_fields() {
    let json = TelemetryPayload::from_state(&SystemState::default()).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let obj = value.as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["fan_speed", "last_updated", "trap_status", "uv_status"]);
    assert!(obj["last_updated"].is_u64());
}
