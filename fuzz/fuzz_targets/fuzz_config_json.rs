//! Fuzz target: `TrapConfig` JSON decoding + validation
//!
//! Feeds arbitrary bytes to the config deserializer and, for anything that
//! decodes, runs `validate()` and builds the decision stages from it.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A config that validates has ordered thresholds and in-range duties
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use smarttrap::config::TrapConfig;
use smarttrap::control::actuation::ActuatorController;
use smarttrap::control::classifier::FullnessClassifier;
use smarttrap::control::policy::OperatingMode;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<TrapConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    assert!(config.full_threshold_mm < config.filling_threshold_mm);
    assert!(config.filling_threshold_mm <= config.max_distance_mm);

    let actuators = ActuatorController::from_config(&config);
    for mode in [OperatingMode::Off, OperatingMode::Low, OperatingMode::High] {
        assert!(actuators.duty_for(mode) <= config.fan_duty_max());
    }

    let classifier = FullnessClassifier::from_config(&config);
    let _ = classifier.classify(config.max_distance_mm);
});
