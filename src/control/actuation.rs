//! Actuator controller: operating mode → fan duty + UV enable.
//!
//! The fan duty presets come from [`TrapConfig`]; the UV lure is derived
//! from the mode and cannot be set independently here.  Applying a mode
//! writes both outputs every time, so repeated applies of the same mode
//! leave identical hardware output and identical recorded state.

use crate::app::ports::ActuatorPort;
use crate::app::state::SystemState;
use crate::config::TrapConfig;

use super::policy::OperatingMode;

/// Maps modes to PWM counts and writes them through an [`ActuatorPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorController {
    duty_off: u16,
    duty_low: u16,
    duty_high: u16,
}

impl ActuatorController {
    pub fn new(duty_off: u16, duty_low: u16, duty_high: u16) -> Self {
        Self {
            duty_off,
            duty_low,
            duty_high,
        }
    }

    pub fn from_config(config: &TrapConfig) -> Self {
        Self::new(config.fan_duty_off, config.fan_duty_low, config.fan_duty_high)
    }

    /// PWM counts for `mode`.
    pub fn duty_for(&self, mode: OperatingMode) -> u16 {
        match mode {
            OperatingMode::Off => self.duty_off,
            OperatingMode::Low => self.duty_low,
            OperatingMode::High => self.duty_high,
        }
    }

    /// Drive the hardware to `mode` and record it in `state`.
    pub fn apply(&self, mode: OperatingMode, hw: &mut impl ActuatorPort, state: &mut SystemState) {
        hw.set_fan_duty(self.duty_for(mode));
        hw.set_uv(mode.uv_enabled());

        state.fan = mode;
        state.uv_on = mode.uv_enabled();
    }
}
