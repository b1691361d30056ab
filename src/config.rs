//! System configuration parameters
//!
//! All tunable parameters for the SmartTrap system.  Values are fixed at
//! build time; there is no runtime reconfiguration path.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrapConfig {
    // --- Network ---
    /// WiFi station SSID (empty = not provisioned)
    pub wifi_ssid: heapless::String<32>,
    /// WiFi station password (empty = open network)
    pub wifi_password: heapless::String<64>,

    // --- Ranging ---
    /// Distance from the sensor to the bottom of an empty trap (mm).
    /// Also the sentinel returned for failed or out-of-range readings.
    pub max_distance_mm: f32,
    /// At or below this distance the trap is FILLING (mm)
    pub filling_threshold_mm: f32,
    /// At or below this distance the trap is FULL (mm)
    pub full_threshold_mm: f32,
    /// Speed of sound (mm/µs); 0.34 = 340 m/s
    pub speed_of_sound_mm_per_us: f32,
    /// Trigger line low time before the pulse (µs)
    pub trigger_settle_us: u32,
    /// Trigger pulse width (µs)
    pub trigger_pulse_us: u32,

    // --- Fan PWM ---
    /// LEDC frequency for the fan channel (Hz)
    pub fan_pwm_freq_hz: u32,
    /// LEDC duty resolution (bits)
    pub fan_pwm_resolution_bits: u32,
    /// Duty count for OFF
    pub fan_duty_off: u16,
    /// Duty count for LOW (~40%, power saving)
    pub fan_duty_low: u16,
    /// Duty count for HIGH (~90%, max suction)
    pub fan_duty_high: u16,

    // --- Timing ---
    /// Sense/actuate/report cycle period (milliseconds)
    pub cycle_period_ms: u32,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            // Network
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),

            // Ranging (10 cm sticky trap)
            max_distance_mm: 100.0,
            filling_threshold_mm: 60.0,
            full_threshold_mm: 30.0,
            speed_of_sound_mm_per_us: 0.34,
            trigger_settle_us: 2,
            trigger_pulse_us: 10,

            // Fan PWM
            fan_pwm_freq_hz: pins::FAN_PWM_FREQ_HZ,
            fan_pwm_resolution_bits: pins::FAN_PWM_RESOLUTION_BITS,
            fan_duty_off: 0,
            fan_duty_low: 400,
            fan_duty_high: 900,

            // Timing
            cycle_period_ms: 30_000, // 30 s
        }
    }
}

impl TrapConfig {
    /// Largest duty count representable at the configured resolution.
    pub fn fan_duty_max(&self) -> u16 {
        ((1u32 << self.fan_pwm_resolution_bits.min(16)) - 1) as u16
    }

    /// Check cross-field invariants.  Called once at boot before any
    /// driver is built from this config.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_distance_mm > 0.0) {
            return Err(Error::Config("max_distance_mm must be positive"));
        }
        if !(self.full_threshold_mm >= 0.0 && self.full_threshold_mm < self.filling_threshold_mm) {
            return Err(Error::Config("full_threshold_mm must be below filling_threshold_mm"));
        }
        if self.filling_threshold_mm > self.max_distance_mm {
            return Err(Error::Config("filling_threshold_mm exceeds max_distance_mm"));
        }
        if !(self.speed_of_sound_mm_per_us > 0.0) {
            return Err(Error::Config("speed_of_sound_mm_per_us must be positive"));
        }
        if !(1..=16).contains(&self.fan_pwm_resolution_bits) {
            return Err(Error::Config("fan_pwm_resolution_bits must be 1-16"));
        }
        if self.fan_pwm_freq_hz == 0 {
            return Err(Error::Config("fan_pwm_freq_hz must be non-zero"));
        }
        if !(self.fan_duty_off <= self.fan_duty_low && self.fan_duty_low <= self.fan_duty_high) {
            return Err(Error::Config("fan duty presets must be ordered off <= low <= high"));
        }
        if self.fan_duty_high > self.fan_duty_max() {
            return Err(Error::Config("fan_duty_high exceeds PWM resolution"));
        }
        if self.cycle_period_ms == 0 {
            return Err(Error::Config("cycle_period_ms must be non-zero"));
        }
        Ok(())
    }
}
