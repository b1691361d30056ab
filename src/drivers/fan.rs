//! Extraction fan driver (DC fan behind a logic-level MOSFET).
//!
//! Variable speed via a single PWM channel.  Duty is expressed in raw
//! counts at the configured LEDC resolution (0 – 1023 at 10 bits) and
//! rescaled if the channel reports a different maximum.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::pwm::SetDutyCycle`.  On ESP-IDF this is the
//! `LedcChannel` handle from `hw_init`; on host/test a mock channel.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

pub struct FanDriver<P> {
    pwm: P,
    resolution_max: u16,
    hw_duty: u16,
}

impl<P: SetDutyCycle> FanDriver<P> {
    /// `resolution_max` is the full-scale count presets are expressed in.
    pub fn new(pwm: P, resolution_max: u16) -> Self {
        let mut fan = Self {
            pwm,
            resolution_max: resolution_max.max(1),
            hw_duty: 0,
        };
        fan.stop();
        fan
    }

    /// Run at `duty` counts, clamped to full scale.  Zero stops the fan.
    pub fn set(&mut self, duty: u16) {
        let duty = duty.min(self.resolution_max);
        if duty == 0 {
            self.stop();
            return;
        }

        self.set_duty_hw(duty);
        self.hw_duty = duty;
    }

    fn stop(&mut self) {
        self.set_duty_hw(0);
        self.hw_duty = 0;
    }

    fn set_duty_hw(&mut self, duty: u16) {
        let channel_max = self.pwm.max_duty_cycle();
        let scaled = if channel_max == self.resolution_max {
            duty
        } else {
            (u32::from(duty) * u32::from(channel_max) / u32::from(self.resolution_max)) as u16
        };
        if let Err(e) = self.pwm.set_duty_cycle(scaled) {
            warn!("Fan: PWM write failed: {:?}", e);
        }
    }

    pub fn current_duty(&self) -> u16 {
        self.hw_duty
    }
}
