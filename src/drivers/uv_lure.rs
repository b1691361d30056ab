//! UV lure LED driver.
//!
//! A single enable line into the LED driver; no dimming.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::digital::OutputPin`.  On ESP-IDF this is the
//! `GpioOutput` handle from `hw_init`; on host/test a mock pin.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct UvLureDriver<P> {
    enable_pin: P,
    on: bool,
}

impl<P: OutputPin> UvLureDriver<P> {
    /// Takes the line and drives it low.
    pub fn new(enable_pin: P) -> Self {
        let mut uv = Self { enable_pin, on: false };
        uv.set(false);
        uv
    }

    /// Drive the enable line.  Every call writes the pin, even if unchanged.
    pub fn set(&mut self, on: bool) {
        let res = if on {
            self.enable_pin.set_high()
        } else {
            self.enable_pin.set_low()
        };
        if let Err(e) = res {
            warn!("UV: enable write failed: {:?}", e);
        }
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
