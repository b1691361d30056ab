//! HC-SR04 ultrasonic ranging driver.
//!
//! Pulse-echo protocol: hold TRIG low briefly, raise it for a fixed-width
//! trigger pulse, then time how long ECHO stays high.  The echo width is
//! the round-trip time of the ping, read off a monotonic clock at the
//! rising and falling edge, so
//!
//! ```text
//! distance_mm = echo_us × speed_of_sound_mm_per_us / 2
//! ```
//!
//! ## Fault masking
//!
//! A missing echo (timeout, disconnected sensor, nothing within range) and a
//! reading deeper than the trap both come back as the trap depth.  Callers
//! cannot tell "confirmed empty" from "sensor fault" by the value alone.
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` 1.0 pins and delay plus a [`ClockPort`].
//! On ESP-IDF these are the raw GPIO handles from `hw_init`, the ROM
//! busy-wait delay and the `esp_timer` clock; on host/test they are sim
//! stubs or mocks.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, warn};

use crate::app::ports::ClockPort;
use crate::app::state::Measurement;
use crate::config::TrapConfig;

/// Echo polling granularity (µs).
const ECHO_POLL_US: u32 = 1;

/// Timing and geometry for one ranging cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangingParams {
    pub max_distance_mm: f32,
    pub speed_of_sound_mm_per_us: f32,
    pub trigger_settle_us: u32,
    pub trigger_pulse_us: u32,
}

impl RangingParams {
    pub fn from_config(config: &TrapConfig) -> Self {
        Self {
            max_distance_mm: config.max_distance_mm,
            speed_of_sound_mm_per_us: config.speed_of_sound_mm_per_us,
            trigger_settle_us: config.trigger_settle_us,
            trigger_pulse_us: config.trigger_pulse_us,
        }
    }

    /// Upper bound on each echo wait: twice the round trip to the trap floor.
    pub fn echo_timeout_us(&self) -> u32 {
        let round_trip_us = 2.0 * self.max_distance_mm / self.speed_of_sound_mm_per_us;
        (round_trip_us * 2.0).ceil() as u32
    }

    /// Convert an echo width to a distance, clamping faults to the trap depth.
    pub fn echo_to_distance_mm(&self, echo_us: u32) -> f32 {
        let distance_mm = echo_us as f32 * self.speed_of_sound_mm_per_us / 2.0;
        if echo_us == 0 || distance_mm > self.max_distance_mm {
            return self.max_distance_mm;
        }
        distance_mm
    }
}

/// Ultrasonic ranging sensor on a trigger output and an echo input.
pub struct UltrasonicSensor<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
    params: RangingParams,
    timeout: Duration,
}

impl<T, E, D, C> UltrasonicSensor<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: ClockPort,
{
    pub fn new(trigger: T, echo: E, delay: D, clock: C, params: RangingParams) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            timeout: Duration::from_micros(u64::from(params.echo_timeout_us())),
            params,
        }
    }

    /// Run one trigger/echo cycle.  Blocks for at most two echo timeouts.
    pub fn measure(&mut self) -> Measurement {
        self.fire_trigger();
        let echo_us = self.echo_width_us();
        let distance_mm = self.params.echo_to_distance_mm(echo_us);
        debug!("Ultrasonic: echo={}us distance={:.1}mm", echo_us, distance_mm);
        Measurement::new(distance_mm)
    }

    pub fn params(&self) -> &RangingParams {
        &self.params
    }

    fn fire_trigger(&mut self) {
        if let Err(e) = self.trigger.set_low() {
            warn!("Ultrasonic: trigger write failed: {:?}", e);
        }
        self.delay.delay_us(self.params.trigger_settle_us);
        if let Err(e) = self.trigger.set_high() {
            warn!("Ultrasonic: trigger write failed: {:?}", e);
        }
        self.delay.delay_us(self.params.trigger_pulse_us);
        if let Err(e) = self.trigger.set_low() {
            warn!("Ultrasonic: trigger write failed: {:?}", e);
        }
    }

    /// Width of the next echo pulse in µs, or 0 if it never starts or
    /// never ends within the timeout.
    ///
    /// Both edges are stamped from the clock, so time spent reading the
    /// pin counts towards the width.
    fn echo_width_us(&mut self) -> u32 {
        let Some(rise) = self.wait_for_level(true, self.clock.now()) else {
            return 0;
        };
        let Some(fall) = self.wait_for_level(false, rise) else {
            return 0;
        };
        fall.saturating_duration_since(rise).as_micros() as u32
    }

    /// Poll until ECHO reads `high`, returning the instant it was seen.
    /// `None` once `timeout` has elapsed since `since`.
    fn wait_for_level(&mut self, high: bool, since: Instant) -> Option<Instant> {
        loop {
            let level = self.echo_high();
            let now = self.clock.now();
            if level == high {
                return Some(now);
            }
            if now.saturating_duration_since(since) >= self.timeout {
                return None;
            }
            self.delay.delay_us(ECHO_POLL_US);
        }
    }

    /// Read failures count as low.
    fn echo_high(&mut self) -> bool {
        self.echo.is_high().unwrap_or(false)
    }
}
