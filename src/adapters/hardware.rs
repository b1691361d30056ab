//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the ultrasonic sensor and both actuator drivers, exposing them
//! through [`RangingPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying handles are cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::{ActuatorPort, ClockPort, RangingPort};
use crate::app::state::Measurement;
use crate::drivers::fan::FanDriver;
use crate::drivers::uv_lure::UvLureDriver;
use crate::sensors::ultrasonic::UltrasonicSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<T, E, D, C, P, U> {
    ranger: UltrasonicSensor<T, E, D, C>,
    fan: FanDriver<P>,
    uv: UvLureDriver<U>,
}

impl<T, E, D, C, P, U> HardwareAdapter<T, E, D, C, P, U>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: ClockPort,
    P: SetDutyCycle,
    U: OutputPin,
{
    pub fn new(
        ranger: UltrasonicSensor<T, E, D, C>,
        fan: FanDriver<P>,
        uv: UvLureDriver<U>,
    ) -> Self {
        Self { ranger, fan, uv }
    }
}

// ── RangingPort implementation ────────────────────────────────

impl<T, E, D, C, P, U> RangingPort for HardwareAdapter<T, E, D, C, P, U>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: ClockPort,
{
    fn measure(&mut self) -> Measurement {
        self.ranger.measure()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<T, E, D, C, P, U> ActuatorPort for HardwareAdapter<T, E, D, C, P, U>
where
    P: SetDutyCycle,
    U: OutputPin,
{
    fn set_fan_duty(&mut self, duty: u16) {
        self.fan.set(duty);
    }

    fn fan_duty(&self) -> u16 {
        self.fan.current_duty()
    }

    fn set_uv(&mut self, on: bool) {
        self.uv.set(on);
    }

    fn is_uv_on(&self) -> bool {
        self.uv.is_on()
    }
}
