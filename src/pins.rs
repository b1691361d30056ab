//! GPIO / peripheral pin assignments for the SmartTrap board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Extraction fan (logic-level MOSFET on the fan supply)
// ---------------------------------------------------------------------------

/// LEDC PWM output to the MOSFET gate.
pub const FAN_PWM_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// UV lure LED driver
// ---------------------------------------------------------------------------

/// Digital output: enables the UV LED driver (active HIGH).
pub const UV_ENABLE_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Ultrasonic ranging sensor (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: trigger pulse.
pub const ULTRASONIC_TRIG_GPIO: i32 = 5;
/// Digital input: echo pulse, width proportional to round-trip time.
pub const ULTRASONIC_ECHO_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC channel driving the fan.
pub const FAN_LEDC_CHANNEL: u32 = 0;
/// LEDC base frequency for the fan (5 kHz).
pub const FAN_PWM_FREQ_HZ: u32 = 5_000;
/// LEDC timer resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const FAN_PWM_RESOLUTION_BITS: u32 = 10;
