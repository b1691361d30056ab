//! Sensor subsystem.
//!
//! The trap has a single sensor: an ultrasonic rangefinder looking down
//! into the trap.  Its driver produces one [`Measurement`] per cycle.
//!
//! [`Measurement`]: crate::app::state::Measurement

pub mod ultrasonic;
