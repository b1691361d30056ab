//! Actuator drivers and hardware initialisation.

pub mod fan;
pub mod hw_init;
pub mod uv_lure;
