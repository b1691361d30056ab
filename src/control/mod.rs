//! Decision logic for one cycle: classify the distance, pick a mode,
//! drive the actuators.

pub mod actuation;
pub mod classifier;
pub mod policy;
