//! Application core — pure domain logic, zero I/O.
//!
//! This module holds the cycle orchestration for the trap: sense, classify,
//! decide, actuate, report.  All interaction with hardware and the network
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod state;
