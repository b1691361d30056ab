//! Unified error types for the SmartTrap firmware.
//!
//! The control cycle itself never fails: sensor faults are masked as the
//! maximum-depth sentinel, actuator writes are fire-and-forget and delivery
//! failures are logged.  What remains fallible is bring-up — configuration
//! validation, peripheral initialisation and network association — and
//! those funnel into [`Error`] so `main` can handle them uniformly.

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible bring-up operation in the firmware funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is inconsistent; the message names the offending field.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// The network station could not be configured or associated.
    Connectivity(ConnectivityError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Connectivity(e) => write!(f, "connectivity: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
