//! Actuation policy: fullness + connectivity → operating mode.
//!
//! | fullness      | connected | mode              |
//! |---------------|-----------|-------------------|
//! | FULL          | any       | OFF               |
//! | EMPTY/FILLING | yes       | HIGH              |
//! | EMPTY/FILLING | no        | previous (held)   |
//!
//! A full trap is shut down regardless of the network.  While the device
//! cannot report, it does not escalate: the previous mode is held until the
//! next cycle that is both sensed and reportable.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::FullnessState;

/// Fan drive intensity.  The UV lure follows the fan: lit iff not `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingMode {
    Off,
    Low,
    High,
}

impl OperatingMode {
    /// Whether the UV lure is lit in this mode.
    pub fn uv_enabled(self) -> bool {
        self != Self::Off
    }

    /// Wire/log spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Low => "LOW",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide the operating mode for this cycle.
///
/// `previous` is the mode currently applied; it is returned unchanged when
/// the trap is not full and the device is offline.
pub fn decide(fullness: FullnessState, connected: bool, previous: OperatingMode) -> OperatingMode {
    match (fullness, connected) {
        (FullnessState::Full, _) => OperatingMode::Off,
        (_, true) => OperatingMode::High,
        (_, false) => previous,
    }
}
