//! Trap fullness classification.
//!
//! Maps a ranging distance onto one of three ordered bands:
//!
//! ```text
//!   0 mm ──── FULL ──── 30 mm ──── FILLING ──── 60 mm ──── EMPTY ──── 100 mm
//!         (≤ full)              (≤ filling)              (> filling)
//! ```
//!
//! Boundaries belong to the fuller band, so the bands tile the whole axis
//! with no gap and no overlap, and a smaller distance can never classify
//! as less full than a larger one.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TrapConfig;

/// Discrete fill level, ordered `Empty < Filling < Full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FullnessState {
    Empty,
    Filling,
    Full,
}

impl FullnessState {
    /// Wire/log spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Filling => "FILLING",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for FullnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two band edges used by [`FullnessClassifier::classify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullnessClassifier {
    full_threshold_mm: f32,
    filling_threshold_mm: f32,
}

impl FullnessClassifier {
    pub fn new(full_threshold_mm: f32, filling_threshold_mm: f32) -> Self {
        Self {
            full_threshold_mm,
            filling_threshold_mm,
        }
    }

    pub fn from_config(config: &TrapConfig) -> Self {
        Self::new(config.full_threshold_mm, config.filling_threshold_mm)
    }

    /// Classify a distance (mm).  Pure and deterministic.
    ///
    /// A NaN distance fails every comparison and lands in `Empty`; the
    /// ranging driver never produces one.
    pub fn classify(&self, distance_mm: f32) -> FullnessState {
        if distance_mm <= self.full_threshold_mm {
            FullnessState::Full
        } else if distance_mm <= self.filling_threshold_mm {
            FullnessState::Filling
        } else {
            FullnessState::Empty
        }
    }
}
