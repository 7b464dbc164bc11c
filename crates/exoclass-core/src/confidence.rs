//! Coarse confidence bands derived from a positive-class probability.
//!
//! Bands measure distance from 0.5 and are evaluated top-down:
//!
//! | band   | probability                 |
//! |--------|-----------------------------|
//! | HIGH   | `>= 0.8` or `<= 0.2`        |
//! | MEDIUM | `>= 0.6` or `<= 0.4`        |
//! | LOW    | strictly between 0.4 and 0.6 |

use std::fmt;

use serde::{Deserialize, Serialize};

pub const HIGH_UPPER: f64 = 0.8;
pub const HIGH_LOWER: f64 = 0.2;
pub const MEDIUM_UPPER: f64 = 0.6;
pub const MEDIUM_LOWER: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        if is_high_confidence(probability) {
            Self::High
        } else if probability >= MEDIUM_UPPER || probability <= MEDIUM_LOWER {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_high_confidence(probability: f64) -> bool {
    probability >= HIGH_UPPER || probability <= HIGH_LOWER
}
