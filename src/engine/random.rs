// Random Value Provider

//! # Random Value Provider
//!
//! Every random number in Route Bridge comes from here. Two ranges are in use:
//!
//! ```text
//! inner controller   GET /api/randomNumber (bridged)   [0, 100)   JSON number
//! dedicated route    GET /api/randomNumber (outer)     [0, 1000)  plain text
//! ```
//!
//! The provider holds only its [`RandomRange`]; values come from the thread-local
//! RNG, so nothing is shared between calls and no locking is needed.
//!
//! Ranges are validated once, when the provider is built. `gen_range` panics on
//! an empty range, so an invalid range is rejected up front as
//! [`BridgeError::InvalidConfig`] rather than at request time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{BridgeError, Result};

/// Half-open range `[min, max)` that generated values fall into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomRange {
    pub min: f64,
    pub max: f64,
}

impl RandomRange {
    /// Range used by the inner application's controller
    pub const CONTROLLER: RandomRange = RandomRange { min: 0.0, max: 100.0 };

    /// Range used by the outer host's dedicated route
    pub const DEDICATED: RandomRange = RandomRange { min: 0.0, max: 1000.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(BridgeError::InvalidConfig(format!(
                "random range bounds must be finite, got [{}, {})",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(BridgeError::InvalidConfig(format!(
                "random range is empty: [{}, {})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

impl Default for RandomRange {
    fn default() -> Self {
        Self::CONTROLLER
    }
}

/// Produces a fresh pseudo-random number per call
///
/// Holds no generator state of its own; each call draws from the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomValueProvider {
    range: RandomRange,
}

impl RandomValueProvider {
    /// Fails with [`BridgeError::InvalidConfig`] for an empty or non-finite range
    pub fn new(range: RandomRange) -> Result<Self> {
        range.validate()?;
        Ok(Self { range })
    }

    pub fn range(&self) -> RandomRange {
        self.range
    }

    pub fn generate(&self) -> f64 {
        rand::thread_rng().gen_range(self.range.min..self.range.max)
    }
}
