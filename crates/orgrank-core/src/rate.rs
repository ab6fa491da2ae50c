//! Mining rate: the fraction of a node's own value paid as mining reward.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MINING_RATE, MINING_RATE_PRESETS};
use crate::error::ConfigError;

/// Relative distance under which a parsed rate is taken to be a preset.
const PRESET_TOLERANCE: f64 = 1e-9;

/// A validated mining rate, stored as a fraction (`0.007` = 0.7%).
///
/// # Examples
///
/// ```
/// use orgrank_core::MiningRate;
/// let rate: MiningRate = "0.8%".parse().unwrap();
/// assert!((rate.fraction() - 0.008).abs() < 1e-12);
/// assert_eq!(MiningRate::default().fraction(), 0.007);
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd)]
#[serde(try_from = "f64", into = "f64")]
pub struct MiningRate(f64);

impl MiningRate {
    /// Build a rate from a fraction. Must be finite and non-negative.
    pub fn new(fraction: f64) -> Result<Self, ConfigError> {
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(ConfigError::InvalidMiningRate(fraction.to_string()));
        }
        Ok(Self(fraction))
    }

    /// The preset rates (0.7%, 0.8%, 0.9%).
    pub fn presets() -> [MiningRate; 3] {
        MINING_RATE_PRESETS.map(MiningRate)
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }

    pub fn is_preset(self) -> bool {
        MINING_RATE_PRESETS.contains(&self.0)
    }
}

/// The preset `fraction` stands for, if it differs from one only by
/// floating-point error (`0.7 / 100` is not exactly `0.007`).
fn snap_to_preset(fraction: f64) -> f64 {
    MINING_RATE_PRESETS
        .into_iter()
        .find(|preset| (fraction - preset).abs() <= PRESET_TOLERANCE * preset)
        .unwrap_or(fraction)
}

impl Default for MiningRate {
    fn default() -> Self {
        Self(DEFAULT_MINING_RATE)
    }
}

impl fmt::Display for MiningRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Four decimals absorb float noise; trailing zeros are dropped.
        let fixed = format!("{:.4}", self.percent());
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        write!(f, "{trimmed}%")
    }
}

impl TryFrom<f64> for MiningRate {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MiningRate> for f64 {
    fn from(rate: MiningRate) -> f64 {
        rate.0
    }
}

impl FromStr for MiningRate {
    type Err = ConfigError;

    /// Accepts a fraction (`"0.008"`) or a percentage (`"0.8%"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, scale) = match trimmed.strip_suffix('%') {
            Some(pct) => (pct.trim(), 100.0),
            None => (trimmed, 1.0),
        };
        let value: f64 = digits
            .parse()
            .map_err(|_| ConfigError::InvalidMiningRate(s.to_string()))?;
        Self::new(snap_to_preset(value / scale))
    }
}
