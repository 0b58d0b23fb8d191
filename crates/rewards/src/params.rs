// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pool parameters that stay fixed for the whole of a simulation run.

use std::{fmt, str::FromStr};

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::SimulationError;

/// Maximum number of fractional digits accepted in a [RewardRate].
pub const MAX_RATE_DECIMALS: u8 = 18;

/// A non-negative reward rate in percent, kept as an exact decimal.
///
/// A rate of `10` means a full stake earns 10% of its amount over one whole pool duration.
/// The value is `mantissa / 10^decimals`, so `2.5` is stored as mantissa `25` with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RateRepr", into = "String")]
pub struct RewardRate {
    mantissa: U256,
    decimals: u8,
}

impl RewardRate {
    /// A zero rate. Every reward computed with it is zero.
    pub const ZERO: Self = Self { mantissa: U256::ZERO, decimals: 0 };

    /// Rate from a whole percentage, as stored by the staking contract.
    pub fn from_percent(percent: U256) -> Self {
        Self { mantissa: percent, decimals: 0 }
    }

    pub fn mantissa(&self) -> U256 {
        self.mantissa
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// `10^decimals`, the divisor that turns the mantissa back into percent.
    pub(crate) fn scale(&self) -> U256 {
        U256::from(10u64).pow(U256::from(self.decimals))
    }
}

impl FromStr for RewardRate {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(SimulationError::InvalidParameters(format!(
                "reward rate must be non-negative, got {s}"
            )));
        }
        let s = s.strip_prefix('+').unwrap_or(s);
        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        let valid = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !valid(whole) || !valid(frac) {
            return Err(SimulationError::InvalidParameters(format!("invalid reward rate: {s:?}")));
        }

        // Trailing zeros carry no value; dropping them keeps equal rates equal.
        let frac = frac.trim_end_matches('0');
        if frac.len() > MAX_RATE_DECIMALS as usize {
            return Err(SimulationError::InvalidParameters(format!(
                "reward rate {s} has more than {MAX_RATE_DECIMALS} decimal places"
            )));
        }

        let digits = format!("{whole}{frac}");
        let digits = if digits.is_empty() { "0" } else { digits.as_str() };
        let mantissa = U256::from_str_radix(digits, 10).map_err(|e| {
            SimulationError::InvalidParameters(format!("reward rate {s} out of range: {e}"))
        })?;

        Ok(Self { mantissa, decimals: frac.len() as u8 })
    }
}

impl fmt::Display for RewardRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let scale = self.scale();
        let whole = self.mantissa / scale;
        let frac = (self.mantissa % scale).to_string();
        write!(f, "{whole}.{frac:0>width$}", width = self.decimals as usize)
    }
}

impl From<RewardRate> for String {
    fn from(rate: RewardRate) -> Self {
        rate.to_string()
    }
}

/// Accepted serialized forms of a rate: a plain integer, or decimal text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RateRepr {
    Int(u64),
    Text(String),
}

impl TryFrom<RateRepr> for RewardRate {
    type Error = SimulationError;

    fn try_from(repr: RateRepr) -> Result<Self, Self::Error> {
        match repr {
            RateRepr::Int(percent) => Ok(Self::from_percent(U256::from(percent))),
            RateRepr::Text(text) => text.parse(),
        }
    }
}

/// Read-only configuration of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParameters {
    pool_duration: u64,
    reward_rate: RewardRate,
}

impl SimulationParameters {
    /// Validate and build the parameters.
    ///
    /// The duration is taken signed so that zero and negative inputs from a caller are reported
    /// as [SimulationError::InvalidParameters] rather than slipping through a cast.
    pub fn new(pool_duration: i64, reward_rate: RewardRate) -> Result<Self, SimulationError> {
        if pool_duration <= 0 {
            return Err(SimulationError::InvalidParameters(format!(
                "pool duration must be positive, got {pool_duration}"
            )));
        }
        Ok(Self { pool_duration: pool_duration as u64, reward_rate })
    }

    /// Build parameters from on-chain values, where the duration arrives as a U256.
    pub fn from_contract(pool_duration: U256, reward_rate: U256) -> Result<Self, SimulationError> {
        let duration = u64::try_from(pool_duration).ok().and_then(|d| i64::try_from(d).ok());
        let duration = duration.ok_or_else(|| {
            SimulationError::InvalidParameters(format!("pool duration {pool_duration} too large"))
        })?;
        Self::new(duration, RewardRate::from_percent(reward_rate))
    }

    pub fn pool_duration(&self) -> u64 {
        self.pool_duration
    }

    pub fn reward_rate(&self) -> RewardRate {
        self.reward_rate
    }
}
