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

//! Reward amounts kept as fixed-point decimals.

use std::fmt;

use alloy::primitives::U256;

/// Fractional digits carried by a [Reward].
pub const REWARD_DECIMALS: u8 = 18;

/// A non-negative reward in the same base unit as the staked amounts, with
/// [REWARD_DECIMALS] fractional digits.
///
/// Digits past the last fractional place are truncated. [Reward::floor] gives the whole-unit
/// value the staking contract would pay out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reward {
    scaled: U256,
}

impl Reward {
    pub const ZERO: Self = Self { scaled: U256::ZERO };

    /// `10^REWARD_DECIMALS`
    pub const SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

    /// Reward from its raw value in units of `10^-REWARD_DECIMALS`.
    pub fn from_scaled(scaled: U256) -> Self {
        Self { scaled }
    }

    pub fn scaled(&self) -> U256 {
        self.scaled
    }

    /// Whole units, rounding down.
    pub fn floor(&self) -> U256 {
        self.scaled / Self::SCALE
    }

    pub fn is_zero(&self) -> bool {
        self.scaled.is_zero()
    }
}

impl From<U256> for Reward {
    /// A whole number of units. Saturates at the largest representable reward.
    fn from(whole: U256) -> Self {
        Self { scaled: whole.saturating_mul(Self::SCALE) }
    }
}

impl fmt::Display for Reward {
    /// Shortest exact decimal form, e.g. `24.75` or `100`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.floor();
        let frac = self.scaled % Self::SCALE;
        if frac.is_zero() {
            return write!(f, "{whole}");
        }
        let frac = format!("{:0>width$}", frac.to_string(), width = REWARD_DECIMALS as usize);
        write!(f, "{whole}.{}", frac.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Reward::ZERO.to_string(), "0");
        assert_eq!(Reward::from(U256::from(100)).to_string(), "100");
        let reward = Reward::from_scaled(U256::from(24_750_000_000_000_000_000u128));
        assert_eq!(reward.to_string(), "24.75");
        let reward = Reward::from_scaled(U256::from(300_000_000_000_000_000u128));
        assert_eq!(reward.to_string(), "0.3");
        assert_eq!(Reward::from_scaled(U256::from(1)).to_string(), "0.000000000000000001");
    }

    #[test]
    fn test_floor() {
        let reward = Reward::from_scaled(U256::from(74_500_000_000_000_000_000u128));
        assert_eq!(reward.floor(), U256::from(74));
        assert!(reward > Reward::from(U256::from(74)));
        assert_eq!(Reward::SCALE, U256::from(10u64).pow(U256::from(REWARD_DECIMALS)));
    }
}
