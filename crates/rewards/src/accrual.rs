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

//! Reward accrual over the pool time domain.
//!
//! The reward at a time is always recomputed from the current total staked and the full elapsed
//! time since zero:
//!
//! ```text
//! block_passed = min(time, pool_duration)
//! reward       = block_passed * reward_rate * total_staked / pool_duration / 100
//! ```
//!
//! A stake added late in the window therefore earns as if it had been in the pool since time 0.
//! This matches the staking contract's pending reward view and is kept as is.
//!
//! Rewards keep [REWARD_DECIMALS](crate::REWARD_DECIMALS) fractional digits. The contract pays
//! [Reward::floor] of the same value.

use alloy::primitives::U256;

use crate::{ledger::StakeLedger, Reward, SimulationError, SimulationParameters};

/// Reward for `total_staked` at `time`.
pub fn reward_at(
    params: &SimulationParameters,
    time: u64,
    total_staked: U256,
) -> Result<Reward, SimulationError> {
    let block_passed = time.min(params.pool_duration());
    accrue(params, block_passed, total_staked).ok_or(SimulationError::Overflow { time })
}

/// `block_passed * rate * staked / (duration * 100 * 10^decimals)` as a fixed-point [Reward],
/// or [None] on overflow.
pub(crate) fn accrue(
    params: &SimulationParameters,
    block_passed: u64,
    total_staked: U256,
) -> Option<Reward> {
    let rate = params.reward_rate();
    if block_passed == 0 || rate.is_zero() || total_staked.is_zero() {
        return Some(Reward::ZERO);
    }

    let numerator = U256::from(block_passed)
        .checked_mul(rate.mantissa())?
        .checked_mul(total_staked)?
        .checked_mul(Reward::SCALE)?;
    let denominator = U256::from(params.pool_duration())
        .checked_mul(U256::from(100u64))?
        .checked_mul(rate.scale())?;

    Some(Reward::from_scaled(numerator / denominator))
}

/// Per-step staked totals and rewards for the whole time domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualOutput {
    /// Total staked at each time `0..=pool_duration`
    pub staked: Vec<U256>,
    /// Reward at each time `0..=pool_duration`
    pub rewards: Vec<Reward>,
}

/// Walks `[0, pool_duration]` one time unit at a time, querying the ledger at each step.
#[derive(Debug, Clone)]
pub struct RewardAccrualEngine {
    params: SimulationParameters,
}

impl RewardAccrualEngine {
    pub fn new(params: SimulationParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Run the full pass. The ledger must not have been queried past time 0 yet.
    pub fn run(&self, ledger: &mut StakeLedger) -> Result<AccrualOutput, SimulationError> {
        let duration = self.params.pool_duration();
        let too_long = || {
            SimulationError::InvalidParameters(format!(
                "pool duration {duration} is too long to simulate step by step"
            ))
        };
        let steps =
            usize::try_from(duration).ok().and_then(|d| d.checked_add(1)).ok_or_else(too_long)?;

        let mut staked = Vec::new();
        let mut rewards = Vec::new();
        staked.try_reserve_exact(steps).map_err(|_| too_long())?;
        rewards.try_reserve_exact(steps).map_err(|_| too_long())?;
        for time in 0..=duration {
            let total_staked = ledger.total_staked_at(time)?;
            rewards.push(reward_at(&self.params, time, total_staked)?);
            staked.push(total_staked);
        }

        if ledger.pending() > 0 {
            tracing::warn!(
                "{} stake events fall after the pool end at {} and were not applied",
                ledger.pending(),
                duration
            );
        }

        Ok(AccrualOutput { staked, rewards })
    }
}
