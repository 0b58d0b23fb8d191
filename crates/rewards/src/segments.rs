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

//! Per-interval reward summary between consecutive stake changes.

use alloy::primitives::U256;

use crate::{
    accrual::accrue, events::StakeDelta, ledger::StakeLedger, Reward, SimulationError,
    SimulationParameters,
};

/// Reward expected over one interval of constant stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeSegment {
    /// Time of the stake change that opens the interval
    pub start: u64,
    /// Time of the next stake change, or the pool end
    pub end: u64,
    /// Total staked throughout the interval
    pub staked: U256,
    /// Length of the interval, `end - start`
    pub blocks_passed: u64,
    /// Reward for `staked` over `blocks_passed` at the pool rate
    pub reward: Reward,
}

/// Split the pool duration at every distinct stake-change time and price each interval.
///
/// `deltas` must be sorted by key, as returned by [normalize](crate::events::normalize). Changes
/// after the pool end are ignored and zero-length intervals are skipped.
pub fn stake_segments(
    deltas: &[StakeDelta],
    params: &SimulationParameters,
) -> Result<Vec<StakeSegment>, SimulationError> {
    let duration = params.pool_duration();
    let mut keys: Vec<u64> =
        deltas.iter().map(|delta| delta.order_key).filter(|&key| key <= duration).collect();
    keys.dedup();

    let mut ledger = StakeLedger::new(deltas.to_vec());
    let mut segments = Vec::with_capacity(keys.len());
    for (i, &start) in keys.iter().enumerate() {
        let end = keys.get(i + 1).copied().unwrap_or(duration);
        if end == start {
            continue;
        }

        let staked = ledger.total_staked_at(start)?;
        let blocks_passed = end - start;
        let reward =
            accrue(params, blocks_passed, staked).ok_or(SimulationError::Overflow { time: start })?;

        segments.push(StakeSegment { start, end, staked, blocks_passed, reward });
    }

    tracing::debug!("Computed {} stake segments", segments.len());
    Ok(segments)
}
