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

//! Reward accrual simulation for time-locked staking pools.
//!
//! Stake and unstake records, from chain logs or a synthetic schedule, flow through
//! [normalize] into a [StakeLedger], which the [RewardAccrualEngine] walks across the pool time
//! domain. [RewardSeries::assemble] pairs each step with its staked amount and reward.

// Declare modules
pub mod accrual;
pub mod chain;
pub mod error;
pub mod events;
pub mod ledger;
pub mod params;
pub mod reward;
pub mod schedule;
pub mod segments;
pub mod series;

// Re-export commonly used types
pub use accrual::{reward_at, AccrualOutput, RewardAccrualEngine};
pub use chain::{
    fetch_pool_parameters, fetch_pool_state, fetch_stake_logs, logs_to_records,
    query_logs_chunked, PoolState, LOG_QUERY_CHUNK_SIZE,
};
pub use error::SimulationError;
pub use events::{normalize, DeltaKind, EventKind, RawStakeEvent, StakeDelta};
pub use ledger::StakeLedger;
pub use params::{RewardRate, SimulationParameters};
pub use reward::{Reward, REWARD_DECIMALS};
pub use schedule::{ScheduledStake, StakeSchedule};
pub use segments::{stake_segments, StakeSegment};
pub use series::{RewardSeries, TimeSeriesPoint};

/// Run a full simulation over `records` with a fresh ledger.
///
/// Deterministic: the same inputs always produce the same series.
pub fn simulate(
    params: &SimulationParameters,
    records: &[RawStakeEvent],
) -> Result<RewardSeries, SimulationError> {
    let deltas = normalize(records)?;
    let mut ledger = StakeLedger::new(deltas);
    let output = RewardAccrualEngine::new(*params).run(&mut ledger)?;
    let series = RewardSeries::assemble(params, output)?;

    if let Some(last) = series.last() {
        tracing::info!(
            "Simulated {} steps: final staked {}, final reward {}",
            series.len(),
            last.staked_amount,
            last.reward_amount
        );
    }

    Ok(series)
}
