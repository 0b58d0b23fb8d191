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

//! Read-only access to a deployed staking pool: parameters and stake/unstake event logs.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::{BlockNumberOrTag, Filter, Log},
    sol,
    sol_types::SolEvent,
};
use anyhow::Context;

use crate::{events::RawStakeEvent, SimulationParameters};

sol! {
    #[sol(rpc)]
    interface IStakingPool {
        event Staked(address indexed user, uint256 amount);
        event Unstaked(address indexed user, uint256 amount);

        function poolDuration() external view returns (uint256);
        function rewardRate() external view returns (uint256);
        function poolRewardEndBlock() external view returns (uint256);
    }
}

/// Block range covered by a single `eth_getLogs` request.
pub const LOG_QUERY_CHUNK_SIZE: u64 = 5_000;

/// Pool configuration as read from the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub pool_duration: U256,
    pub reward_rate: U256,
    pub reward_end_block: U256,
}

impl PoolState {
    /// Simulation parameters for this pool.
    pub fn parameters(&self) -> anyhow::Result<SimulationParameters> {
        SimulationParameters::from_contract(self.pool_duration, self.reward_rate)
            .context("Pool contract reports unusable parameters")
    }

    /// First block of the reward window, `poolRewardEndBlock - poolDuration`.
    pub fn start_block(&self) -> anyhow::Result<u64> {
        let start = self.reward_end_block.saturating_sub(self.pool_duration);
        u64::try_from(start).context("Pool start block does not fit in u64")
    }
}

/// Read the pool duration, reward rate and reward end block.
pub async fn fetch_pool_state<P: Provider>(
    provider: &P,
    pool_address: Address,
) -> anyhow::Result<PoolState> {
    let pool = IStakingPool::new(pool_address, provider);
    let pool_duration = pool.poolDuration().call().await.context("Failed to call poolDuration")?;
    let reward_rate = pool.rewardRate().call().await.context("Failed to call rewardRate")?;
    let reward_end_block =
        pool.poolRewardEndBlock().call().await.context("Failed to call poolRewardEndBlock")?;

    tracing::debug!(
        "Pool {}: duration {}, rate {}, end block {}",
        pool_address,
        pool_duration,
        reward_rate,
        reward_end_block
    );

    Ok(PoolState { pool_duration, reward_rate, reward_end_block })
}

/// Read only the simulation parameters of the pool.
pub async fn fetch_pool_parameters<P: Provider>(
    provider: &P,
    pool_address: Address,
) -> anyhow::Result<SimulationParameters> {
    fetch_pool_state(provider, pool_address).await?.parameters()
}

/// Query logs in chunks to avoid hitting provider limits
pub async fn query_logs_chunked<P: Provider>(
    provider: &P,
    filter: Filter,
    from_block: u64,
    to_block: u64,
) -> anyhow::Result<Vec<Log>> {
    let mut all_logs = Vec::new();

    let mut current_from = from_block;
    while current_from <= to_block {
        let current_to = current_from.saturating_add(LOG_QUERY_CHUNK_SIZE - 1).min(to_block);

        let chunk_filter = filter
            .clone()
            .from_block(BlockNumberOrTag::Number(current_from))
            .to_block(BlockNumberOrTag::Number(current_to));

        let logs = provider.get_logs(&chunk_filter).await?;
        all_logs.extend(logs);

        if current_to == u64::MAX {
            break;
        }
        current_from = current_to + 1;
    }

    Ok(all_logs)
}

/// Fetch every `Staked` and `Unstaked` log for `user` in `[from_block, to_block]`.
///
/// The result is ordered as the chain ordered it, by block number then log index.
pub async fn fetch_stake_logs<P: Provider>(
    provider: &P,
    pool_address: Address,
    user: Address,
    from_block: u64,
    to_block: u64,
) -> anyhow::Result<Vec<Log>> {
    tracing::info!(
        "Fetching stake events for {user} ({} blocks)...",
        to_block.saturating_sub(from_block) + 1
    );

    let staked_filter = Filter::new()
        .address(pool_address)
        .event_signature(IStakingPool::Staked::SIGNATURE_HASH)
        .topic1(user.into_word());

    let unstaked_filter = Filter::new()
        .address(pool_address)
        .event_signature(IStakingPool::Unstaked::SIGNATURE_HASH)
        .topic1(user.into_word());

    let (staked_logs, unstaked_logs) = tokio::join!(
        async {
            query_logs_chunked(provider, staked_filter, from_block, to_block)
                .await
                .context("Failed to get staked logs")
        },
        async {
            query_logs_chunked(provider, unstaked_filter, from_block, to_block)
                .await
                .context("Failed to get unstaked logs")
        }
    );

    let mut logs = staked_logs?;
    logs.extend(unstaked_logs?);
    logs.sort_by_key(|log| (log.block_number, log.log_index));

    tracing::info!("Fetched {} stake events", logs.len());
    Ok(logs)
}

/// Convert stake logs into records keyed on the pool time domain.
///
/// Each block number is rebased to `block - start_block`, saturating at zero. Logs that are
/// neither `Staked` nor `Unstaked` keep their topic as the event name and so fail
/// normalization, as do logs without a block number.
pub fn logs_to_records(logs: &[Log], start_block: u64) -> Vec<RawStakeEvent> {
    logs.iter()
        .map(|log| {
            let order_key = log.block_number.map(|block| block.saturating_sub(start_block));
            match log.topic0() {
                Some(topic) if *topic == IStakingPool::Staked::SIGNATURE_HASH => {
                    let amount = log
                        .log_decode::<IStakingPool::Staked>()
                        .map(|decoded| decoded.inner.data.amount)
                        .ok();
                    RawStakeEvent { event: "Staked".into(), order_key, amount }
                }
                Some(topic) if *topic == IStakingPool::Unstaked::SIGNATURE_HASH => {
                    let amount = log
                        .log_decode::<IStakingPool::Unstaked>()
                        .map(|decoded| decoded.inner.data.amount)
                        .ok();
                    RawStakeEvent { event: "Unstaked".into(), order_key, amount }
                }
                other => RawStakeEvent {
                    event: other.map(|topic| format!("{topic}")).unwrap_or_default(),
                    order_key,
                    amount: None,
                },
            }
        })
        .collect()
}
