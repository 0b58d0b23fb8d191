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

use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
};
use anyhow::Context;
use clap::Args;
use lockpool_rewards::{
    fetch_pool_state, fetch_stake_logs, logs_to_records, simulate, PoolState, RewardRate,
    SimulationParameters,
};

use crate::config::{GlobalConfig, OutputArgs};

/// Command to simulate rewards for a staker on a deployed pool.
///
/// Only reads from chain. Pool parameters come from the contract unless overridden.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct Live {
    /// Address of the staking pool contract.
    #[clap(long, env = "POOL_ADDRESS")]
    pub pool_address: Address,
    /// Address of the staker whose events are replayed.
    #[clap(long)]
    pub user: Address,
    /// First block to search for events.
    #[clap(long, default_value_t = 0)]
    pub from_block: u64,
    /// Last block to search for events. Defaults to the latest block.
    #[clap(long)]
    pub to_block: Option<u64>,
    /// Block mapped to time 0. Defaults to `poolRewardEndBlock - poolDuration`.
    #[clap(long)]
    pub start_block: Option<u64>,
    /// Override the pool duration read from the contract.
    #[clap(long, allow_negative_numbers = true)]
    pub pool_duration: Option<i64>,
    /// Override the reward rate read from the contract.
    #[clap(long)]
    pub reward_rate: Option<RewardRate>,
    #[clap(flatten, next_help_heading = "Output")]
    pub output: OutputArgs,
}

impl Live {
    /// Run the [Live] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        let rpc_url = global_config.require_rpc_url()?;

        // Connect to the chain.
        let provider = ProviderBuilder::new()
            .connect(rpc_url.as_str())
            .await
            .with_context(|| format!("failed to connect provider to {rpc_url}"))?;

        let state = fetch_pool_state(&provider, self.pool_address).await?;
        let params = self.parameters(&state)?;
        let start_block = match self.start_block {
            Some(block) => block,
            None => state.start_block()?,
        };
        let to_block = match self.to_block {
            Some(block) => block,
            None => provider.get_block_number().await.context("Failed to get block number")?,
        };
        tracing::info!(
            "Pool duration {} blocks at {}%, starting at block {}",
            params.pool_duration(),
            params.reward_rate(),
            start_block
        );

        let logs =
            fetch_stake_logs(&provider, self.pool_address, self.user, self.from_block, to_block)
                .await?;
        let records = logs_to_records(&logs, start_block);

        let series = simulate(&params, &records).context("Simulation failed")?;
        println!("{}", self.output.renderer().render_series(&series)?);
        Ok(())
    }

    /// Parameters from the command line, falling back to the contract for missing ones.
    fn parameters(&self, state: &PoolState) -> anyhow::Result<SimulationParameters> {
        if let (Some(duration), Some(rate)) = (self.pool_duration, self.reward_rate) {
            return SimulationParameters::new(duration, rate).context("Invalid pool parameters");
        }

        let on_chain = state.parameters()?;
        let duration = match self.pool_duration {
            Some(duration) => duration,
            None => i64::try_from(on_chain.pool_duration())?,
        };
        let rate = self.reward_rate.unwrap_or(on_chain.reward_rate());
        SimulationParameters::new(duration, rate).context("Invalid pool parameters")
    }
}
