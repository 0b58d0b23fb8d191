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

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lockpool_rewards::{simulate, RawStakeEvent};

use crate::config::{read_input, GlobalConfig, OutputArgs, PoolArgs};

/// Command to simulate rewards for recorded stake events.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct Replay {
    /// YAML or JSON file holding a list of `{event, blockNumber, amount}` records.
    #[clap(long, value_name = "FILE")]
    pub events: PathBuf,
    #[clap(flatten)]
    pub pool: PoolArgs,
    #[clap(flatten, next_help_heading = "Output")]
    pub output: OutputArgs,
}

impl Replay {
    /// Run the [Replay] command.
    pub async fn run(&self, _global_config: &GlobalConfig) -> anyhow::Result<()> {
        let params = self.pool.parameters()?;
        let records: Vec<RawStakeEvent> = read_input(&self.events)?;
        tracing::debug!("Read {} records from {}", records.len(), self.events.display());

        let series = simulate(&params, &records)
            .with_context(|| format!("Failed to replay {}", self.events.display()))?;
        println!("{}", self.output.renderer().render_series(&series)?);
        Ok(())
    }
}
