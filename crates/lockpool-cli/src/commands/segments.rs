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
use lockpool_rewards::{normalize, stake_segments, RawStakeEvent};

use crate::config::{read_input, GlobalConfig, OutputArgs, PoolArgs, ScheduleArgs};

/// Command to price each interval of constant stake.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct Segments {
    /// YAML or JSON file of event records, used instead of a schedule.
    #[clap(long, value_name = "FILE", conflicts_with_all = ["stakes", "unstakes", "schedule"])]
    pub events: Option<PathBuf>,
    #[clap(flatten)]
    pub pool: PoolArgs,
    #[clap(flatten, next_help_heading = "Schedule")]
    pub schedule: ScheduleArgs,
    #[clap(flatten, next_help_heading = "Output")]
    pub output: OutputArgs,
}

impl Segments {
    /// Run the [Segments] command.
    pub async fn run(&self, _global_config: &GlobalConfig) -> anyhow::Result<()> {
        let params = self.pool.parameters()?;
        let records: Vec<RawStakeEvent> = match &self.events {
            Some(path) => read_input(path)?,
            None => self.schedule.records()?,
        };

        let deltas = normalize(&records).context("Invalid stake events")?;
        let segments = stake_segments(&deltas, &params).context("Failed to price segments")?;
        tracing::info!("Found {} segments of constant stake", segments.len());

        println!("{}", self.output.renderer().render_segments(&segments)?);
        Ok(())
    }
}
