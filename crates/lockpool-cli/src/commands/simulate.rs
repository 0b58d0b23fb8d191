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

use anyhow::Context;
use clap::Args;
use lockpool_rewards::simulate;

use crate::config::{GlobalConfig, OutputArgs, PoolArgs, ScheduleArgs};

/// Command to simulate rewards for a synthetic stake schedule.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct Simulate {
    #[clap(flatten)]
    pub pool: PoolArgs,
    #[clap(flatten, next_help_heading = "Schedule")]
    pub schedule: ScheduleArgs,
    #[clap(flatten, next_help_heading = "Output")]
    pub output: OutputArgs,
}

impl Simulate {
    /// Run the [Simulate] command.
    pub async fn run(&self, _global_config: &GlobalConfig) -> anyhow::Result<()> {
        let params = self.pool.parameters()?;
        let records = self.schedule.records()?;
        if records.is_empty() {
            tracing::warn!("Schedule is empty; every point will have zero stake");
        }

        let series = simulate(&params, &records).context("Simulation failed")?;
        println!("{}", self.output.renderer().render_series(&series)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tracing::level_filters::LevelFilter;
    use tracing_test::traced_test;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[clap(flatten)]
        simulate: Simulate,
    }

    fn global_config() -> GlobalConfig {
        GlobalConfig { rpc_url: None, log_level: LevelFilter::INFO, log_json: false }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_empty_schedule_warns() {
        let cli = Cli::parse_from(["simulate", "--pool-duration", "3", "--reward-rate", "10"]);
        cli.simulate.run(&global_config()).await.unwrap();
        assert!(logs_contain("Schedule is empty"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_non_empty_schedule_does_not_warn() {
        let cli = Cli::parse_from([
            "simulate",
            "--pool-duration",
            "3",
            "--reward-rate",
            "10",
            "--stake",
            "0:100",
        ]);
        cli.simulate.run(&global_config()).await.unwrap();
        assert!(!logs_contain("Schedule is empty"));
    }
}
