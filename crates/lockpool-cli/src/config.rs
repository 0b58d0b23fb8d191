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

//! Common configuration options for commands in the lockpool CLI.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use lockpool_rewards::{
    RawStakeEvent, RewardRate, ScheduledStake, SimulationParameters, StakeSchedule,
};
use serde::de::DeserializeOwned;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::render::{JsonRenderer, Renderer, TableRenderer};

/// Common configuration options for all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalConfig {
    /// URL of the Ethereum RPC endpoint
    #[clap(short, long, env = "RPC_URL", global = true)]
    pub rpc_url: Option<Url>,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long, env = "LOG_LEVEL", global = true, default_value = "info")]
    pub log_level: LevelFilter,

    /// Whether to log in JSON format.
    #[clap(long, env = "LOG_JSON", global = true, default_value_t = false)]
    pub log_json: bool,
}

impl GlobalConfig {
    /// Access [Self::rpc_url] or return an error that can be shown to the user.
    pub fn require_rpc_url(&self) -> Result<Url> {
        self.rpc_url
            .clone()
            .context("Blockchain RPC URL not provided; please set --rpc-url or the RPC_URL env var")
    }
}

/// Pool parameters for commands that do not read them from chain.
#[derive(Args, Debug, Clone)]
pub struct PoolArgs {
    /// Length of the reward window, in blocks.
    #[clap(long, env = "POOL_DURATION", allow_negative_numbers = true)]
    pub pool_duration: i64,

    /// Reward rate in percent earned over one full pool duration, e.g. 10 or 2.5.
    #[clap(long, env = "REWARD_RATE")]
    pub reward_rate: RewardRate,
}

impl PoolArgs {
    pub fn parameters(&self) -> Result<SimulationParameters> {
        SimulationParameters::new(self.pool_duration, self.reward_rate)
            .context("Invalid pool parameters")
    }
}

/// A synthetic stake schedule given as flags, a file, or both.
#[derive(Args, Debug, Clone, Default)]
pub struct ScheduleArgs {
    /// Stake AMOUNT at TIME, e.g. 100:500. May be repeated.
    #[clap(long = "stake", value_name = "TIME:AMOUNT")]
    pub stakes: Vec<ScheduledStake>,

    /// Reset the total staked to zero at TIME. May be repeated.
    #[clap(long = "unstake", value_name = "TIME")]
    pub unstakes: Vec<u64>,

    /// YAML or JSON file with `stakes` and `unstakes` lists.
    #[clap(long, value_name = "FILE")]
    pub schedule: Option<PathBuf>,
}

impl ScheduleArgs {
    /// The file schedule, if any, followed by the flag entries.
    pub fn schedule(&self) -> Result<StakeSchedule> {
        let mut schedule = match &self.schedule {
            Some(path) => read_input(path)?,
            None => StakeSchedule::default(),
        };
        schedule.extend(StakeSchedule {
            stakes: self.stakes.clone(),
            unstakes: self.unstakes.clone(),
        });
        tracing::debug!(
            "Schedule has {} stakes and {} unstakes",
            schedule.stakes.len(),
            schedule.unstakes.len()
        );
        Ok(schedule)
    }

    pub fn records(&self) -> Result<Vec<RawStakeEvent>> {
        Ok(self.schedule()?.to_records())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Options controlling how results are printed.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print amounts as whole tokens with this many decimals, e.g. 18 for wei amounts.
    #[clap(long)]
    pub decimals: Option<u8>,

    /// Print only every Nth point of a series. The final point is always printed.
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub every: u64,
}

impl OutputArgs {
    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self.format {
            OutputFormat::Table => Box::new(TableRenderer::new(self.decimals, self.every)),
            OutputFormat::Json => Box::new(JsonRenderer::new(self.decimals, self.every)),
        }
    }
}

/// Read a JSON or YAML file. Files ending in `.json` are parsed as JSON, anything else as YAML.
pub fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {} as YAML", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use alloy::primitives::U256;
    use lockpool_rewards::{RawStakeEvent, StakeSchedule};

    use super::*;

    #[test]
    fn test_read_input_json_and_yaml() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"[{{"event": "Staked", "blockNumber": 3, "amount": "1000"}}]"#).unwrap();
        let records: Vec<RawStakeEvent> = read_input(json.path()).unwrap();
        assert_eq!(records, vec![RawStakeEvent::stake(3, U256::from(1000))]);

        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "stakes:\n  - time: 0\n    amount: 500\nunstakes: [150]").unwrap();
        let schedule: StakeSchedule = read_input(yaml.path()).unwrap();
        assert_eq!(schedule.stakes.len(), 1);
        assert_eq!(schedule.unstakes, vec![150]);
    }

    #[test]
    fn test_read_input_reports_path() {
        let err = read_input::<StakeSchedule>(Path::new("/nonexistent/schedule.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/schedule.yaml"));
    }

    #[test]
    fn test_schedule_args_merge_file_and_flags() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"stakes": [{{"time": 0, "amount": 500}}]}}"#).unwrap();
        let args = ScheduleArgs {
            stakes: vec!["100:500".parse().unwrap()],
            unstakes: vec![150],
            schedule: Some(file.path().to_path_buf()),
        };
        let schedule = args.schedule().unwrap();
        assert_eq!(
            schedule,
            StakeSchedule::fixed_amount([0, 100], U256::from(500)).with_unstake(150)
        );
        assert_eq!(args.records().unwrap().len(), 3);
    }

    #[test]
    fn test_pool_args_validation() {
        let args = PoolArgs { pool_duration: 0, reward_rate: "10".parse().unwrap() };
        assert!(args.parameters().is_err());
        let args = PoolArgs { pool_duration: 200, reward_rate: "10".parse().unwrap() };
        assert_eq!(args.parameters().unwrap().pool_duration(), 200);
    }
}
