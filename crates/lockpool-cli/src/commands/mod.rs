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

//! Commands of the lockpool CLI.

mod live;
mod replay;
mod segments;
mod simulate;

pub use live::Live;
pub use replay::Replay;
pub use segments::Segments;
pub use simulate::Simulate;

use clap::Subcommand;

use crate::config::GlobalConfig;

/// Top level commands.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Simulate rewards for a synthetic stake schedule.
    Simulate(Simulate),
    /// Simulate rewards for stake events read from a file.
    Replay(Replay),
    /// Simulate rewards for a staker's events on a deployed pool.
    Live(Live),
    /// Summarize the expected reward of each interval of constant stake.
    Segments(Segments),
}

impl Command {
    /// Run the command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        match self {
            Self::Simulate(cmd) => cmd.run(global_config).await,
            Self::Replay(cmd) => cmd.run(global_config).await,
            Self::Live(cmd) => cmd.run(global_config).await,
            Self::Segments(cmd) => cmd.run(global_config).await,
        }
    }
}
