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

use anyhow::Result;
use clap::Parser;
use lockpool_cli::{commands::Command, config::GlobalConfig};
use tracing_subscriber::EnvFilter;

/// Simulate reward accrual for time-locked staking pools.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct MainArgs {
    /// Subcommand to run
    #[command(subcommand)]
    command: Command,

    #[clap(flatten, next_help_heading = "Global Options")]
    config: GlobalConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = MainArgs::parse();

    // Logs go to stderr so that stdout only carries rendered results.
    let filter = EnvFilter::builder()
        .with_default_directive(args.config.log_level.into())
        .from_env_lossy();

    if args.config.log_json {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    args.command.run(&args.config).await
}
