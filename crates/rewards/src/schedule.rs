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

//! Synthetic stake schedules for what-if runs without chain data.

use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::events::RawStakeEvent;

/// A stake of `amount` taking effect at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledStake {
    pub time: u64,
    #[serde(deserialize_with = "crate::events::deserialize_amount")]
    pub amount: U256,
}

impl FromStr for ScheduledStake {
    type Err = anyhow::Error;

    /// Parse `TIME:AMOUNT`, e.g. `100:500`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (time, amount) = s
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("expected TIME:AMOUNT, got {s:?}"))?;
        let time = time
            .trim()
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("invalid stake time {time:?}: {e}"))?;
        let amount = U256::from_str(amount.trim())
            .map_err(|e| anyhow::anyhow!("invalid stake amount {amount:?}: {e}"))?;
        Ok(Self { time, amount })
    }
}

/// A hand-written list of stakes and unstakes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeSchedule {
    #[serde(default)]
    pub stakes: Vec<ScheduledStake>,
    /// Times at which the total staked resets to zero
    #[serde(default)]
    pub unstakes: Vec<u64>,
}

impl StakeSchedule {
    /// Stakes of the same `amount` at each of `times`.
    pub fn fixed_amount(times: impl IntoIterator<Item = u64>, amount: U256) -> Self {
        Self {
            stakes: times.into_iter().map(|time| ScheduledStake { time, amount }).collect(),
            unstakes: Vec::new(),
        }
    }

    pub fn with_stake(mut self, time: u64, amount: U256) -> Self {
        self.stakes.push(ScheduledStake { time, amount });
        self
    }

    pub fn with_unstake(mut self, time: u64) -> Self {
        self.unstakes.push(time);
        self
    }

    /// Append the entries of another schedule after this one's.
    pub fn extend(&mut self, other: StakeSchedule) {
        self.stakes.extend(other.stakes);
        self.unstakes.extend(other.unstakes);
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty() && self.unstakes.is_empty()
    }

    /// Records for the normalizer: stakes first, then unstakes, each in declaration order.
    ///
    /// On a shared time a stake is therefore applied before the unstake.
    pub fn to_records(&self) -> Vec<RawStakeEvent> {
        self.stakes
            .iter()
            .map(|stake| RawStakeEvent::stake(stake.time, stake.amount))
            .chain(self.unstakes.iter().map(|&time| RawStakeEvent::unstake(time)))
            .collect()
    }
}
