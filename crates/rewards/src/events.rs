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

//! Raw stake/unstake records and their normalization into ordered stake deltas.

use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Deserialize, Deserializer, Serialize};

use crate::SimulationError;

/// A stake or unstake record as supplied by an event source, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStakeEvent {
    /// Event name, e.g. `Staked` or `Unstaked`
    pub event: String,
    /// Block number or time unit the event takes effect at
    #[serde(default, alias = "block_number", alias = "blockNumber", alias = "time")]
    pub order_key: Option<u64>,
    /// Amount carried by the event; required for stakes, ignored for unstakes
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub amount: Option<U256>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Int(u64),
    Text(String),
}

impl AmountRepr {
    fn into_amount(self) -> Result<U256, String> {
        match self {
            Self::Int(amount) => Ok(U256::from(amount)),
            Self::Text(text) => {
                U256::from_str(text.trim()).map_err(|e| format!("invalid amount {text:?}: {e}"))
            }
        }
    }
}

/// Amounts arrive either as plain integers or as decimal/`0x` text for values beyond `u64`.
pub(crate) fn deserialize_amount<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<U256, D::Error> {
    AmountRepr::deserialize(deserializer)?.into_amount().map_err(serde::de::Error::custom)
}

fn deserialize_optional_amount<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<U256>, D::Error> {
    Option::<AmountRepr>::deserialize(deserializer)?
        .map(AmountRepr::into_amount)
        .transpose()
        .map_err(serde::de::Error::custom)
}

impl RawStakeEvent {
    pub fn stake(order_key: u64, amount: U256) -> Self {
        Self { event: "Staked".into(), order_key: Some(order_key), amount: Some(amount) }
    }

    pub fn unstake(order_key: u64) -> Self {
        Self { event: "Unstaked".into(), order_key: Some(order_key), amount: None }
    }
}

/// The two kinds of stake-changing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Stake,
    Unstake,
}

impl EventKind {
    /// Classify an event name, ignoring case. Returns [None] for anything unrecognized.
    pub fn classify(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "staked" | "stake" => Some(Self::Stake),
            "unstaked" | "unstake" => Some(Self::Unstake),
            _ => None,
        }
    }
}

/// Effect of a single delta on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    /// Add the amount to the running total.
    Stake(U256),
    /// Reset the running total to zero, whatever was withdrawn.
    Unstake,
}

/// A single normalized change to the total staked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeDelta {
    pub order_key: u64,
    pub kind: DeltaKind,
}

/// Validate raw records and order them ascending by key.
///
/// Ties keep their input order. Fails on the first record that is not a stake or unstake,
/// that has no ordering key, or that is a stake without an amount.
pub fn normalize(records: &[RawStakeEvent]) -> Result<Vec<StakeDelta>, SimulationError> {
    let mut deltas = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let malformed = |reason: String| SimulationError::MalformedEvent { index, reason };

            let kind = EventKind::classify(&record.event)
                .ok_or_else(|| malformed(format!("unrecognized event kind {:?}", record.event)))?;
            let order_key =
                record.order_key.ok_or_else(|| malformed("missing ordering key".to_string()))?;
            let kind = match kind {
                EventKind::Stake => DeltaKind::Stake(
                    record.amount.ok_or_else(|| malformed("stake without amount".to_string()))?,
                ),
                EventKind::Unstake => DeltaKind::Unstake,
            };

            Ok(StakeDelta { order_key, kind })
        })
        .collect::<Result<Vec<_>, SimulationError>>()?;

    // sort_by_key is stable, which keeps same-key events in source order
    deltas.sort_by_key(|delta| delta.order_key);

    tracing::debug!("Normalized {} stake events", deltas.len());
    Ok(deltas)
}
