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

//! Forward-only replay of stake deltas.

use alloy::primitives::U256;

use crate::{
    events::{DeltaKind, StakeDelta},
    SimulationError,
};

/// Tracks the total staked as time advances through a sorted sequence of deltas.
///
/// The ledger is a one-pass cursor: queries must come in non-decreasing time order, and each
/// simulation run needs its own instance.
#[derive(Debug, Clone)]
pub struct StakeLedger {
    deltas: Vec<StakeDelta>,
    cursor: usize,
    total_staked: U256,
    last_query: Option<u64>,
}

impl StakeLedger {
    /// Create a ledger over `deltas`, ordered by `order_key`.
    ///
    /// Deltas sharing a key keep their given order, so output of
    /// [normalize](crate::events::normalize) is used as is.
    pub fn new(mut deltas: Vec<StakeDelta>) -> Self {
        deltas.sort_by_key(|delta| delta.order_key);
        Self { deltas, cursor: 0, total_staked: U256::ZERO, last_query: None }
    }

    /// Total staked at `time`, after applying every delta with `order_key <= time`.
    ///
    /// Re-querying the same time is fine; querying an earlier one is a
    /// [SimulationError::SequenceViolation].
    pub fn total_staked_at(&mut self, time: u64) -> Result<U256, SimulationError> {
        if let Some(last) = self.last_query {
            if time < last {
                return Err(SimulationError::SequenceViolation { requested: time, last });
            }
        }
        self.last_query = Some(time);

        while let Some(&delta) = self.deltas.get(self.cursor) {
            if delta.order_key > time {
                break;
            }
            self.apply(delta.kind, time)?;
            self.cursor += 1;
        }

        Ok(self.total_staked)
    }

    /// Current running total, without advancing the cursor.
    pub fn total_staked(&self) -> U256 {
        self.total_staked
    }

    /// Number of deltas not yet applied.
    pub fn pending(&self) -> usize {
        self.deltas.len() - self.cursor
    }

    fn apply(&mut self, kind: DeltaKind, time: u64) -> Result<(), SimulationError> {
        match kind {
            DeltaKind::Stake(amount) => {
                self.total_staked = self
                    .total_staked
                    .checked_add(amount)
                    .ok_or(SimulationError::Overflow { time })?;
            }
            DeltaKind::Unstake => self.total_staked = U256::ZERO,
        }
        Ok(())
    }
}
