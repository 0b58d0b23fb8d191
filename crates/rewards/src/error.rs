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

use thiserror::Error;

/// Errors that terminate a simulation run. No partial output is produced alongside any of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// An input record is neither a stake nor an unstake, or has no usable ordering key.
    #[error("Malformed event at index {index}: {reason}")]
    MalformedEvent { index: usize, reason: String },

    #[error("Invalid simulation parameters: {0}")]
    InvalidParameters(String),

    /// The ledger was asked for a time earlier than one it already answered.
    #[error("Ledger queried at time {requested} after time {last}")]
    SequenceViolation { requested: u64, last: u64 },

    #[error("Reward arithmetic overflowed at time {time}")]
    Overflow { time: u64 },
}
