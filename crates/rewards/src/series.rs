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

//! The simulation output: one point per time step.

use alloy::primitives::U256;

use crate::{accrual::AccrualOutput, Reward, SimulationError, SimulationParameters};

/// Staked amount and reward at a single time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSeriesPoint {
    pub time: u64,
    pub staked_amount: U256,
    pub reward_amount: Reward,
}

/// Ordered series of exactly `pool_duration + 1` points, indexed by time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSeries {
    points: Vec<TimeSeriesPoint>,
}

impl RewardSeries {
    /// Zip the time domain with the per-step staked totals and rewards.
    ///
    /// Values pass through unchanged; any unit conversion belongs to the consumer.
    pub fn assemble(
        params: &SimulationParameters,
        output: AccrualOutput,
    ) -> Result<Self, SimulationError> {
        let expected = params.pool_duration().checked_add(1);
        let lengths_match = expected.is_some_and(|n| {
            n == output.staked.len() as u64 && n == output.rewards.len() as u64
        });
        if !lengths_match {
            return Err(SimulationError::InvalidParameters(format!(
                "expected {} steps for pool duration {}, got {} staked and {} reward values",
                params.pool_duration().saturating_add(1),
                params.pool_duration(),
                output.staked.len(),
                output.rewards.len()
            )));
        }

        let points = (0..=params.pool_duration())
            .zip(output.staked)
            .zip(output.rewards)
            .map(|((time, staked_amount), reward_amount)| TimeSeriesPoint {
                time,
                staked_amount,
                reward_amount,
            })
            .collect();

        Ok(Self { points })
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<TimeSeriesPoint> {
        self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeSeriesPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for an assembled series, which holds at least the point at time 0.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `time`, if inside the pool duration.
    pub fn get(&self, time: u64) -> Option<&TimeSeriesPoint> {
        usize::try_from(time).ok().and_then(|i| self.points.get(i))
    }

    /// Point at the end of the pool.
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }
}

impl<'a> IntoIterator for &'a RewardSeries {
    type Item = &'a TimeSeriesPoint;
    type IntoIter = std::slice::Iter<'a, TimeSeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RewardRate;

    #[test]
    fn test_assemble() {
        let params = SimulationParameters::new(2, RewardRate::ZERO).unwrap();
        let output = AccrualOutput {
            staked: vec![U256::from(1), U256::from(2), U256::from(3)],
            rewards: vec![Reward::ZERO, Reward::from(U256::from(4)), Reward::from(U256::from(5))],
        };
        let series = RewardSeries::assemble(&params, output).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.get(1),
            Some(&TimeSeriesPoint {
                time: 1,
                staked_amount: U256::from(2),
                reward_amount: Reward::from(U256::from(4))
            })
        );
        assert_eq!(series.last().unwrap().time, 2);
        assert!(series.get(3).is_none());
        assert_eq!(series.iter().map(|p| p.time).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_assemble_length_mismatch() {
        let params = SimulationParameters::new(2, RewardRate::ZERO).unwrap();
        let output = AccrualOutput { staked: vec![U256::ZERO; 2], rewards: vec![Reward::ZERO; 3] };
        assert!(matches!(
            RewardSeries::assemble(&params, output),
            Err(SimulationError::InvalidParameters(_))
        ));
    }
}
