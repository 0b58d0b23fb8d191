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

//! Printing of reward series and stake segments.

use alloy::primitives::{utils::format_units, U256};
use anyhow::Result;
use lockpool_rewards::{
    Reward, RewardSeries, StakeSegment, TimeSeriesPoint, REWARD_DECIMALS,
};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Turns simulation results into text for stdout.
pub trait Renderer {
    fn render_series(&self, series: &RewardSeries) -> Result<String>;

    fn render_segments(&self, segments: &[StakeSegment]) -> Result<String>;
}

#[derive(Serialize, Tabled)]
struct SeriesRow {
    #[tabled(rename = "Time")]
    time: u64,
    #[tabled(rename = "Staked")]
    staked_amount: String,
    #[tabled(rename = "Reward")]
    reward_amount: String,
}

#[derive(Serialize, Tabled)]
struct SegmentRow {
    #[tabled(rename = "Start")]
    start: u64,
    #[tabled(rename = "End")]
    end: u64,
    #[tabled(rename = "Staked")]
    staked: String,
    #[tabled(rename = "Blocks")]
    blocks_passed: u64,
    #[tabled(rename = "Reward")]
    reward: String,
}

/// Amount formatting shared by the renderers.
#[derive(Debug, Clone, Copy)]
struct Units {
    decimals: Option<u8>,
}

impl Units {
    fn format(&self, amount: U256) -> Result<String> {
        match self.decimals {
            None => Ok(amount.to_string()),
            Some(decimals) => to_units(amount, decimals),
        }
    }

    /// Rewards carry their own fractional digits, which stack on top of `decimals`.
    fn format_reward(&self, reward: Reward) -> Result<String> {
        match self.decimals {
            None => Ok(reward.to_string()),
            Some(decimals) => {
                let units = decimals.checked_add(REWARD_DECIMALS).ok_or_else(|| {
                    anyhow::anyhow!("{decimals} decimals is too many for reward amounts")
                })?;
                to_units(reward.scaled(), units)
            }
        }
    }

    fn series_rows(&self, series: &RewardSeries, every: u64) -> Result<Vec<SeriesRow>> {
        sample(series.points(), every)
            .map(|point| -> Result<SeriesRow> {
                Ok(SeriesRow {
                    time: point.time,
                    staked_amount: self.format(point.staked_amount)?,
                    reward_amount: self.format_reward(point.reward_amount)?,
                })
            })
            .collect()
    }

    fn segment_rows(&self, segments: &[StakeSegment]) -> Result<Vec<SegmentRow>> {
        segments
            .iter()
            .map(|segment| -> Result<SegmentRow> {
                Ok(SegmentRow {
                    start: segment.start,
                    end: segment.end,
                    staked: self.format(segment.staked)?,
                    blocks_passed: segment.blocks_passed,
                    reward: self.format_reward(segment.reward)?,
                })
            })
            .collect()
    }
}

/// `amount / 10^decimals` as a decimal string without trailing zeros.
fn to_units(amount: U256, decimals: u8) -> Result<String> {
    let formatted = format_units(amount, decimals).map_err(|e| {
        anyhow::anyhow!("Failed to format {amount} with {decimals} decimals: {e}")
    })?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted.trim_end_matches('0').trim_end_matches('.').to_string())
}

/// Every `every`th point counted from time 0, plus the final point.
fn sample(points: &[TimeSeriesPoint], every: u64) -> impl Iterator<Item = &TimeSeriesPoint> {
    let every = every.max(1);
    let last = points.len().saturating_sub(1);
    points
        .iter()
        .enumerate()
        .filter(move |(i, _)| *i as u64 % every == 0 || *i == last)
        .map(|(_, point)| point)
}

/// Human readable tables.
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    units: Units,
    every: u64,
}

impl TableRenderer {
    pub fn new(decimals: Option<u8>, every: u64) -> Self {
        Self { units: Units { decimals }, every }
    }
}

impl Renderer for TableRenderer {
    fn render_series(&self, series: &RewardSeries) -> Result<String> {
        let rows = self.units.series_rows(series, self.every)?;
        Ok(Table::new(rows).with(Style::modern()).to_string())
    }

    fn render_segments(&self, segments: &[StakeSegment]) -> Result<String> {
        let rows = self.units.segment_rows(segments)?;
        Ok(Table::new(rows).with(Style::modern()).to_string())
    }
}

/// JSON arrays with amounts as decimal strings, so no precision is lost to float parsers.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    units: Units,
    every: u64,
}

impl JsonRenderer {
    pub fn new(decimals: Option<u8>, every: u64) -> Self {
        Self { units: Units { decimals }, every }
    }
}

impl Renderer for JsonRenderer {
    fn render_series(&self, series: &RewardSeries) -> Result<String> {
        let rows = self.units.series_rows(series, self.every)?;
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    fn render_segments(&self, segments: &[StakeSegment]) -> Result<String> {
        let rows = self.units.segment_rows(segments)?;
        Ok(serde_json::to_string_pretty(&rows)?)
    }
}

#[cfg(test)]
mod tests {
    use lockpool_rewards::{simulate, RewardRate, SimulationParameters, StakeSchedule};
    use serde_json::Value;

    use super::*;

    fn series(duration: i64, stake: U256) -> RewardSeries {
        let rate: RewardRate = "10".parse().unwrap();
        let params = SimulationParameters::new(duration, rate).unwrap();
        simulate(&params, &StakeSchedule::default().with_stake(0, stake).to_records()).unwrap()
    }

    #[test]
    fn test_sample_keeps_final_point() {
        let series = series(10, U256::from(1000));
        let times: Vec<u64> = sample(series.points(), 4).map(|p| p.time).collect();
        assert_eq!(times, vec![0, 4, 8, 10]);
        let times: Vec<u64> = sample(series.points(), 5).map(|p| p.time).collect();
        assert_eq!(times, vec![0, 5, 10]);
        assert_eq!(sample(series.points(), 1).count(), 11);
    }

    #[test]
    fn test_json_amounts_are_strings() {
        let series = series(200, U256::from(1000));
        let out = JsonRenderer::new(None, 100).render_series(&series).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[1]["time"], 100);
        assert_eq!(value[1]["staked_amount"], "1000");
        assert_eq!(value[1]["reward_amount"], "50");
        assert_eq!(value[2]["reward_amount"], "100");
    }

    #[test]
    fn test_decimals_convert_units() {
        let stake = U256::from(20_000_000_000_000_000_000u128);
        let series = series(1000, stake);
        let out = JsonRenderer::new(Some(18), 1).render_series(&series).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[18]["reward_amount"], "0.036");
        assert_eq!(value[18]["staked_amount"], "20");
        // 20 tokens over 1 of 1000 blocks at 10%
        assert_eq!(value[1]["reward_amount"], "0.002");
    }

    #[test]
    fn test_fractional_rewards_rendered_exactly() {
        let series = series(200, U256::from(3));
        let out = JsonRenderer::new(None, 200).render_series(&series).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[1]["reward_amount"], "0.3");

        let out = JsonRenderer::new(Some(1), 200).render_series(&series).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[1]["staked_amount"], "0.3");
        assert_eq!(value[1]["reward_amount"], "0.03");
    }

    #[test]
    fn test_to_units() {
        assert_eq!(to_units(U256::from(1500), 3).unwrap(), "1.5");
        assert_eq!(to_units(U256::from(2000), 3).unwrap(), "2");
        assert_eq!(to_units(U256::ZERO, 3).unwrap(), "0");
        assert!(to_units(U256::from(1), 78).is_err());
    }

    #[test]
    fn test_table_has_headers() {
        let series = series(4, U256::from(1000));
        let out = TableRenderer::new(None, 1).render_series(&series).unwrap();
        assert!(out.contains("Time"));
        assert!(out.contains("Staked"));
        assert!(out.contains("Reward"));
        assert!(out.contains("1000"));
    }
}
