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

//! Integration tests for the lockpool CLI.

use std::io::Write;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

fn lockpool() -> Command {
    let mut cmd = Command::cargo_bin("lockpool").unwrap();
    cmd.env_remove("RPC_URL")
        .env_remove("RUST_LOG")
        .env_remove("POOL_DURATION")
        .env_remove("REWARD_RATE")
        .env("NO_COLOR", "1");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_simulate_single_stake() {
    let value = json_stdout(lockpool().args([
        "simulate",
        "--pool-duration",
        "200",
        "--reward-rate",
        "10",
        "--stake",
        "0:1000",
        "--format",
        "json",
    ]));

    let points = value.as_array().unwrap();
    assert_eq!(points.len(), 201);
    assert_eq!(points[0]["reward_amount"], "0");
    assert_eq!(points[100]["time"], 100);
    assert_eq!(points[100]["reward_amount"], "50");
    assert_eq!(points[200]["staked_amount"], "1000");
    assert_eq!(points[200]["reward_amount"], "100");
}

#[test]
fn test_simulate_unstake_with_sampling() {
    let value = json_stdout(lockpool().args([
        "simulate",
        "--pool-duration=200",
        "--reward-rate=10",
        "--stake=0:1000",
        "--unstake=150",
        "--format=json",
        "--every=50",
    ]));

    let points = value.as_array().unwrap();
    let times: Vec<u64> = points.iter().map(|p| p["time"].as_u64().unwrap()).collect();
    assert_eq!(times, vec![0, 50, 100, 150, 200]);
    assert_eq!(points[2]["reward_amount"], "50");
    assert_eq!(points[3]["staked_amount"], "0");
    assert_eq!(points[3]["reward_amount"], "0");
}

#[test]
fn test_simulate_from_schedule_file() {
    let mut schedule = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(schedule, "stakes:\n  - time: 0\n    amount: 500\n  - time: 100\n    amount: 500")
        .unwrap();

    let value = json_stdout(lockpool().args([
        "simulate",
        "--pool-duration=200",
        "--reward-rate=10",
        "--format=json",
        "--schedule",
        schedule.path().to_str().unwrap(),
    ]));
    assert_eq!(value[99]["staked_amount"], "500");
    assert_eq!(value[99]["reward_amount"], "24.75");
    assert_eq!(value[150]["staked_amount"], "1000");
    assert_eq!(value[150]["reward_amount"], "75");
}

#[test]
fn test_simulate_table_output() {
    lockpool()
        .args(["simulate", "--pool-duration=4", "--reward-rate=10", "--stake=0:1000"])
        .assert()
        .success()
        .stdout(contains("Reward"))
        .stdout(contains("1000"));
}

#[test]
fn test_invalid_pool_duration() {
    for duration in ["0", "-5"] {
        lockpool()
            .args(["simulate", "--reward-rate=10", "--stake=0:1000"])
            .arg(format!("--pool-duration={duration}"))
            .assert()
            .failure()
            .stderr(contains("pool duration must be positive"));
    }
}

#[test]
fn test_oversized_pool_duration() {
    lockpool()
        .args(["simulate", "--reward-rate=10", "--stake=0:1000"])
        .arg(format!("--pool-duration={}", i64::MAX))
        .assert()
        .failure()
        .stderr(contains("too long to simulate"));
}

#[test]
fn test_negative_reward_rate() {
    lockpool()
        .args(["simulate", "--pool-duration=200", "--reward-rate=-1"])
        .assert()
        .failure()
        .stderr(contains("non-negative"));
}

#[test]
fn test_replay_events_file() {
    let mut events = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        events,
        r#"[
            {{"event": "Staked", "blockNumber": 100, "amount": "500"}},
            {{"event": "Staked", "blockNumber": 0, "amount": 500}},
            {{"event": "Unstaked", "blockNumber": 150, "amount": "1000"}}
        ]"#
    )
    .unwrap();

    let value = json_stdout(lockpool().args([
        "replay",
        "--pool-duration=200",
        "--reward-rate=10",
        "--format=json",
        "--events",
        events.path().to_str().unwrap(),
    ]));
    assert_eq!(value[50]["staked_amount"], "500");
    assert_eq!(value[149]["staked_amount"], "1000");
    assert_eq!(value[149]["reward_amount"], "74.5");
    assert_eq!(value[150]["staked_amount"], "0");
}

#[test]
fn test_replay_malformed_event() {
    let mut events = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        events,
        r#"[
            {{"event": "Staked", "blockNumber": 0, "amount": "1"}},
            {{"event": "Claimed", "blockNumber": 5}}
        ]"#
    )
    .unwrap();

    lockpool()
        .args(["replay", "--pool-duration=200", "--reward-rate=10", "--events"])
        .arg(events.path())
        .assert()
        .failure()
        .stderr(contains("Malformed event at index 1"));
}

#[test]
fn test_segments() {
    let value = json_stdout(lockpool().args([
        "segments",
        "--pool-duration=200",
        "--reward-rate=10",
        "--stake=0:500",
        "--stake=100:500",
        "--format=json",
    ]));

    let segments = value.as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["start"], 0);
    assert_eq!(segments[0]["end"], 100);
    assert_eq!(segments[0]["reward"], "25");
    assert_eq!(segments[1]["staked"], "1000");
    assert_eq!(segments[1]["blocks_passed"], 100);
    assert_eq!(segments[1]["reward"], "50");
}

#[test]
fn test_live_requires_rpc_url() {
    lockpool()
        .args([
            "live",
            "--pool-address",
            "0x06A2bD2A16BC899fdB3fB384228c6D8858028aaE",
            "--user",
            "0x5047fa5adA80E29816E91DC87E1451eBEe21A021",
        ])
        .assert()
        .failure()
        .stderr(contains("RPC URL not provided"));
}

#[test]
fn test_json_logs_on_stderr() {
    let assert = lockpool()
        .args([
            "--log-json",
            "--log-level=debug",
            "simulate",
            "--pool-duration=10",
            "--reward-rate=10",
            "--stake=0:1000",
            "--format=json",
        ])
        .assert()
        .success()
        .stderr(contains(r#""level":"DEBUG""#));

    // stdout carries only the rendered series.
    let value: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 11);
}
