//! These tests are mostly here just to ensure that invalid results will be caught when passing arguments.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::{memprobe_command, no_cfg_memprobe_command};

#[test]
fn test_plain_output() {
    no_cfg_memprobe_command(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("max memory:"))
        .stdout(predicate::str::contains("committed memory:"))
        .stdout(predicate::str::contains("collection time:   0 ms"))
        .stdout(predicate::str::contains("total physical:"))
        .stdout(predicate::str::contains("free physical:"));
}

#[test]
fn test_json_output() {
    let output = no_cfg_memprobe_command(&["--json"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 1);

    let sample: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    let max = sample["max_memory"].as_u64().unwrap();
    let committed = sample["committed_memory"].as_u64().unwrap();
    assert!(committed <= max);
    assert_eq!(sample["collection_time_ms"].as_u64(), Some(0));

    if let (Some(total), Some(free)) = (
        sample["total_physical_memory"].as_u64(),
        sample["free_physical_memory"].as_u64(),
    ) {
        assert!(total >= free);
    }
}

#[test]
fn test_multiple_samples() {
    let output = no_cfg_memprobe_command(&["--json", "-n", "3", "-i", "10ms"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let samples = stdout
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(samples.len(), 3);

    // The maximum is fixed for the lifetime of the probe.
    let max = &samples[0]["max_memory"];
    assert!(samples.iter().all(|sample| &sample["max_memory"] == max));
}

#[test]
fn test_max_memory_arg() {
    no_cfg_memprobe_command(&["--max_memory", "1MiB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max memory:        1048576 B (declared)"));
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
#[test]
fn test_committed_memory_ignores_declared_ceiling() {
    let output = no_cfg_memprobe_command(&["--max_memory", "4KiB", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let sample: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(sample["max_memory"].as_u64(), Some(4096));
    assert!(sample["committed_memory"].as_u64().unwrap() > 4096);
}

#[test]
fn test_invalid_max_memory() {
    no_cfg_memprobe_command(&["--max_memory", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid byte size"));
}

#[test]
fn test_zero_interval() {
    no_cfg_memprobe_command(&["-i", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn test_invalid_interval() {
    no_cfg_memprobe_command(&["-i", "whenever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid duration"));
}

#[test]
fn test_zero_count() {
    no_cfg_memprobe_command(&["-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'--count' was set with an invalid value"));
}

#[test]
fn test_missing_config_file() {
    memprobe_command(&["-C", "./tests/valid_configs/does_not_exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read the config file"));
}

#[test]
fn test_version() {
    memprobe_command(&["--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
