//! Tests config files that have sometimes caused issues despite being valid.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::memprobe_command;

#[test]
fn test_empty() {
    memprobe_command(&["-C", "./tests/valid_configs/empty_config.toml"])
        .assert()
        .success();
}

#[test]
fn test_all_memory_options() {
    memprobe_command(&["-C", "./tests/valid_configs/all_memory.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max memory:        67108864 B (declared)"));
}

#[test]
fn test_numeric_max_memory() {
    memprobe_command(&["-C", "./tests/valid_configs/numeric_max_memory.toml", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_memory\":1048576"));
}

#[test]
fn test_arg_overrides_config() {
    memprobe_command(&[
        "-C",
        "./tests/valid_configs/all_memory.toml",
        "--max_memory",
        "2MiB",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("max memory:        2097152 B (declared)"));
}

#[test]
fn test_long_config_location() {
    memprobe_command(&[
        "--config_location",
        "./tests/valid_configs/numeric_max_memory.toml",
        "--json",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"max_memory\":1048576"));
}
