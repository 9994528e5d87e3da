//! These tests are for testing some invalid config-file-specific options.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::memprobe_command;

#[test]
fn test_toml_mismatch_type() {
    memprobe_command(&["-C", "./tests/invalid_configs/toml_mismatch_type.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid type"));
}

#[test]
fn test_invalid_byte_size() {
    memprobe_command(&["-C", "./tests/invalid_configs/invalid_byte_size.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid byte size"));
}

#[test]
fn test_zero_max_memory() {
    memprobe_command(&["-C", "./tests/invalid_configs/zero_max_memory.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not allowed"));
}

#[test]
fn test_unknown_field() {
    memprobe_command(&["-C", "./tests/invalid_configs/unknown_field.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}

/// This test isn't really needed as this is technically covered by TOML spec.
/// However, I feel like it's worth checking anyways - not like it takes long.
#[test]
fn test_duplicate_key() {
    memprobe_command(&["-C", "./tests/invalid_configs/duplicate_key.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate key"));
}
