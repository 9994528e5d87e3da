use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::runtime::RuntimeLimits;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// The limits a [`ProcessRuntime`](crate::runtime::ProcessRuntime) should use.
    pub fn runtime_limits(&self) -> RuntimeLimits {
        let defaults = RuntimeLimits::default();

        RuntimeLimits {
            declared_max: self.memory.max_memory.map(|size| size.bytes()),
            cgroup_limit: self.memory.cgroup_limit.unwrap_or(defaults.cgroup_limit),
            address_space_limit: self
                .memory
                .address_space_limit
                .unwrap_or(defaults.address_space_limit),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// A declared memory ceiling for this process.
    pub max_memory: Option<ByteSize>,
    /// Whether the cgroup memory limit bounds the maximum. Defaults to true.
    pub cgroup_limit: Option<bool>,
    /// Whether `RLIMIT_AS` bounds the maximum. Defaults to true.
    pub address_space_limit: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StringOrNum {
    String(String),
    Num(u64),
}

/// A non-zero number of bytes, written as a plain integer or as a string with
/// a unit, e.g. `"512MiB"` or `"2 GB"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "StringOrNum")]
pub struct ByteSize(u64);

impl ByteSize {
    pub fn bytes(self) -> u64 {
        self.0
    }
}

impl TryFrom<StringOrNum> for ByteSize {
    type Error = String;

    fn try_from(value: StringOrNum) -> Result<Self, Self::Error> {
        match value {
            StringOrNum::String(s) => s.parse(),
            StringOrNum::Num(0) => Err("a byte size of '0' is not allowed".to_string()),
            StringOrNum::Num(n) => Ok(ByteSize(n)),
        }
    }
}

impl FromStr for ByteSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("'{s}' is not a valid byte size");

        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let number: u64 = number.parse().map_err(|_| invalid())?;
        let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "b" => 1,
            "kb" => 1000,
            "mb" => 1000_u64.pow(2),
            "gb" => 1000_u64.pow(3),
            "tb" => 1000_u64.pow(4),
            "kib" => 1 << 10,
            "mib" => 1 << 20,
            "gib" => 1 << 30,
            "tib" => 1 << 40,
            _ => return Err(invalid()),
        };

        match number.checked_mul(multiplier) {
            Some(0) => Err(format!("a byte size of '{s}' is not allowed")),
            Some(bytes) => Ok(ByteSize(bytes)),
            None => Err(format!("'{s}' is too large")),
        }
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} B", self.0)
    }
}
