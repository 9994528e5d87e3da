//! Argument parsing via clap.

use std::time::Duration;

use clap::*;
use indoc::indoc;

use crate::options::config::ByteSize;

const TEMPLATE: &str = indoc! {
    "{name} {version}

    {about}

    {usage-heading} {usage}

    {all-args}"
};

const USAGE: &str = "memprobe [OPTIONS]";

/// Parse a sampling interval: a number of milliseconds or a human duration
/// like `5s`.
fn parse_interval(s: &str) -> Result<Duration, String> {
    let interval = match s.trim().parse::<u64>() {
        Ok(millis) => Duration::from_millis(millis),
        Err(_) => humantime::parse_duration(s.trim())
            .map_err(|err| format!("'{s}' is not a valid duration: {err}"))?,
    };

    if interval.is_zero() {
        Err("the interval must be greater than zero".to_string())
    } else {
        Ok(interval)
    }
}

/// The arguments for memprobe.
#[derive(Parser, Debug)]
#[command(
    name = crate_name!(),
    version = crate_version!(),
    about = crate_description!(),
    color = ColorChoice::Auto,
    help_template = TEMPLATE,
    override_usage = USAGE,
)]
pub struct Args {
    #[arg(
        short = 'C',
        long = "config_location",
        value_name = "PATH",
        help = "Sets the location of the config file.",
        long_help = "Sets the location of the config file. Expects a config file in the TOML format. \
                    If not set, the default location is used if a file exists there."
    )]
    pub config_location: Option<String>,

    #[arg(
        long = "max_memory",
        value_name = "SIZE",
        value_parser = |s: &str| s.parse::<ByteSize>(),
        help = "Declares a memory ceiling for the maximum memory.",
        long_help = "Declares a memory ceiling for the maximum memory, e.g. 4096 or 512MiB. \
                    Overrides the config file."
    )]
    pub max_memory: Option<ByteSize>,

    #[arg(long, help = "Prints every sample as a JSON line.")]
    pub json: bool,

    #[arg(
        short = 'i',
        long,
        value_name = "TIME",
        default_value = "1s",
        value_parser = parse_interval,
        help = "Time between samples.",
        long_help = "Time between samples. Takes a number in milliseconds or a human duration \
                    (e.g. 5s). Defaults to 1s."
    )]
    pub interval: Duration,

    #[arg(
        short = 'n',
        long,
        value_name = "N",
        default_value_t = 1,
        help = "Number of samples to take."
    )]
    pub count: u64,
}

impl Args {
    pub fn get() -> Self {
        Self::parse()
    }
}
