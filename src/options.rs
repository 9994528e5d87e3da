//! How to create config options from the config file and arguments.

pub mod config;
mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

pub use self::{
    config::{ByteSize, Config, MemoryConfig},
    error::{OptionError, OptionResult},
};
use crate::args::Args;

pub const DEFAULT_CONFIG_FILE_LOCATION: &str = "memprobe/memprobe.toml";

/// Returns the config path to use. If `override_config_path` is specified, then
/// we will use that. If not, then we return the default path if a file exists
/// there.
pub fn get_config_path(override_config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(conf_loc) = override_config_path {
        return Some(conf_loc.to_path_buf());
    }

    dirs::config_dir()
        .map(|path| path.join(DEFAULT_CONFIG_FILE_LOCATION))
        .filter(|path| path.exists())
}

/// Read the config at `path`, or the defaults if there is no path.
///
/// Unlike the default location, an explicitly given path must exist.
pub fn read_config(path: Option<&Path>) -> OptionResult<Config> {
    match path {
        Some(path) => {
            let config_string =
                fs::read_to_string(path).map_err(|err| OptionError::unreadable(path, &err))?;

            Ok(toml_edit::de::from_str(&config_string)?)
        }
        None => Ok(Config::default()),
    }
}

/// Build the final config from the config file and arguments. Arguments win.
pub fn init_config(args: &Args) -> OptionResult<Config> {
    if args.count == 0 {
        return Err(OptionError::invalid_arg_value("count"));
    }

    let config_path = get_config_path(args.config_location.as_deref().map(Path::new));
    crate::debug!("using config path {config_path:?}");

    let mut config = read_config(config_path.as_deref())?;
    if let Some(max_memory) = args.max_memory {
        config.memory.max_memory = Some(max_memory);
    }

    Ok(config)
}
