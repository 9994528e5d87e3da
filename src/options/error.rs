use std::{borrow::Cow, path::Path};

/// A user-facing problem with the config file or the arguments.
///
/// Use _single quotes_ (e.g. `'bad'`) around offending values.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum OptionError {
    #[error("Configuration file error: {0}")]
    Config(Cow<'static, str>),
    #[error("Argument error: {0}")]
    Argument(Cow<'static, str>),
}

impl OptionError {
    /// Create a new [`OptionError::Config`].
    pub(crate) fn config<R: Into<Cow<'static, str>>>(reason: R) -> Self {
        OptionError::Config(reason.into())
    }

    /// The config file at `path` exists in the arguments but can't be read.
    pub(crate) fn unreadable(path: &Path, err: &std::io::Error) -> Self {
        OptionError::config(format!(
            "could not read the config file at '{}': {err}",
            path.display()
        ))
    }

    /// Create a new [`OptionError::Argument`] for an invalid value.
    pub(crate) fn invalid_arg_value(value: &str) -> Self {
        OptionError::Argument(Cow::Owned(format!(
            "'--{value}' was set with an invalid value, please update your arguments."
        )))
    }
}

pub type OptionResult<T> = Result<T, OptionError>;

impl From<toml_edit::de::Error> for OptionError {
    fn from(err: toml_edit::de::Error) -> Self {
        OptionError::Config(err.to_string().into())
    }
}
