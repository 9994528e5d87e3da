//! Errors surfaced by memory queries.

use thiserror::Error;

/// A type alias for results of fallible memory queries.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// An error returned by a [`MemoryProbe`](crate::MemoryProbe) query.
///
/// There is intentionally a single kind: from a caller's point of view every
/// failure means the metric cannot be obtained in this environment. Treat it as
/// a permanent capability fact, not a transient fault.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The metric is not available on this runtime/OS combination.
    #[error("({object}).{attribute} is unsupported on this platform.")]
    UnsupportedOperation {
        /// The management object that was queried.
        object: String,
        /// The attribute that was queried.
        attribute: String,
        /// The failure reported by the management layer.
        #[source]
        cause: ManagementError,
    },
}

impl ProbeError {
    /// The management object named by this error.
    pub fn object(&self) -> &str {
        match self {
            ProbeError::UnsupportedOperation { object, .. } => object,
        }
    }

    /// The attribute named by this error.
    pub fn attribute(&self) -> &str {
        match self {
            ProbeError::UnsupportedOperation { attribute, .. } => attribute,
        }
    }

    /// The underlying management-layer failure.
    pub fn cause(&self) -> &ManagementError {
        match self {
            ProbeError::UnsupportedOperation { cause, .. } => cause,
        }
    }
}

/// A failure inside the management layer.
///
/// These never reach callers of [`MemoryProbe`](crate::MemoryProbe) directly;
/// they are only visible as the source of a [`ProbeError`].
#[derive(Debug, Error)]
pub enum ManagementError {
    /// No object is registered under the name.
    #[error("no management object is registered as '{0}'")]
    InstanceNotFound(String),

    /// The object exists but does not expose the attribute.
    #[error("'{object}' has no attribute '{attribute}'")]
    AttributeNotFound { object: String, attribute: String },

    /// The object name could not be parsed.
    #[error("'{name}' is not a valid object name: {reason}")]
    MalformedObjectName { name: String, reason: &'static str },

    /// The attribute exists but holds a different type than requested.
    #[error("attribute '{attribute}' holds a {found} value, expected {expected}")]
    Reflection {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The object failed while producing the attribute.
    #[error("management object failed: {0}")]
    Management(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ManagementError {
    /// Wrap an arbitrary platform failure.
    pub fn management<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        ManagementError::Management(err.into())
    }
}
