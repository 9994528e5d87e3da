//! A small name/attribute lookup facility over host-level metrics.
//!
//! Objects are addressed by an [`ObjectName`] of the form
//! `domain:key=value[,key=value...]`, and expose typed attributes by name.
//! Which objects exist is decided once, when the server is built, based on what
//! the current platform can report.

pub mod os;

use std::{fmt, str::FromStr};

use hashbrown::HashMap;

pub use self::os::OperatingSystemInfo;
use crate::error::ManagementError;

/// The object that carries host operating system attributes.
pub const OPERATING_SYSTEM: &str = "host:type=OperatingSystem";

/// Total installed physical memory, in bytes.
pub const TOTAL_PHYSICAL_MEMORY_SIZE: &str = "TotalPhysicalMemorySize";

/// Currently free physical memory, in bytes.
pub const FREE_PHYSICAL_MEMORY_SIZE: &str = "FreePhysicalMemorySize";

/// The identifier of a management object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectName {
    domain: String,
    properties: Vec<(String, String)>,
}

impl ObjectName {
    /// Parse an object name, e.g. `host:type=OperatingSystem`.
    pub fn new(name: &str) -> Result<Self, ManagementError> {
        let malformed = |reason| ManagementError::MalformedObjectName {
            name: name.to_string(),
            reason,
        };

        let (domain, keys) = name.split_once(':').ok_or_else(|| malformed("missing ':'"))?;
        if domain.is_empty() {
            return Err(malformed("empty domain"));
        }
        if keys.is_empty() {
            return Err(malformed("no key properties"));
        }

        let properties = keys
            .split(',')
            .map(|property| {
                let (key, value) = property
                    .split_once('=')
                    .ok_or_else(|| malformed("key property without '='"))?;

                if key.is_empty() || value.is_empty() {
                    Err(malformed("empty key or value"))
                } else {
                    Ok((key.to_string(), value.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ObjectName {
            domain: domain.to_string(),
            properties,
        })
    }
}

impl FromStr for ObjectName {
    type Err = ManagementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectName::new(s)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }

        Ok(())
    }
}

/// The value of an attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    U64(u64),
    Text(String),
}

impl AttributeValue {
    fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::U64(_) => "u64",
            AttributeValue::Text(_) => "text",
        }
    }
}

/// Types that an [`AttributeValue`] can be converted into.
pub trait FromAttribute: Sized {
    /// Name of the expected type, used in error messages.
    const TYPE_NAME: &'static str;

    /// Convert, or hand back the value if it holds another type.
    fn from_attribute(value: AttributeValue) -> Result<Self, AttributeValue>;

    /// Convert, reporting a mismatch against `attribute` as a reflection failure.
    fn extract(attribute: &str, value: AttributeValue) -> Result<Self, ManagementError> {
        Self::from_attribute(value).map_err(|other| ManagementError::Reflection {
            attribute: attribute.to_string(),
            expected: Self::TYPE_NAME,
            found: other.type_name(),
        })
    }
}

impl FromAttribute for u64 {
    const TYPE_NAME: &'static str = "u64";

    fn from_attribute(value: AttributeValue) -> Result<Self, AttributeValue> {
        match value {
            AttributeValue::U64(v) => Ok(v),
            other => Err(other),
        }
    }
}

/// An object exposing named attributes.
pub trait ManagedObject: Send + Sync {
    /// Read an attribute. Unknown names must return
    /// [`ManagementError::AttributeNotFound`].
    fn attribute(&self, name: &str) -> Result<AttributeValue, ManagementError>;
}

/// Something that can resolve objects and read their attributes.
pub trait ManagementServer: Send + Sync {
    fn get_attribute(
        &self, object: &ObjectName, attribute: &str,
    ) -> Result<AttributeValue, ManagementError>;
}

/// The management server for the current platform.
pub struct PlatformManagementServer {
    objects: HashMap<ObjectName, Box<dyn ManagedObject>>,
}

impl PlatformManagementServer {
    /// Build a server with every object the current platform supports.
    pub fn new() -> Self {
        let mut server = Self::empty();

        match OperatingSystemInfo::for_platform() {
            Some(info) => {
                crate::debug!("registering {OPERATING_SYSTEM}");
                server.register(os::object_name(), info);
            }
            None => {
                crate::info!("{OPERATING_SYSTEM} is not available on this platform");
            }
        }

        server
    }

    /// Build a server with no objects at all.
    pub fn empty() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    /// Register an object, replacing any previous one with the same name.
    pub fn register<O: ManagedObject + 'static>(&mut self, name: ObjectName, object: O) {
        self.objects.insert(name, Box::new(object));
    }
}

impl Default for PlatformManagementServer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlatformManagementServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformManagementServer")
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ManagementServer for PlatformManagementServer {
    fn get_attribute(
        &self, object: &ObjectName, attribute: &str,
    ) -> Result<AttributeValue, ManagementError> {
        self.objects
            .get(object)
            .ok_or_else(|| ManagementError::InstanceNotFound(object.to_string()))?
            .attribute(attribute)
    }
}
