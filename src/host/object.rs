//! Host-side scripting objects: dynamic properties, callable methods, and
//! the foreign error object handed back to callers.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::FreError;
use crate::value::{FreType, FreValue};

use super::bitmap::BitmapData;
use super::byte_array::ByteArrayData;

/// Body of a host-side method: receives the call arguments and produces a
/// foreign value.
pub type MethodBody = Arc<dyn Fn(&[FreValue]) -> Result<FreValue, FreError> + Send + Sync>;

/// A method installed on a host object, with its declared arity.
///
/// The host checks the argument count before running the body; a short or
/// overlong call fails the same way the scripting runtime would, without
/// the body ever executing.
#[derive(Clone)]
pub struct HostMethod {
    arity: usize,
    body: MethodBody,
}

impl HostMethod {
    /// Create a method with a declared arity.
    pub fn new<F>(arity: usize, body: F) -> Self
    where
        F: Fn(&[FreValue]) -> Result<FreValue, FreError> + Send + Sync + 'static,
    {
        Self {
            arity,
            body: Arc::new(body),
        }
    }

    /// Invoke the method, validating the argument count first.
    pub fn invoke(&self, name: &str, args: &[FreValue]) -> Result<FreValue, FreError> {
        if args.len() != self.arity {
            return Err(FreError::InvalidArgument {
                name: name.to_string(),
                expected: self.arity,
                actual: args.len(),
            });
        }
        (self.body)(args)
    }
}

impl fmt::Debug for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMethod")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A host scripting object: class name, property map, named methods.
///
/// Properties are sealed: reading or writing a name that was never defined
/// fails with [`FreError::NoSuchName`].
#[derive(Debug, Clone, Default)]
pub struct ScriptObject {
    class_name: String,
    properties: FxHashMap<String, FreValue>,
    methods: FxHashMap<String, HostMethod>,
}

impl ScriptObject {
    /// Create an empty object of the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            properties: FxHashMap::default(),
            methods: FxHashMap::default(),
        }
    }

    /// Builder: define a property.
    pub fn with_property(mut self, name: impl Into<String>, value: FreValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Builder: install a method.
    pub fn with_method(mut self, name: impl Into<String>, method: HostMethod) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    /// Class name of this object.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Read a property.
    pub fn get_property(&self, name: &str) -> Result<FreValue, FreError> {
        self.properties
            .get(name)
            .cloned()
            .ok_or_else(|| FreError::no_such_name(name))
    }

    /// Write an existing property.
    pub fn set_property(&mut self, name: &str, value: FreValue) -> Result<(), FreError> {
        match self.properties.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FreError::no_such_name(name)),
        }
    }

    /// Invoke a named method.
    pub fn call_method(&self, name: &str, args: &[FreValue]) -> Result<FreValue, FreError> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| FreError::no_such_name(name))?;
        method.invoke(name, args)
    }

    /// Clone the property map for inspection.
    pub fn to_map(&self) -> FxHashMap<String, FreValue> {
        self.properties.clone()
    }
}

/// Foreign error object handed back to the host caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorObject {
    /// Human-readable failure description
    pub message: String,
    /// Numeric error code, see `FreError::code`
    pub id: i32,
    /// Source location of the catch site, `file:line:column`
    pub source: String,
}

/// A host-owned object addressed by handle.
#[derive(Debug)]
pub enum HostObject {
    /// Ordered sequence of foreign values
    Array(Vec<FreValue>),
    /// Scripting object with properties and methods
    Object(ScriptObject),
    /// Byte buffer with the acquire/release protocol
    ByteArray(ByteArrayData),
    /// Pixel buffer with the acquire/release protocol
    Bitmap(BitmapData),
    /// Error object constructed at a handler's catch site
    Error(ErrorObject),
}

impl HostObject {
    /// Get a human-readable name for this object's class.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostObject::Array(_) => "Array",
            HostObject::Object(_) => "Object",
            HostObject::ByteArray(_) => "ByteArray",
            HostObject::Bitmap(_) => "BitmapData",
            HostObject::Error(_) => "Error",
        }
    }

    /// The type tag this object resolves to.
    pub fn fre_type(&self) -> FreType {
        match self {
            HostObject::Array(_) => FreType::Array,
            HostObject::Object(_) => FreType::Object,
            HostObject::ByteArray(_) => FreType::ByteArray,
            HostObject::Bitmap(_) => FreType::BitmapData,
            HostObject::Error(_) => FreType::Error,
        }
    }

    /// Narrow to an array.
    pub fn as_array(&self) -> Result<&Vec<FreValue>, FreError> {
        match self {
            HostObject::Array(elements) => Ok(elements),
            other => Err(FreError::WrongClass {
                expected: "Array",
                actual: other.type_name(),
            }),
        }
    }

    /// Narrow to a mutable array.
    pub fn as_array_mut(&mut self) -> Result<&mut Vec<FreValue>, FreError> {
        match self {
            HostObject::Array(elements) => Ok(elements),
            other => Err(FreError::WrongClass {
                expected: "Array",
                actual: other.type_name(),
            }),
        }
    }

    /// Narrow to a scripting object.
    pub fn as_object(&self) -> Result<&ScriptObject, FreError> {
        match self {
            HostObject::Object(object) => Ok(object),
            other => Err(FreError::WrongClass {
                expected: "Object",
                actual: other.type_name(),
            }),
        }
    }

    /// Narrow to a mutable scripting object.
    pub fn as_object_mut(&mut self) -> Result<&mut ScriptObject, FreError> {
        match self {
            HostObject::Object(object) => Ok(object),
            other => Err(FreError::WrongClass {
                expected: "Object",
                actual: other.type_name(),
            }),
        }
    }
}
