//! Error types for the bridge boundary.

use thiserror::Error;

/// Errors that can occur when converting a foreign value to a native type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The argument slot held a null foreign value
    #[error("null value cannot be converted to {target_type}")]
    NullValue { target_type: &'static str },

    /// Integer overflow during conversion
    #[error("integer overflow: value {value} does not fit in {target_type}")]
    IntegerOverflow { value: i64, target_type: &'static str },

    /// Float conversion error
    #[error("float conversion error: value {value} cannot be represented as {target_type}")]
    FloatConversion {
        value: f64,
        target_type: &'static str,
    },
}

/// Errors surfaced by the host object model.
///
/// These cover every failure the marshalling layer can report to a handler:
/// missing names, short method calls, stale handles, class mismatches and
/// the buffer lock protocol. Handlers recover all of them; nothing unwinds
/// past a handler into the dispatcher.
#[derive(Debug, Error)]
pub enum FreError {
    /// Error converting arguments or return values
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// A property or method with this name does not exist on the object
    #[error("no such name: {name}")]
    NoSuchName { name: String },

    /// A method was invoked with the wrong number of arguments
    #[error("invalid argument count: {name} expects {expected} arguments, got {actual}")]
    InvalidArgument {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// The handle is stale or does not address a live host object
    #[error("invalid or stale object handle")]
    InvalidObject,

    /// The handle addresses a live object of the wrong class
    #[error("wrong object class: expected {expected}, got {actual}")]
    WrongClass {
        expected: &'static str,
        actual: &'static str,
    },

    /// The buffer is already acquired by another lock
    #[error("buffer is already acquired")]
    BufferLocked,

    /// An error raised on the scripting side of the boundary
    #[error("actionscript error: {message}")]
    AsError { message: String },
}

impl FreError {
    /// Create a "no such name" error for a missing property or method.
    pub fn no_such_name(name: impl Into<String>) -> Self {
        FreError::NoSuchName { name: name.into() }
    }

    /// Create a scripting-side error with a message.
    pub fn as_error(message: impl Into<String>) -> Self {
        FreError::AsError {
            message: message.into(),
        }
    }

    /// Numeric error code handed to the host inside foreign error objects.
    pub fn code(&self) -> i32 {
        match self {
            FreError::NoSuchName { .. } => 1,
            FreError::InvalidObject => 2,
            FreError::Conversion(_) => 3,
            FreError::InvalidArgument { .. } => 4,
            FreError::BufferLocked => 5,
            FreError::WrongClass { .. } => 6,
            FreError::AsError { .. } => 7,
        }
    }
}
