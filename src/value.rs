//! Foreign value representation.

use chrono::{DateTime, Utc};

use crate::geom::{Point, Rectangle};

/// Handle to an object owned by the host heap.
///
/// The generational index prevents use-after-free: a freed slot bumps its
/// generation, so handles kept past an explicit release stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FreHandle {
    /// Index into the host heap's slots
    pub index: u32,
    /// Generation for stale-handle detection
    pub generation: u32,
}

impl FreHandle {
    /// Create a new handle.
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// A foreign value as seen across the bridge boundary.
///
/// Scalars and small structured values travel inline; arrays, objects and
/// buffers stay on the host heap and travel by handle. A handle in a
/// returned value transfers to the host; a handle in an argument vector is
/// only valid for the duration of the call.
#[derive(Debug, Clone, PartialEq)]
pub enum FreValue {
    /// Null/absent value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Signed 32-bit integer
    Int(i32),
    /// Unsigned 32-bit integer
    UInt(u32),
    /// Double-precision number
    Number(f64),
    /// String value (owned)
    String(String),
    /// Date with millisecond precision
    Date(DateTime<Utc>),
    /// Structured point value
    Point(Point),
    /// Structured rectangle value
    Rectangle(Rectangle),
    /// Handle to a host-owned object (array, object, buffer, error)
    Object(FreHandle),
}

impl FreValue {
    /// Get a human-readable name for this value's shape.
    ///
    /// Handles report `"object"` here; resolving the object's class needs
    /// the heap, see `FreContext::type_of`.
    pub fn type_name(&self) -> &'static str {
        match self {
            FreValue::Null => "null",
            FreValue::Boolean(_) => "boolean",
            FreValue::Int(_) => "int",
            FreValue::UInt(_) => "uint",
            FreValue::Number(_) => "number",
            FreValue::String(_) => "string",
            FreValue::Date(_) => "date",
            FreValue::Point(_) => "point",
            FreValue::Rectangle(_) => "rectangle",
            FreValue::Object(_) => "object",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FreValue::Null)
    }
}

/// Declared type tag of a foreign value.
///
/// This is what the checked-narrowing demonstration inspects before
/// trusting a value's shape; handles resolve to their host class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreType {
    Null,
    Boolean,
    Int,
    UInt,
    Number,
    String,
    Date,
    Point,
    Rectangle,
    Array,
    Object,
    ByteArray,
    BitmapData,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(FreValue::Null.type_name(), "null");
        assert_eq!(FreValue::Int(1).type_name(), "int");
        assert_eq!(FreValue::UInt(1).type_name(), "uint");
        assert_eq!(FreValue::Number(1.0).type_name(), "number");
        assert_eq!(FreValue::String("x".into()).type_name(), "string");
        assert_eq!(
            FreValue::Object(FreHandle::new(0, 0)).type_name(),
            "object"
        );
    }

    #[test]
    fn null_detection() {
        assert!(FreValue::Null.is_null());
        assert!(!FreValue::Boolean(false).is_null());
    }

    #[test]
    fn handles_compare_by_slot_and_generation() {
        assert_eq!(FreHandle::new(3, 1), FreHandle::new(3, 1));
        assert_ne!(FreHandle::new(3, 1), FreHandle::new(3, 2));
    }
}
