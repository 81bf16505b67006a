//! Per-extension host context.
//!
//! [`FreContext`] is the collaborator surface a handler sees: the foreign
//! object heap, the shared scripting-data slot, foreign-error construction
//! and the UI-attachment capability. The host supplies one context per
//! extension; handlers borrow it for the duration of a single call.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::FreError;
use crate::value::{FreHandle, FreType, FreValue};

use super::bitmap::{BitmapData, BitmapSnapshot, PixelLock};
use super::byte_array::{ByteArrayData, ByteLock};
use super::heap::FreHeap;
use super::object::{ErrorObject, HostObject, ScriptObject};

/// Receives preview images attached by the bitmap demonstration.
///
/// On a real host this would put an overlay on screen; it is an external
/// capability, so the bridge only ever talks to this trait.
pub trait UiSurface {
    /// Attach a preview image to the host UI.
    fn attach_preview(&mut self, preview: BitmapSnapshot);
}

/// Default surface: records attachments instead of rendering them.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    previews: Vec<BitmapSnapshot>,
}

impl RecordingSurface {
    /// Number of previews attached so far.
    pub fn preview_count(&self) -> usize {
        self.previews.len()
    }
}

impl UiSurface for RecordingSurface {
    fn attach_preview(&mut self, preview: BitmapSnapshot) {
        self.previews.push(preview);
    }
}

/// The host context handed to every handler invocation.
pub struct FreContext {
    heap: FreHeap,
    shared_data: Option<FreValue>,
    ui: Box<dyn UiSurface>,
}

impl Default for FreContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FreContext {
    /// Create a context with the recording UI surface.
    pub fn new() -> Self {
        Self::with_ui(Box::new(RecordingSurface::default()))
    }

    /// Create a context with a custom UI surface.
    pub fn with_ui(ui: Box<dyn UiSurface>) -> Self {
        Self {
            heap: FreHeap::new(),
            shared_data: None,
            ui,
        }
    }

    /// Read-only view of the object heap.
    pub fn heap(&self) -> &FreHeap {
        &self.heap
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Allocate a foreign array.
    pub fn new_array(&mut self, elements: Vec<FreValue>) -> FreValue {
        FreValue::Object(self.heap.allocate(HostObject::Array(elements)))
    }

    /// Allocate a foreign scripting object.
    pub fn new_object(&mut self, object: ScriptObject) -> FreValue {
        FreValue::Object(self.heap.allocate(HostObject::Object(object)))
    }

    /// Allocate a foreign byte buffer.
    pub fn new_byte_array(&mut self, bytes: Vec<u8>) -> FreValue {
        FreValue::Object(self.heap.allocate(HostObject::ByteArray(ByteArrayData::new(bytes))))
    }

    /// Allocate a foreign bitmap.
    pub fn new_bitmap(&mut self, bitmap: BitmapData) -> FreValue {
        FreValue::Object(self.heap.allocate(HostObject::Bitmap(bitmap)))
    }

    /// Convert a caught failure into a foreign error object.
    ///
    /// The object carries the failure message, its numeric code and the
    /// source location of the catch site.
    #[track_caller]
    pub fn error_object(&mut self, error: &FreError) -> FreValue {
        let location = std::panic::Location::caller();
        let source = format!("{}:{}:{}", location.file(), location.line(), location.column());
        debug!(error = %error, source = %source, "converted failure into a foreign error object");
        let object = ErrorObject {
            message: error.to_string(),
            id: error.code(),
            source,
        };
        FreValue::Object(self.heap.allocate(HostObject::Error(object)))
    }

    /// Explicitly release a host object, invalidating its handle.
    pub fn dispose(&mut self, handle: FreHandle) {
        self.heap.free(handle);
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Declared type tag of a foreign value.
    ///
    /// A stale handle resolves to `Null`, matching how the host reports a
    /// handle whose object is gone.
    pub fn type_of(&self, value: &FreValue) -> FreType {
        match value {
            FreValue::Null => FreType::Null,
            FreValue::Boolean(_) => FreType::Boolean,
            FreValue::Int(_) => FreType::Int,
            FreValue::UInt(_) => FreType::UInt,
            FreValue::Number(_) => FreType::Number,
            FreValue::String(_) => FreType::String,
            FreValue::Date(_) => FreType::Date,
            FreValue::Point(_) => FreType::Point,
            FreValue::Rectangle(_) => FreType::Rectangle,
            FreValue::Object(handle) => self
                .heap
                .get(*handle)
                .map_or(FreType::Null, HostObject::fre_type),
        }
    }

    // ========================================================================
    // Array capabilities
    // ========================================================================

    /// Length of a foreign array.
    pub fn array_length(&self, handle: FreHandle) -> Result<usize, FreError> {
        Ok(self.heap.get(handle)?.as_array()?.len())
    }

    /// Read an element of a foreign array.
    pub fn array_get(&self, handle: FreHandle, index: usize) -> Result<FreValue, FreError> {
        self.heap
            .get(handle)?
            .as_array()?
            .get(index)
            .cloned()
            .ok_or_else(|| FreError::no_such_name(index.to_string()))
    }

    /// Replace an element of a foreign array in place.
    pub fn array_set(
        &mut self,
        handle: FreHandle,
        index: usize,
        value: FreValue,
    ) -> Result<(), FreError> {
        let elements = self.heap.get_mut(handle)?.as_array_mut()?;
        match elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FreError::no_such_name(index.to_string())),
        }
    }

    // ========================================================================
    // Object capabilities
    // ========================================================================

    /// Read a named property of a foreign object.
    pub fn object_property(&self, handle: FreHandle, name: &str) -> Result<FreValue, FreError> {
        self.heap.get(handle)?.as_object()?.get_property(name)
    }

    /// Write a named property of a foreign object.
    pub fn set_object_property(
        &mut self,
        handle: FreHandle,
        name: &str,
        value: FreValue,
    ) -> Result<(), FreError> {
        self.heap
            .get_mut(handle)?
            .as_object_mut()?
            .set_property(name, value)
    }

    /// Invoke a named method of a foreign object.
    pub fn call_object_method(
        &self,
        handle: FreHandle,
        name: &str,
        args: &[FreValue],
    ) -> Result<FreValue, FreError> {
        self.heap.get(handle)?.as_object()?.call_method(name, args)
    }

    /// Convert a foreign object into a key/value map for inspection.
    pub fn object_to_map(
        &self,
        handle: FreHandle,
    ) -> Result<FxHashMap<String, FreValue>, FreError> {
        Ok(self.heap.get(handle)?.as_object()?.to_map())
    }

    // ========================================================================
    // Buffer capabilities
    // ========================================================================

    /// Acquire the pixel buffer of a foreign bitmap.
    pub fn acquire_bitmap(&mut self, handle: FreHandle) -> Result<PixelLock<'_>, FreError> {
        match self.heap.get_mut(handle)? {
            HostObject::Bitmap(data) => data.acquire(),
            other => Err(FreError::WrongClass {
                expected: "BitmapData",
                actual: other.type_name(),
            }),
        }
    }

    /// Acquire the contents of a foreign byte buffer.
    pub fn acquire_bytes(&mut self, handle: FreHandle) -> Result<ByteLock<'_>, FreError> {
        match self.heap.get_mut(handle)? {
            HostObject::ByteArray(data) => data.acquire(),
            other => Err(FreError::WrongClass {
                expected: "ByteArray",
                actual: other.type_name(),
            }),
        }
    }

    // ========================================================================
    // Shared data slot
    // ========================================================================

    /// Store a value in the context's shared scripting-data slot.
    pub fn set_shared_data(&mut self, value: FreValue) {
        self.shared_data = Some(value);
    }

    /// Read the shared scripting-data slot, `Null` if unset.
    pub fn shared_data(&self) -> FreValue {
        self.shared_data.clone().unwrap_or(FreValue::Null)
    }

    // ========================================================================
    // UI capability
    // ========================================================================

    /// Attach a preview image through the UI capability.
    pub fn attach_preview(&mut self, preview: BitmapSnapshot) {
        self.ui.attach_preview(preview);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_surface_counts_attachments() {
        let mut surface = RecordingSurface::default();
        assert_eq!(surface.preview_count(), 0);
        surface.attach_preview(BitmapSnapshot {
            width: 1,
            height: 1,
            pixels: vec![0],
        });
        assert_eq!(surface.preview_count(), 1);
    }

    #[test]
    fn shared_data_slot_roundtrip() {
        let mut ctx = FreContext::new();
        assert_eq!(ctx.shared_data(), FreValue::Null);
        ctx.set_shared_data(FreValue::String("payload".into()));
        assert_eq!(ctx.shared_data(), FreValue::String("payload".into()));
    }

    #[test]
    fn error_object_carries_message_and_code() {
        let mut ctx = FreContext::new();
        let err = FreError::no_such_name("doNotExist");
        let FreValue::Object(handle) = ctx.error_object(&err) else {
            panic!("expected an object handle");
        };
        match ctx.heap().get(handle).unwrap() {
            HostObject::Error(error) => {
                assert!(error.message.contains("doNotExist"));
                assert_eq!(error.id, err.code());
                assert!(error.source.contains("context.rs"));
            }
            other => panic!("expected error object, got {}", other.type_name()),
        }
        assert_eq!(
            ctx.type_of(&FreValue::Object(handle)),
            FreType::Error
        );
    }

    #[test]
    fn type_of_resolves_heap_classes() {
        let mut ctx = FreContext::new();
        let array = ctx.new_array(vec![FreValue::Int(1)]);
        let bytes = ctx.new_byte_array(vec![0]);
        let bitmap = ctx.new_bitmap(BitmapData::new(1, 1));
        assert_eq!(ctx.type_of(&array), FreType::Array);
        assert_eq!(ctx.type_of(&bytes), FreType::ByteArray);
        assert_eq!(ctx.type_of(&bitmap), FreType::BitmapData);
        assert_eq!(ctx.type_of(&FreValue::Int(3)), FreType::Int);
    }

    #[test]
    fn disposed_handles_stop_resolving() {
        let mut ctx = FreContext::new();
        let FreValue::Object(handle) = ctx.new_array(Vec::new()) else {
            panic!("expected an object handle");
        };
        ctx.dispose(handle);
        assert_eq!(ctx.type_of(&FreValue::Object(handle)), FreType::Null);
        assert!(ctx.array_length(handle).is_err());
    }

    #[test]
    fn wrong_class_access_is_typed() {
        let mut ctx = FreContext::new();
        let FreValue::Object(handle) = ctx.new_byte_array(vec![1, 2]) else {
            panic!("expected an object handle");
        };
        assert!(matches!(
            ctx.array_length(handle),
            Err(FreError::WrongClass { .. })
        ));
        assert!(matches!(
            ctx.acquire_bitmap(handle),
            Err(FreError::WrongClass { .. })
        ));
    }
}
