//! Generational arena for host-owned objects.

use crate::error::FreError;
use crate::value::FreHandle;

use super::object::HostObject;

/// Heap storage for foreign reference types with generational handles.
///
/// Objects live in a slot vector with generation tracking. Freeing a slot
/// bumps its generation before the index is reused, so a handle kept past
/// an explicit release is detected as stale instead of resolving to the
/// wrong object.
#[derive(Debug, Default)]
pub struct FreHeap {
    slots: Vec<HeapSlot>,
    free_list: Vec<u32>,
}

#[derive(Debug)]
struct HeapSlot {
    generation: u32,
    value: Option<HostObject>,
}

impl FreHeap {
    /// Create a new empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new object and hand out its handle.
    pub fn allocate(&mut self, value: HostObject) -> FreHandle {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            FreHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(HeapSlot {
                generation: 0,
                value: Some(value),
            });
            FreHandle::new(index, 0)
        }
    }

    /// Get an immutable reference to an object.
    pub fn get(&self, handle: FreHandle) -> Result<&HostObject, FreError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
            .ok_or(FreError::InvalidObject)
    }

    /// Get a mutable reference to an object.
    pub fn get_mut(&mut self, handle: FreHandle) -> Result<&mut HostObject, FreError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
            .ok_or(FreError::InvalidObject)
    }

    /// Free an object immediately, invalidating its handle.
    pub fn free(&mut self, handle: FreHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.generation == handle.generation
            && slot.value.is_some()
        {
            slot.value = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_list.push(handle.index);
        }
    }

    /// Number of live objects.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::byte_array::ByteArrayData;
    use crate::value::FreValue;

    #[test]
    fn allocate_and_get() {
        let mut heap = FreHeap::new();
        let handle = heap.allocate(HostObject::Array(vec![FreValue::Int(1)]));
        match heap.get(handle).unwrap() {
            HostObject::Array(elements) => assert_eq!(elements, &[FreValue::Int(1)]),
            other => panic!("expected array, got {}", other.type_name()),
        }
        assert_eq!(heap.live_count(), 1);
    }

    #[test]
    fn freed_handles_go_stale() {
        let mut heap = FreHeap::new();
        let handle = heap.allocate(HostObject::Array(Vec::new()));
        heap.free(handle);
        assert!(matches!(heap.get(handle), Err(FreError::InvalidObject)));
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn reused_slots_bump_the_generation() {
        let mut heap = FreHeap::new();
        let first = heap.allocate(HostObject::Array(Vec::new()));
        heap.free(first);
        let second = heap.allocate(HostObject::ByteArray(ByteArrayData::new(vec![1])));
        assert_eq!(first.index, second.index);
        assert_ne!(first.generation, second.generation);
        assert!(heap.get(first).is_err());
        assert!(heap.get(second).is_ok());
    }

    #[test]
    fn double_free_is_harmless() {
        let mut heap = FreHeap::new();
        let handle = heap.allocate(HostObject::Array(Vec::new()));
        heap.free(handle);
        heap.free(handle);
        assert_eq!(heap.live_count(), 0);
    }
}
