//! In-memory simulation of the host runtime's object model.
//!
//! The real host owns every foreign value; this module stands in for it so
//! the bridge surface is testable end to end. It provides the generational
//! object heap, the scripting object/array/buffer classes, and the
//! per-extension context with its capability seams.

pub mod bitmap;
pub mod byte_array;
pub mod context;
pub mod heap;
pub mod object;

pub use bitmap::{BitmapData, BitmapSnapshot, PixelLock, sepia_tone};
pub use byte_array::{ByteArrayData, ByteLock};
pub use context::{FreContext, RecordingSurface, UiSurface};
pub use heap::FreHeap;
pub use object::{ErrorObject, HostMethod, HostObject, MethodBody, ScriptObject};
