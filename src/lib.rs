//! freebridge: conformance/demo harness for a native-extension bridge.
//!
//! A managed scripting runtime calls into this crate through exactly two
//! boundary operations: [`BridgeController::register`], which exposes the
//! qualified names of the exported functions, and
//! [`BridgeController::dispatch`], which routes a call with a raw argument
//! vector to the matching handler. Each handler is a self-contained
//! marshal-compute-marshal demonstration over one foreign type: strings,
//! numbers, integers, arrays, objects, bitmaps, byte buffers, dates,
//! rectangles, points and error propagation.
//!
//! Foreign values are opaque: scalars travel inline as [`FreValue`],
//! reference types travel as generational handles into the host heap. The
//! [`host`] module is an in-memory stand-in for the host runtime's object
//! model so the whole surface is testable without a real host.

pub mod bridge;
pub mod convert;
pub mod error;
pub mod geom;
pub mod host;
pub mod value;

pub use bridge::{BridgeController, BridgeFn};
pub use error::{ConversionError, FreError};
pub use value::{FreHandle, FreType, FreValue};

/// Commonly used types, one import away.
pub mod prelude {
    pub use crate::bridge::{BridgeController, BridgeFn};
    pub use crate::convert::{FromFre, IntoFre};
    pub use crate::error::{ConversionError, FreError};
    pub use crate::geom::{Point, Rectangle};
    pub use crate::host::{
        BitmapData, BitmapSnapshot, FreContext, HostMethod, HostObject, ScriptObject, UiSurface,
    };
    pub use crate::value::{FreHandle, FreType, FreValue};
}
