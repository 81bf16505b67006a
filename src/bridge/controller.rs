//! Name-keyed dispatch of host calls to bridge handlers.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::host::FreContext;
use crate::value::FreValue;

use super::handlers;

/// Plain-function signature every demonstration handler has.
type HandlerFn = fn(&mut FreContext, &[FreValue]) -> Option<FreValue>;

/// Local names of the exported handlers, in registration order.
///
/// These are the host-facing names; `register` qualifies each one with the
/// host-supplied prefix.
const HANDLERS: &[(&str, HandlerFn)] = &[
    ("runStringTests", handlers::run_string_tests),
    ("runNumberTests", handlers::run_number_tests),
    ("runIntTests", handlers::run_int_tests),
    ("runArrayTests", handlers::run_array_tests),
    ("runObjectTests", handlers::run_object_tests),
    ("runBitmapTests", handlers::run_bitmap_tests),
    ("runByteArrayTests", handlers::run_byte_array_tests),
    ("runErrorTests", handlers::run_error_tests),
    ("runErrorTests2", handlers::run_error_tests_2),
    ("runDataTests", handlers::run_data_tests),
    ("runRectTests", handlers::run_rect_tests),
    ("runDateTests", handlers::run_date_tests),
];

/// Type-erased bridge handler.
///
/// Wraps any callable with the handler signature so the function table can
/// store custom closures alongside the built-in demonstrations.
#[derive(Clone)]
pub struct BridgeFn {
    inner: Arc<dyn Fn(&mut FreContext, &[FreValue]) -> Option<FreValue> + Send + Sync>,
}

impl BridgeFn {
    /// Create a new handler from a callable.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut FreContext, &[FreValue]) -> Option<FreValue> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call this handler with the given context and argument vector.
    pub fn call(&self, ctx: &mut FreContext, args: &[FreValue]) -> Option<FreValue> {
        (self.inner)(ctx, args)
    }
}

impl fmt::Debug for BridgeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeFn").finish_non_exhaustive()
    }
}

/// Maps exported function names to handlers and routes host calls.
///
/// The table is built once by [`register`](BridgeController::register) and
/// treated as read-only afterwards; calls arrive strictly one at a time.
#[derive(Debug, Default)]
pub struct BridgeController {
    functions: FxHashMap<String, BridgeFn>,
}

impl BridgeController {
    /// Create a controller with an empty function table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the exported function table under the given prefix.
    ///
    /// Returns every qualified name so the host can bind them. Calling
    /// again rebuilds the table from scratch, so re-registration with the
    /// same prefix yields the same set.
    pub fn register(&mut self, prefix: &str) -> Vec<String> {
        self.functions.clear();
        let mut names = Vec::with_capacity(HANDLERS.len());
        for (local, handler) in HANDLERS {
            let qualified = format!("{prefix}{local}");
            self.functions.insert(qualified.clone(), BridgeFn::new(*handler));
            names.push(qualified);
        }
        trace!(count = names.len(), prefix = %prefix, "registered bridge functions");
        names
    }

    /// Route a host call to the matching handler.
    ///
    /// An unknown name yields `None` with no side effect.
    pub fn dispatch(
        &self,
        name: &str,
        ctx: &mut FreContext,
        args: &[FreValue],
    ) -> Option<FreValue> {
        let Some(handler) = self.functions.get(name) else {
            trace!(name = %name, "function not registered");
            return None;
        };
        handler.call(ctx, args)
    }

    /// Number of registered functions.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Whether a qualified name is present in the table.
    pub fn is_registered(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}
