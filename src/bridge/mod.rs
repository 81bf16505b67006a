//! The bridge surface: the dispatcher and its demonstration handlers.

mod controller;
mod handlers;

pub use controller::{BridgeController, BridgeFn};
