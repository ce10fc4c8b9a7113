#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Shared primitives for the folio workspace crates.
//!
//! # Main Types
//!
//! - [`Observable`] - A value holder that broadcasts every replacement
//! - [`Listeners`] - An ordered listener registry with snapshot iteration
//! - [`Subscription`] - Handle that detaches a registered listener
//!
//! [`deep_equal`] compares opaque JSON payloads the way host pages compare
//! plain objects: structurally, ignoring key order.

/// Structural equality over JSON values.
pub mod deep_equal;
/// Listener registry shared by every subscribable type.
pub mod listeners;
/// Observable value holder.
pub mod observable;

pub use deep_equal::deep_equal;
pub use listeners::{Listeners, Subscription};
pub use observable::Observable;
