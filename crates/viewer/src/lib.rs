#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Contract of the embedded document viewer.
//!
//! The viewer is an external, independently stateful library. The host only
//! relies on what is declared here: a [`ViewerModule`] that constructs
//! [`ViewerInstance`]s, each exposing a [`ViewerStore`] with window
//! selectors, a state export, [`ViewerAction`] dispatch and change
//! subscriptions.
//!
//! With the `mock` feature, [`mock`] provides an in-memory implementation.

pub mod action;
pub mod config;
pub mod contract;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use action::{ViewerAction, WindowLayout};
pub use config::{ANNOTATION_ADAPTER_PATH, PluginConfig, ViewerConfig, WindowDefaults};
pub use contract::{ViewerInstance, ViewerModule, ViewerStore, ViewerWindow};
