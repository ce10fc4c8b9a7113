#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Resource store for workspace areas.
//!
//! The store holds which resources the host intends to show, partitioned into
//! named areas. All mutation goes through [`Command`] values and the pure
//! [`reduce`] function; [`Store`] adds batching and subscriptions on top.
//!
//! # Main Types
//!
//! - [`State`] - Immutable snapshot of locations, areas and resources
//! - [`Command`] - Closed set of store transitions
//! - [`Store`] - Subscribable holder of the current snapshot
//! - [`persist::Persistor`] - Writes snapshots to session storage

pub mod command;
pub mod error;
pub mod model;
pub mod persist;
pub mod reducer;
pub mod selectors;
pub mod store;

pub use command::Command;
pub use error::{PersistError, Result};
pub use model::{
	Area, Areas, DEFAULT_AREA, I18nConfig, Language, Location, Resource, ResourceKind, Resources,
	State,
};
pub use persist::{MemoryStorage, SessionStorage};
pub use reducer::reduce;
pub use store::Store;
