#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Embeddable workspace module.
//!
//! Hosts create a [`Workspace`] from a [`Config`], mount it into one or more
//! [`Container`]s and drive it through resource and area calls. The
//! workspace keeps the embedded viewer in sync with its resource store and
//! reports viewer-side changes through cancellable events.
//!
//! # Main Types
//!
//! - [`Workspace`] - Public module surface
//! - [`Config`] / [`ConfigOverrides`] - Resolved and partial configuration
//! - [`ViewerLoader`] - Source of the viewer library, awaited on first mount
//! - [`Container`] - Host element the workspace renders into
//!
//! # Example
//!
//! ```ignore
//! let workspace = Workspace::create(Config::try_default()?, Rc::new(loader));
//! workspace.mount(containers).await?;
//! workspace.add_resource(resource, None);
//! workspace.drain_messages();
//! ```

pub mod api;
pub mod config;
pub mod container;
pub mod error;
pub mod loader;
pub mod msg;

pub use api::Workspace;
pub use config::{Config, ConfigOverrides, UrlFactory};
pub use container::{Container, Containers, MemoryContainer, Unit};
pub use error::{ConfigError, MountError};
pub use folio_state::{Language, Location, Resource, ResourceKind, State};
pub use folio_sync::{Event, EventDetail, EventKind, ViewerHandle};
pub use folio_viewer::WindowLayout;
pub use loader::{StaticLoader, ViewerLoader};
