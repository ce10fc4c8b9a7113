#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Synchronization between workspace areas and the embedded viewer.
//!
//! The resource store and the viewer each keep their own list of what is
//! open. This crate keeps the two convergent without ever sharing mutable
//! state between them.
//!
//! # Main Types
//!
//! - [`reconcile`] - The two one-way diff-and-converge passes
//! - [`EventTarget`] - Cancellable events a host can veto store writes with
//! - [`AnnotationStore`] - Annotation page adapter handed to the viewer
//! - [`WorkArea`] - Lifecycle of the viewer bound to the current area
//!
//! # Data Flow
//!
//! ```text
//! host ──► Store ──► sync_area_into_viewer ──► viewer actions
//!            ▲
//!            └── dispatch_batch ◄── sync_viewer_into_area ◄── viewer change
//!                                          │
//!                                          └──► EventTarget (may veto)
//! ```

pub mod annotations;
pub mod events;
pub mod reconcile;
pub mod work_area;

pub use annotations::AnnotationStore;
pub use events::{Event, EventDetail, EventKind, EventTarget, UnknownEvent};
pub use reconcile::{PassSummary, sync_area_into_viewer, sync_viewer_into_area};
pub use work_area::{
	LifecycleEvent, LifecyclePhase, LifecycleSender, PublishedViewer, ViewerHandle, WorkArea,
	WorkAreaOptions,
};
