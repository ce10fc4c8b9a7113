//! Deferred message bus between the work area and the public surface.
//!
//! Lifecycle notifications are queued instead of published directly. The
//! queue is drained one turn later by [`crate::Workspace::run`], or by
//! [`crate::Workspace::drain_messages`] at the start of the next call, so
//! consumers created in the same turn can subscribe first.
//!
//! ```text
//! WorkArea ──► LifecycleEvent ──► run() / drain_messages() ──► viewer_api Observable
//! ```

use folio_sync::LifecycleEvent;
use tokio::sync::mpsc;

/// Channel sender handed to the work area.
pub type MsgSender = mpsc::UnboundedSender<LifecycleEvent>;

/// Channel receiver drained by the workspace.
pub type MsgReceiver = mpsc::UnboundedReceiver<LifecycleEvent>;

/// Creates a new message channel pair.
pub fn channel() -> (MsgSender, MsgReceiver) {
	mpsc::unbounded_channel()
}
