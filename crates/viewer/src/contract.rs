use std::rc::Rc;

use folio_common::Subscription;
use folio_session::SessionGraph;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::ViewerAction;
use crate::config::{PluginConfig, ViewerConfig};

/// A viewer window as reported by the viewer's selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerWindow {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub manifest_id: Option<String>,
	/// Host record the window was opened with. Windows opened from the
	/// viewer's own UI carry none.
	#[serde(
		rename = "hspWorkspaceResource",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub resource: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

/// The viewer's internal store.
///
/// The store is owned by the viewer. Listeners fire after every dispatched
/// action, including actions unrelated to windows.
pub trait ViewerStore {
	/// Ids of all open windows.
	fn window_ids(&self) -> Vec<String>;

	fn window(&self, id: &str) -> Option<ViewerWindow>;

	/// Whether the "add resource" panel of the workspace is shown.
	fn is_workspace_add_visible(&self) -> bool;

	/// Snapshot of the viewer's complete internal state.
	fn export_state(&self) -> SessionGraph;

	fn dispatch(&self, action: ViewerAction);

	fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription;
}

/// A mounted viewer.
pub trait ViewerInstance {
	fn store(&self) -> Rc<dyn ViewerStore>;

	/// Tears the viewer down. Must run while its container is still attached.
	fn unmount(&self);
}

/// The loaded viewer library.
pub trait ViewerModule {
	/// Constructs and mounts a viewer. Construction cannot fail.
	fn create(&self, config: ViewerConfig, plugins: Vec<PluginConfig>) -> Rc<dyn ViewerInstance>;
}
