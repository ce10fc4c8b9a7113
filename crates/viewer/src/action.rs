use folio_session::{SessionGraph, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Window arrangement of the viewer workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowLayout {
	#[default]
	Mosaic,
	Elastic,
}

/// Actions the host dispatches into the viewer's store.
#[derive(Debug, Clone)]
pub enum ViewerAction {
	/// Opens a window. `resource` is the host's record, carried opaquely.
	AddWindow {
		id: String,
		manifest_id: Option<String>,
		resource: Value,
	},
	RemoveWindow {
		id: String,
	},
	/// Replaces the host record carried by a window.
	UpdateWindow {
		id: String,
		resource: Value,
	},
	/// Removes an entry from the viewer's catalog list. `None` addresses the
	/// entry created for windows without a manifest.
	RemoveResource {
		id: Option<String>,
	},
	UpdateConfig {
		language: String,
	},
	/// Replaces the viewer's whole state with a previously exported one.
	ImportState(SessionGraph),
	SetWorkspaceFullscreen(bool),
	SetWorkspaceAddVisibility(bool),
	UpdateWorkspace {
		layout: WindowLayout,
	},
	FocusWindow {
		id: String,
		pan: bool,
	},
}

impl ViewerAction {
	/// Stable action name for logs.
	pub fn name(&self) -> &'static str {
		match self {
			ViewerAction::AddWindow { .. } => "add_window",
			ViewerAction::RemoveWindow { .. } => "remove_window",
			ViewerAction::UpdateWindow { .. } => "update_window",
			ViewerAction::RemoveResource { .. } => "remove_resource",
			ViewerAction::UpdateConfig { .. } => "update_config",
			ViewerAction::ImportState(_) => "import_state",
			ViewerAction::SetWorkspaceFullscreen(_) => "set_workspace_fullscreen",
			ViewerAction::SetWorkspaceAddVisibility(_) => "set_workspace_add_visibility",
			ViewerAction::UpdateWorkspace { .. } => "update_workspace",
			ViewerAction::FocusWindow { .. } => "focus_window",
		}
	}
}

/// Imported states compare by their encoded form.
impl PartialEq for ViewerAction {
	fn eq(&self, other: &Self) -> bool {
		use ViewerAction::*;
		match (self, other) {
			(
				AddWindow {
					id: a,
					manifest_id: am,
					resource: ar,
				},
				AddWindow {
					id: b,
					manifest_id: bm,
					resource: br,
				},
			) => a == b && am == bm && ar == br,
			(RemoveWindow { id: a }, RemoveWindow { id: b }) => a == b,
			(UpdateWindow { id: a, resource: ar }, UpdateWindow { id: b, resource: br }) => {
				a == b && ar == br
			}
			(RemoveResource { id: a }, RemoveResource { id: b }) => a == b,
			(UpdateConfig { language: a }, UpdateConfig { language: b }) => a == b,
			(ImportState(a), ImportState(b)) => encode(a) == encode(b),
			(SetWorkspaceFullscreen(a), SetWorkspaceFullscreen(b)) => a == b,
			(SetWorkspaceAddVisibility(a), SetWorkspaceAddVisibility(b)) => a == b,
			(UpdateWorkspace { layout: a }, UpdateWorkspace { layout: b }) => a == b,
			(FocusWindow { id: a, pan: ap }, FocusWindow { id: b, pan: bp }) => a == b && ap == bp,
			_ => false,
		}
	}
}
