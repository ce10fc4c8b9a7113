use std::sync::Arc;

use serde_json::Value;

use crate::model::{I18nConfig, Location, Resource, State};

/// Every transition the resource store accepts.
///
/// Commands carrying an `area` address that area by name; `None` addresses
/// the current area.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	/// Replaces the whole state.
	SetState(Arc<State>),
	SetLocation(Location),
	SetI18nConfig(I18nConfig),
	SetAnnotationEnabled(bool),
	/// Inserts or replaces the resource under its id.
	AddResource {
		resource: Resource,
		area: Option<String>,
	},
	/// Replaces the stored record with the same id, inserting it if absent.
	UpdateResource {
		resource: Resource,
		area: Option<String>,
	},
	RemoveResource {
		id: String,
		area: Option<String>,
	},
	/// Removes every resource whose manifest id matches.
	RemoveResources {
		manifest_id: String,
		area: Option<String>,
	},
	/// Stores an encoded viewer session token.
	SetSessionState {
		token: Option<String>,
		area: Option<String>,
	},
	SetAnnotationText {
		text: Value,
		area: Option<String>,
	},
	SetJumpToWindowDialogOpen {
		open: bool,
		area: Option<String>,
	},
	SetWindowTypeDialogOpen {
		open: bool,
		area: Option<String>,
	},
	SetCurrentArea {
		name: String,
	},
	/// Inserts a fresh area, replacing any area with the same name.
	CreateArea {
		name: String,
	},
	/// Removes an area; the current area falls back to the default one.
	DeleteArea {
		name: String,
	},
}

impl Command {
	/// Stable command name for logs.
	pub fn name(&self) -> &'static str {
		match self {
			Command::SetState(_) => "set_state",
			Command::SetLocation(_) => "set_location",
			Command::SetI18nConfig(_) => "set_i18n_config",
			Command::SetAnnotationEnabled(_) => "set_annotation_enabled",
			Command::AddResource { .. } => "add_resource",
			Command::UpdateResource { .. } => "update_resource",
			Command::RemoveResource { .. } => "remove_resource",
			Command::RemoveResources { .. } => "remove_resources",
			Command::SetSessionState { .. } => "set_session_state",
			Command::SetAnnotationText { .. } => "set_annotation_text",
			Command::SetJumpToWindowDialogOpen { .. } => "set_jump_to_window_dialog_open",
			Command::SetWindowTypeDialogOpen { .. } => "set_window_type_dialog_open",
			Command::SetCurrentArea { .. } => "set_current_area",
			Command::CreateArea { .. } => "create_area",
			Command::DeleteArea { .. } => "delete_area",
		}
	}

	/// Adds a resource to the current area.
	pub fn add_resource(resource: Resource) -> Self {
		Command::AddResource {
			resource,
			area: None,
		}
	}

	/// Removes a resource from the current area.
	pub fn remove_resource(id: impl Into<String>) -> Self {
		Command::RemoveResource {
			id: id.into(),
			area: None,
		}
	}
}
