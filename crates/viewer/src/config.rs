//! Configuration handed to [`ViewerModule::create`](crate::ViewerModule::create).

use folio_session::NativeRef;
use serde_json::{Value, json};

/// Path of the annotation storage adapter inside the viewer's state.
///
/// The adapter is a live object; it is lost when the state is encoded and
/// must be put back here after decoding.
pub const ANNOTATION_ADAPTER_PATH: &[&str] = &["config", "annotation", "adapter"];

/// Defaults applied to every new viewer window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDefaults {
	pub side_bar_open: bool,
	pub side_bar_panel: String,
	pub text_overlay_enabled: bool,
	pub text_overlay_selectable: bool,
}

impl Default for WindowDefaults {
	fn default() -> Self {
		Self {
			side_bar_open: true,
			side_bar_panel: "canvas".to_string(),
			text_overlay_enabled: true,
			text_overlay_selectable: true,
		}
	}
}

/// Viewer construction options.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
	/// Id of the element the viewer renders into.
	pub id: String,
	/// Prefix for generated class names.
	pub class_name_seed: String,
	pub workspace_control_panel: bool,
	/// Theme overrides, passed through opaquely.
	pub theme: Value,
	pub language: String,
	pub window: WindowDefaults,
	pub annotation_adapter: Option<NativeRef>,
}

impl ViewerConfig {
	/// Serializable part of the config, in the viewer's own key layout.
	///
	/// The annotation adapter is not included.
	pub fn to_value(&self) -> Value {
		json!({
			"id": self.id,
			"workspaceControlPanel": { "enabled": self.workspace_control_panel },
			"createGenerateClassNameOptions": { "seed": self.class_name_seed },
			"themes": { "light": self.theme },
			"language": self.language,
			"window": {
				"sideBarOpen": self.window.side_bar_open,
				"sideBarPanel": self.window.side_bar_panel,
				"textOverlay": {
					"enabled": self.window.text_overlay_enabled,
					"selectable": self.window.text_overlay_selectable,
				},
			},
			"annotation": {},
		})
	}
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			id: "mirador".to_string(),
			class_name_seed: "mirador".to_string(),
			workspace_control_panel: false,
			theme: json!({
				"typography": {
					"fontFamily": "\"Roboto\", \"Helvetica\", \"Arial\", sans-serif, \"Junicode\""
				},
				"palette": {
					"type": "light",
					"primary": { "main": "#d65151", "dark": "#9f1c28", "light": "#ff827d" }
				}
			}),
			language: "de".to_string(),
			window: WindowDefaults::default(),
			annotation_adapter: None,
		}
	}
}

/// Configuration of one viewer plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginConfig {
	/// Renders manuscript descriptions fetched from a TEI endpoint.
	TeiViewer { tei_endpoint: String },
	Annotations { export_local_storage_annotations: bool },
}
