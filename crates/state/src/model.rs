//! Resource store data model.
//!
//! Every nested collection sits behind an [`Arc`], and the reducer never
//! mutates a shared value in place: a changed leaf gets fresh copies of all
//! its ancestors while untouched siblings keep their allocation. Consumers
//! detect changes with [`Arc::ptr_eq`] instead of comparing contents.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(test)]
mod tests;

/// Name of the area that exists in every fresh store.
pub const DEFAULT_AREA: &str = "default";

/// Resources of one area, keyed by resource id in insertion order.
pub type Resources = IndexMap<String, Resource>;

/// Areas keyed by name in creation order.
pub type Areas = IndexMap<String, Arc<Area>>;

/// Closed set of resource kinds the host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
	#[serde(rename = "hsp:description")]
	HspDescription,
	#[serde(rename = "hsp:description_retro")]
	HspDescriptionRetro,
	#[serde(rename = "iiif:manifest")]
	IiifManifest,
}

impl ResourceKind {
	/// Wire name of the kind.
	pub fn as_str(self) -> &'static str {
		match self {
			ResourceKind::HspDescription => "hsp:description",
			ResourceKind::HspDescriptionRetro => "hsp:description_retro",
			ResourceKind::IiifManifest => "iiif:manifest",
		}
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One renderable unit the host wants visible.
///
/// `id` is the identity. `manifest_id` only groups resources that belong to
/// the same document, e.g. several canvases of one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
	#[serde(rename = "type")]
	pub kind: ResourceKind,
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub manifest_id: Option<String>,
	/// Authority file id the resource is linked to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub kod_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub query: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub permalink: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub canvas_index: Option<u32>,
}

impl Resource {
	/// Creates a resource with only kind and id set.
	pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
		Self {
			kind,
			id: id.into(),
			manifest_id: None,
			kod_id: None,
			query: None,
			permalink: None,
			canvas_index: None,
		}
	}

	/// Sets the owning manifest.
	pub fn with_manifest(mut self, manifest_id: impl Into<String>) -> Self {
		self.manifest_id = Some(manifest_id.into());
		self
	}

	/// Sets the canvas to open initially.
	pub fn with_canvas_index(mut self, canvas_index: u32) -> Self {
		self.canvas_index = Some(canvas_index);
		self
	}

	/// JSON form as carried in viewer window payloads.
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}

	/// Parses a resource from a viewer window payload.
	pub fn from_value(value: &Value) -> serde_json::Result<Self> {
		Resource::deserialize(value)
	}
}

/// A named, independent workspace partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
	pub name: String,
	pub resources: Arc<Resources>,
	/// Encoded viewer session, `None` until a viewer ran for this area.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_state: Option<String>,
	#[serde(default)]
	pub jump_to_window_dialog_open: bool,
	#[serde(default)]
	pub window_type_dialog_open: bool,
	/// Annotation page captured when the area's viewer was last torn down.
	#[serde(default = "empty_object")]
	pub annotation_text: Value,
}

impl Area {
	/// A fresh area: no resources, no session, dialogs closed.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			resources: Arc::default(),
			session_state: None,
			jump_to_window_dialog_open: false,
			window_type_dialog_open: false,
			annotation_text: empty_object(),
		}
	}
}

pub(crate) fn empty_object() -> Value {
	Value::Object(serde_json::Map::new())
}

/// Host page location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
	pub pathname: String,
	pub search: String,
	pub hash: String,
}

impl Default for Location {
	fn default() -> Self {
		Self {
			pathname: "/".to_string(),
			search: String::new(),
			hash: String::new(),
		}
	}
}

/// Display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	#[default]
	De,
	En,
}

impl Language {
	/// ISO 639-1 code.
	pub fn code(self) -> &'static str {
		match self {
			Language::De => "de",
			Language::En => "en",
		}
	}
}

impl fmt::Display for Language {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

/// Internationalization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nConfig {
	pub language: Language,
	pub disable_translation: bool,
}

/// Top-level resource store state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
	pub location: Location,
	pub i18n_config: I18nConfig,
	pub current_area_name: String,
	pub areas: Arc<Areas>,
	/// Whether the annotation plugin is enabled.
	#[serde(rename = "annotation", default)]
	pub annotation_enabled: bool,
}

impl Default for State {
	fn default() -> Self {
		let mut areas = Areas::new();
		areas.insert(DEFAULT_AREA.to_string(), Arc::new(Area::new(DEFAULT_AREA)));
		Self {
			location: Location::default(),
			i18n_config: I18nConfig::default(),
			current_area_name: DEFAULT_AREA.to_string(),
			areas: Arc::new(areas),
			annotation_enabled: false,
		}
	}
}
