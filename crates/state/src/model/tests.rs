use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn resource_uses_camel_case_wire_names() {
	let resource = Resource::new(ResourceKind::IiifManifest, "r1")
		.with_manifest("m1")
		.with_canvas_index(3);

	assert_eq!(
		resource.to_value(),
		json!({"type": "iiif:manifest", "id": "r1", "manifestId": "m1", "canvasIndex": 3})
	);
}

#[test]
fn resource_parses_minimal_payload() {
	let resource = Resource::from_value(&json!({"type": "hsp:description", "id": "hsp-desc-1"})).unwrap();
	assert_eq!(resource, Resource::new(ResourceKind::HspDescription, "hsp-desc-1"));
}

#[test]
fn resource_rejects_unknown_kind() {
	assert!(Resource::from_value(&json!({"type": "pdf", "id": "x"})).is_err());
}

#[test]
fn default_state_has_default_area() {
	let state = State::default();
	assert_eq!(state.current_area_name, DEFAULT_AREA);
	assert_eq!(state.i18n_config.language, Language::De);
	assert_eq!(state.location.pathname, "/");

	let area = &state.areas[DEFAULT_AREA];
	assert!(area.resources.is_empty());
	assert_eq!(area.session_state, None);
	assert_eq!(area.annotation_text, json!({}));
	assert!(!area.window_type_dialog_open);
	assert!(!area.jump_to_window_dialog_open);
}

#[test]
fn state_serializes_with_host_field_names() {
	let value = serde_json::to_value(State::default()).unwrap();
	assert_eq!(
		value,
		json!({
			"location": {"pathname": "/", "search": "", "hash": ""},
			"i18nConfig": {"language": "de", "disableTranslation": false},
			"currentAreaName": "default",
			"areas": {
				"default": {
					"name": "default",
					"resources": {},
					"jumpToWindowDialogOpen": false,
					"windowTypeDialogOpen": false,
					"annotationText": {}
				}
			},
			"annotation": false
		})
	);
}
