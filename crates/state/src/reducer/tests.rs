use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::reduce;
use crate::command::Command;
use crate::model::{Area, DEFAULT_AREA, Resource, ResourceKind, State};
use crate::selectors;

fn manifest(id: &str, manifest_id: &str) -> Resource {
	Resource::new(ResourceKind::IiifManifest, id).with_manifest(manifest_id)
}

fn apply(commands: impl IntoIterator<Item = Command>) -> Arc<State> {
	commands
		.into_iter()
		.fold(Arc::new(State::default()), |state, command| reduce(&state, command))
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn ids(state: &State, area: Option<&str>) -> Vec<String> {
	selectors::resources(state, area)
		.into_iter()
		.map(|r| r.id.clone())
		.collect()
}

#[test]
fn add_and_remove_keep_insertion_order() {
	let state = apply([
		Command::add_resource(manifest("a", "m")),
		Command::add_resource(manifest("b", "m")),
		Command::add_resource(manifest("c", "m")),
		Command::remove_resource("b"),
		Command::add_resource(manifest("d", "m")),
	]);
	assert_eq!(ids(&state, None), ["a", "c", "d"]);
}

#[test]
fn adding_the_same_id_twice_keeps_one_entry() {
	let state = apply([
		Command::add_resource(manifest("a", "m1")),
		Command::add_resource(manifest("a", "m2")),
	]);
	let resources = selectors::resources(&state, None);
	assert_eq!(resources.len(), 1);
	assert_eq!(resources[0].manifest_id.as_deref(), Some("m2"));
}

#[test]
fn update_replaces_or_inserts() {
	let updated = manifest("a", "m").with_canvas_index(4);
	let state = apply([
		Command::add_resource(manifest("a", "m")),
		Command::UpdateResource {
			resource: updated.clone(),
			area: None,
		},
		Command::UpdateResource {
			resource: manifest("z", "m"),
			area: None,
		},
	]);
	let resources = selectors::resources(&state, None);
	assert_eq!(resources[0], &updated);
	assert_eq!(resources[1].id, "z");
}

#[test]
fn remove_resources_matches_manifest_id_only() {
	let state = apply([
		Command::add_resource(manifest("a", "m1")),
		Command::add_resource(manifest("m1", "m2")),
		Command::add_resource(manifest("c", "m1")),
		Command::add_resource(Resource::new(ResourceKind::HspDescription, "d")),
		Command::RemoveResources {
			manifest_id: "m1".into(),
			area: None,
		},
	]);
	assert_eq!(ids(&state, None), ["m1", "d"]);
}

#[test]
fn explicit_area_is_addressed() {
	let state = apply([
		Command::CreateArea { name: "foo".into() },
		Command::AddResource {
			resource: manifest("a", "m"),
			area: Some("foo".into()),
		},
	]);
	assert_eq!(ids(&state, Some("foo")), ["a"]);
	assert!(ids(&state, None).is_empty());
}

#[rstest]
#[case(Command::AddResource { resource: manifest("a", "m"), area: Some("nope".into()) })]
#[case(Command::UpdateResource { resource: manifest("a", "m"), area: Some("nope".into()) })]
#[case(Command::RemoveResource { id: "a".into(), area: Some("nope".into()) })]
#[case(Command::RemoveResources { manifest_id: "m".into(), area: Some("nope".into()) })]
#[case(Command::SetSessionState { token: Some("[]".into()), area: Some("nope".into()) })]
#[case(Command::SetAnnotationText { text: json!([]), area: Some("nope".into()) })]
#[case(Command::SetJumpToWindowDialogOpen { open: true, area: Some("nope".into()) })]
#[case(Command::SetWindowTypeDialogOpen { open: true, area: Some("nope".into()) })]
fn stale_area_reference_leaves_state_untouched(#[case] command: Command) {
	init_tracing();
	let state = Arc::new(State::default());
	let next = reduce(&state, command);
	assert!(Arc::ptr_eq(&state, &next));
}

#[test]
fn missing_current_area_is_skipped() {
	init_tracing();
	let state = apply([Command::SetCurrentArea { name: "gone".into() }]);
	let next = reduce(&state, Command::add_resource(manifest("a", "m")));
	assert!(Arc::ptr_eq(&state, &next));
	assert_eq!(selectors::current_area_name(&next), "gone");
}

#[test]
fn create_area_overwrites_existing() {
	let state = apply([
		Command::CreateArea { name: "foo".into() },
		Command::AddResource {
			resource: manifest("a", "m"),
			area: Some("foo".into()),
		},
		Command::CreateArea { name: "foo".into() },
	]);
	assert_eq!(selectors::area_names(&state), ["default", "foo"]);
	assert_eq!(*state.areas["foo"], Area::new("foo"));
}

#[test]
fn deleting_current_area_falls_back_to_default() {
	let state = apply([
		Command::CreateArea { name: "foo".into() },
		Command::SetCurrentArea { name: "foo".into() },
		Command::DeleteArea { name: "foo".into() },
	]);
	assert_eq!(state.current_area_name, DEFAULT_AREA);
	assert_eq!(selectors::area_names(&state), ["default"]);
}

#[test]
fn deleting_other_area_keeps_current() {
	let state = apply([
		Command::CreateArea { name: "foo".into() },
		Command::CreateArea { name: "bar".into() },
		Command::SetCurrentArea { name: "foo".into() },
		Command::DeleteArea { name: "bar".into() },
	]);
	assert_eq!(state.current_area_name, "foo");
	assert_eq!(selectors::area_names(&state), ["default", "foo"]);
}

#[test]
fn default_area_cannot_be_deleted() {
	let state = Arc::new(State::default());
	let next = reduce(&state, Command::DeleteArea { name: DEFAULT_AREA.into() });
	assert!(Arc::ptr_eq(&state, &next));
}

#[test]
fn updates_share_untouched_subtrees() {
	let before = apply([
		Command::CreateArea { name: "foo".into() },
		Command::add_resource(manifest("a", "m")),
	]);
	let after = reduce(
		&before,
		Command::SetSessionState {
			token: Some("[{}]".into()),
			area: None,
		},
	);

	assert!(!Arc::ptr_eq(&before.areas, &after.areas));
	assert!(Arc::ptr_eq(&before.areas["foo"], &after.areas["foo"]));
	let (old, new) = (&before.areas[DEFAULT_AREA], &after.areas[DEFAULT_AREA]);
	assert!(!Arc::ptr_eq(old, new));
	assert!(Arc::ptr_eq(&old.resources, &new.resources));
	assert_eq!(new.session_state.as_deref(), Some("[{}]"));
}

#[test]
fn set_state_replaces_wholesale() {
	let mut replacement = State::default();
	replacement.current_area_name = "foobar".into();
	let replacement = Arc::new(replacement);

	let next = reduce(&Arc::new(State::default()), Command::SetState(Arc::clone(&replacement)));
	assert!(Arc::ptr_eq(&next, &replacement));
}

#[test]
fn dialog_flags_and_annotation_settings() {
	let state = apply([
		Command::SetWindowTypeDialogOpen { open: true, area: None },
		Command::SetJumpToWindowDialogOpen { open: true, area: None },
		Command::SetAnnotationEnabled(true),
		Command::SetAnnotationText {
			text: json!({"items": []}),
			area: None,
		},
	]);
	assert!(selectors::window_type_dialog_open(&state, None));
	assert!(selectors::jump_to_window_dialog_open(&state, None));
	assert!(selectors::annotation_enabled(&state));
	assert_eq!(selectors::annotation_text(&state, None), Some(&json!({"items": []})));
}
