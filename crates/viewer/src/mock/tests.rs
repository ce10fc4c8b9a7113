use std::cell::Cell;
use std::rc::Rc;

use folio_session::{decode, encode};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn viewer() -> MockViewer {
	MockViewer::new(ViewerConfig::default(), Vec::new())
}

#[test]
fn add_window_fills_catalog_and_remove_resource_clears_it() {
	let viewer = viewer();
	let store = viewer.mock_store();

	store.dispatch(ViewerAction::AddWindow {
		id: "a".into(),
		manifest_id: Some("a".into()),
		resource: json!({"id": "a"}),
	});
	store.dispatch(ViewerAction::AddWindow {
		id: "b".into(),
		manifest_id: None,
		resource: json!({"id": "b"}),
	});
	assert_eq!(store.catalog(), [Some("a".to_string()), None]);

	store.dispatch(ViewerAction::RemoveResource { id: Some("a".into()) });
	store.dispatch(ViewerAction::RemoveResource { id: None });
	assert!(store.catalog().is_empty());
	assert_eq!(store.window_ids(), ["a", "b"]);
	assert_eq!(store.window("b").unwrap().resource, Some(json!({"id": "b"})));
}

#[test]
fn every_dispatch_notifies_subscribers() {
	let store = viewer().mock_store();
	let calls = Rc::new(Cell::new(0));
	let counter = Rc::clone(&calls);
	let sub = store.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

	store.dispatch(ViewerAction::SetWorkspaceFullscreen(true));
	store.dispatch(ViewerAction::UpdateConfig { language: "en".into() });
	store.user_touch();
	sub.unsubscribe();
	store.dispatch(ViewerAction::SetWorkspaceFullscreen(false));

	assert_eq!(calls.get(), 3);
	assert_eq!(store.language().as_deref(), Some("en"));
}

#[test]
fn exported_state_shares_focused_window_node() {
	let store = viewer().mock_store();
	store.user_open_window(ViewerWindow {
		id: "w1".into(),
		manifest_id: Some("m1".into()),
		resource: None,
		title: Some("Codex".into()),
	});
	store.dispatch(ViewerAction::FocusWindow { id: "w1".into(), pan: true });

	let graph = decode(&encode(&store.export_state())).unwrap();
	assert_eq!(
		graph.lookup(&["workspace", "focusedWindow"]),
		graph.lookup(&["windows", "w1"])
	);
}

#[test]
fn import_restores_exported_state_and_adapter() {
	let source = viewer().mock_store();
	source.user_open_window(ViewerWindow {
		id: "w1".into(),
		manifest_id: Some("m1".into()),
		resource: Some(json!({"type": "iiif:manifest", "id": "w1"})),
		title: None,
	});
	source.dispatch(ViewerAction::UpdateWorkspace { layout: WindowLayout::Elastic });
	source.dispatch(ViewerAction::SetWorkspaceAddVisibility(true));

	let mut graph = decode(&encode(&source.export_state())).unwrap();
	let adapter = NativeRef::new("adapter");
	assert!(graph.reinject_native(ANNOTATION_ADAPTER_PATH, adapter.clone()));

	let target = viewer().mock_store();
	target.dispatch(ViewerAction::ImportState(graph));

	assert_eq!(target.window_ids(), ["w1"]);
	assert_eq!(target.window("w1"), source.window("w1"));
	assert_eq!(target.layout(), WindowLayout::Elastic);
	assert!(target.is_workspace_add_visible());
	assert!(target.annotation_adapter().is_some_and(|a| a.ptr_eq(&adapter)));
	assert_eq!(
		encode(&target.imported_state().unwrap()),
		encode(&source.export_state())
	);
}

#[test]
fn module_tracks_created_viewers() {
	let module = MockViewerModule::new();
	let plugins = vec![PluginConfig::TeiViewer {
		tei_endpoint: "http://example.com/api/search".into(),
	}];
	let instance = module.create(ViewerConfig::default(), plugins.clone());
	instance.unmount();

	let created = module.last().unwrap();
	assert!(created.is_unmounted());
	assert_eq!(created.plugins(), plugins.as_slice());
	assert_eq!(module.instances().len(), 1);
}
