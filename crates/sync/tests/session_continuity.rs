//! Viewer sessions survive area switches and page reloads.

use std::rc::Rc;

use folio_common::Observable;
use folio_session::decode;
use folio_state::persist::{Persistor, rehydrate};
use folio_state::{Command, MemoryStorage, SessionStorage, State, Store, selectors};
use folio_sync::{AnnotationStore, EventTarget, WorkArea, WorkAreaOptions};
use folio_viewer::mock::MockViewerModule;
use folio_viewer::{ViewerModule, ViewerStore, ViewerWindow};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

struct Page {
	store: Rc<Store>,
	module: Rc<MockViewerModule>,
	work_area: Rc<WorkArea>,
	_persist: folio_common::Subscription,
}

/// Boots a page against `storage` the way the workspace does on mount.
fn boot(storage: Rc<MemoryStorage>) -> Page {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let dyn_storage: Rc<dyn SessionStorage> = storage;
	let store = Rc::new(Store::new(rehydrate(dyn_storage.as_ref(), State::default())));
	let persistor = Persistor::new(Rc::clone(&dyn_storage));
	persistor.write(&store.state());
	let persist = store.subscribe(move |state| persistor.write(state));

	let annotations = Rc::new(AnnotationStore::new(dyn_storage, "page"));
	let (tx, _rx) = mpsc::unbounded_channel();
	let work_area = WorkArea::new(
		Rc::clone(&store),
		Rc::new(EventTarget::new()),
		annotations,
		WorkAreaOptions::default(),
		Rc::new(Observable::new(None)),
		tx,
	);
	let module = MockViewerModule::new();
	let dyn_module: Rc<dyn ViewerModule> = module.clone();
	work_area.attach(Some(dyn_module));
	Page {
		store,
		module,
		work_area,
		_persist: persist,
	}
}

fn open(page: &Page, id: &str) {
	page.module.last().unwrap().mock_store().user_open_window(ViewerWindow {
		id: id.to_string(),
		manifest_id: Some(format!("https://iiif.example.org/{id}/manifest")),
		resource: None,
		title: None,
	});
}

#[test]
fn switch_round_trip_restores_captured_state() {
	let page = boot(Rc::new(MemoryStorage::new()));
	page.store.dispatch_batch([
		Command::CreateArea { name: "foo".into() },
		Command::CreateArea { name: "bar".into() },
		Command::SetCurrentArea { name: "foo".into() },
	]);
	open(&page, "m1");
	open(&page, "m2");

	page.store.dispatch(Command::SetCurrentArea { name: "bar".into() });
	let state = page.store.state();
	let captured = selectors::session_state(&state, Some("foo")).unwrap().to_string();
	page.store.dispatch(Command::SetCurrentArea { name: "foo".into() });

	let viewer = page.module.last().unwrap().mock_store();
	assert_eq!(
		viewer.imported_state().unwrap().to_json(),
		decode(&captured).unwrap().to_json()
	);
	assert_eq!(viewer.window_ids(), ["m1", "m2"]);
	assert_eq!(page.module.instances().len(), 4);
}

#[test]
fn session_survives_reload() {
	let storage = Rc::new(MemoryStorage::new());
	let first = boot(Rc::clone(&storage));
	open(&first, "m1");
	first.work_area.detach();
	drop(first);

	let second = boot(storage);

	let viewer = second.module.last().unwrap().mock_store();
	assert!(viewer.imported_state().is_some());
	assert_eq!(viewer.window_ids(), ["m1"]);
	let state = second.store.state();
	let ids: Vec<_> = selectors::resources(&state, None)
		.iter()
		.map(|r| r.id.as_str())
		.collect();
	assert_eq!(ids, ["m1"]);
}

#[test]
fn deleted_current_area_falls_back_to_default() {
	let page = boot(Rc::new(MemoryStorage::new()));
	page.store.dispatch_batch([
		Command::CreateArea { name: "foo".into() },
		Command::CreateArea { name: "bar".into() },
		Command::SetCurrentArea { name: "foo".into() },
	]);

	page.store.dispatch(Command::DeleteArea { name: "bar".into() });
	assert_eq!(page.store.state().current_area_name, "foo");

	page.store.dispatch(Command::DeleteArea { name: "foo".into() });
	assert_eq!(page.store.state().current_area_name, "default");
	assert_eq!(page.work_area.viewer().unwrap().area, "default");
}
