//! In-memory viewer.
//!
//! Keeps a window list, a catalog and workspace flags, applies the subset of
//! actions the host dispatches, records every action it received and notifies
//! subscribers synchronously after each one, the way the real viewer's store
//! does. Methods prefixed `user_` simulate interaction with the viewer UI.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_common::{Listeners, Subscription};
use folio_session::{NativeRef, Node, SessionGraph};
use indexmap::IndexMap;
use serde_json::{Value, json};
use tracing::trace;

use crate::action::{ViewerAction, WindowLayout};
use crate::config::{ANNOTATION_ADAPTER_PATH, PluginConfig, ViewerConfig};
use crate::contract::{ViewerInstance, ViewerModule, ViewerStore, ViewerWindow};

#[cfg(test)]
mod tests;

/// Viewer library that hands out [`MockViewer`]s and remembers them.
#[derive(Default)]
pub struct MockViewerModule {
	created: RefCell<Vec<Rc<MockViewer>>>,
}

impl MockViewerModule {
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	/// Every viewer created so far, oldest first.
	pub fn instances(&self) -> Vec<Rc<MockViewer>> {
		self.created.borrow().clone()
	}

	/// The most recently created viewer.
	pub fn last(&self) -> Option<Rc<MockViewer>> {
		self.created.borrow().last().cloned()
	}
}

impl ViewerModule for MockViewerModule {
	fn create(&self, config: ViewerConfig, plugins: Vec<PluginConfig>) -> Rc<dyn ViewerInstance> {
		let viewer = Rc::new(MockViewer::new(config, plugins));
		self.created.borrow_mut().push(Rc::clone(&viewer));
		viewer
	}
}

/// A viewer instance backed by a [`MockViewerStore`].
pub struct MockViewer {
	config: ViewerConfig,
	plugins: Vec<PluginConfig>,
	store: Rc<MockViewerStore>,
	unmounted: Cell<bool>,
}

impl MockViewer {
	pub fn new(config: ViewerConfig, plugins: Vec<PluginConfig>) -> Self {
		let store = Rc::new(MockViewerStore::new(&config));
		Self {
			config,
			plugins,
			store,
			unmounted: Cell::new(false),
		}
	}

	pub fn config(&self) -> &ViewerConfig {
		&self.config
	}

	pub fn plugins(&self) -> &[PluginConfig] {
		&self.plugins
	}

	pub fn mock_store(&self) -> Rc<MockViewerStore> {
		Rc::clone(&self.store)
	}

	pub fn is_unmounted(&self) -> bool {
		self.unmounted.get()
	}
}

impl ViewerInstance for MockViewer {
	fn store(&self) -> Rc<dyn ViewerStore> {
		self.store.clone()
	}

	fn unmount(&self) {
		self.unmounted.set(true);
	}
}

#[derive(Debug, Clone)]
struct MockState {
	windows: IndexMap<String, ViewerWindow>,
	catalog: Vec<Option<String>>,
	add_visible: bool,
	fullscreen: bool,
	layout: WindowLayout,
	focused: Option<String>,
	config: Value,
	adapter: Option<NativeRef>,
}

/// Store of a [`MockViewer`].
pub struct MockViewerStore {
	state: RefCell<MockState>,
	listeners: Listeners<dyn Fn()>,
	log: RefCell<Vec<ViewerAction>>,
	imported: RefCell<Option<SessionGraph>>,
}

impl MockViewerStore {
	fn new(config: &ViewerConfig) -> Self {
		Self {
			state: RefCell::new(MockState {
				windows: IndexMap::new(),
				catalog: Vec::new(),
				add_visible: false,
				fullscreen: false,
				layout: WindowLayout::default(),
				focused: None,
				config: config.to_value(),
				adapter: config.annotation_adapter.clone(),
			}),
			listeners: Listeners::new(),
			log: RefCell::new(Vec::new()),
			imported: RefCell::new(None),
		}
	}

	/// Actions dispatched so far, oldest first.
	pub fn actions(&self) -> Vec<ViewerAction> {
		self.log.borrow().clone()
	}

	/// Forgets the recorded actions.
	pub fn clear_actions(&self) {
		self.log.borrow_mut().clear();
	}

	/// The last state passed to [`ViewerAction::ImportState`].
	pub fn imported_state(&self) -> Option<SessionGraph> {
		self.imported.borrow().clone()
	}

	/// Catalog entries in insertion order.
	pub fn catalog(&self) -> Vec<Option<String>> {
		self.state.borrow().catalog.clone()
	}

	pub fn language(&self) -> Option<String> {
		self.state.borrow().config["language"].as_str().map(str::to_string)
	}

	pub fn is_fullscreen(&self) -> bool {
		self.state.borrow().fullscreen
	}

	pub fn layout(&self) -> WindowLayout {
		self.state.borrow().layout
	}

	pub fn focused_window(&self) -> Option<String> {
		self.state.borrow().focused.clone()
	}

	/// The annotation adapter the viewer currently holds.
	pub fn annotation_adapter(&self) -> Option<NativeRef> {
		self.state.borrow().adapter.clone()
	}

	pub fn subscriber_count(&self) -> usize {
		self.listeners.len()
	}

	/// Opens a window as if the user picked a manifest from the catalog.
	pub fn user_open_window(&self, window: ViewerWindow) {
		self.state
			.borrow_mut()
			.windows
			.insert(window.id.clone(), window);
		self.notify();
	}

	/// Closes a window from its close button.
	pub fn user_close_window(&self, id: &str) {
		self.state.borrow_mut().windows.shift_remove(id);
		self.notify();
	}

	/// Changes the host record of a window from inside the viewer, e.g. when
	/// a plugin navigates to another canvas.
	pub fn user_update_window(&self, id: &str, resource: Value) {
		if let Some(window) = self.state.borrow_mut().windows.get_mut(id) {
			window.resource = Some(resource);
		}
		self.notify();
	}

	/// Fires the store listeners without changing any window.
	pub fn user_touch(&self) {
		self.notify();
	}

	fn notify(&self) {
		for listener in self.listeners.snapshot() {
			listener();
		}
	}

	fn apply(&self, action: &ViewerAction) {
		let mut state = self.state.borrow_mut();
		match action {
			ViewerAction::AddWindow {
				id,
				manifest_id,
				resource,
			} => {
				state.catalog.push(manifest_id.clone());
				let window = ViewerWindow {
					id: id.clone(),
					manifest_id: manifest_id.clone(),
					resource: Some(resource.clone()),
					title: None,
				};
				state.windows.insert(id.clone(), window);
			}
			ViewerAction::RemoveWindow { id } => {
				state.windows.shift_remove(id);
			}
			ViewerAction::UpdateWindow { id, resource } => {
				if let Some(window) = state.windows.get_mut(id) {
					window.resource = Some(resource.clone());
				}
			}
			ViewerAction::RemoveResource { id } => state.catalog.retain(|entry| entry != id),
			ViewerAction::UpdateConfig { language } => {
				state.config["language"] = Value::String(language.clone());
			}
			ViewerAction::ImportState(graph) => {
				import_into(&mut state, graph);
				*self.imported.borrow_mut() = Some(graph.clone());
			}
			ViewerAction::SetWorkspaceFullscreen(on) => state.fullscreen = *on,
			ViewerAction::SetWorkspaceAddVisibility(on) => state.add_visible = *on,
			ViewerAction::UpdateWorkspace { layout } => state.layout = *layout,
			ViewerAction::FocusWindow { id, .. } => state.focused = Some(id.clone()),
		}
	}
}

/// Rebuilds mock state from an exported graph. Unknown parts are ignored.
fn import_into(state: &mut MockState, graph: &SessionGraph) {
	let json_at = |path: &[&str]| graph.lookup(path).and_then(|id| graph.subtree_to_json(id));

	if let Some(Value::Object(windows)) = json_at(&["windows"]) {
		state.windows = windows
			.into_iter()
			.filter_map(|(id, window)| serde_json::from_value(window).ok().map(|w| (id, w)))
			.collect();
	}
	if let Some(Value::Array(catalog)) = json_at(&["catalog"]) {
		state.catalog = catalog.iter().map(|e| e.as_str().map(str::to_string)).collect();
	}
	if let Some(workspace) = json_at(&["workspace"]) {
		state.add_visible = workspace["isWorkspaceAddVisible"].as_bool().unwrap_or(false);
		state.fullscreen = workspace["isFullscreen"].as_bool().unwrap_or(false);
		state.layout = serde_json::from_value(workspace["type"].clone()).unwrap_or_default();
		state.focused = workspace["focusedWindowId"].as_str().map(str::to_string);
	}
	if let Some(config) = json_at(&["config"]) {
		state.config = config;
	}
	state.adapter = graph
		.lookup(ANNOTATION_ADAPTER_PATH)
		.and_then(|id| match graph.node(id) {
			Some(Node::Native(native)) => Some(native.clone()),
			_ => None,
		});
}

impl ViewerStore for MockViewerStore {
	fn window_ids(&self) -> Vec<String> {
		self.state.borrow().windows.keys().cloned().collect()
	}

	fn window(&self, id: &str) -> Option<ViewerWindow> {
		self.state.borrow().windows.get(id).cloned()
	}

	fn is_workspace_add_visible(&self) -> bool {
		self.state.borrow().add_visible
	}

	/// Exports windows, catalog, workspace and config.
	///
	/// `workspace.focusedWindow` and the matching entry of `windows` are the
	/// same node, like the shared references in the real viewer's state.
	fn export_state(&self) -> SessionGraph {
		let state = self.state.borrow();
		let mut graph = SessionGraph::object();
		let root = graph.root();

		let windows = graph.alloc(Node::Object(IndexMap::new()));
		let mut focused_node = None;
		for (id, window) in &state.windows {
			let value = serde_json::to_value(window).unwrap_or(Value::Null);
			let node = graph.insert_json(&value);
			graph.insert(windows, id.clone(), node);
			if state.focused.as_deref() == Some(id.as_str()) {
				focused_node = Some(node);
			}
		}
		graph.insert(root, "windows", windows);

		let catalog = graph.insert_json(&json!(state.catalog));
		graph.insert(root, "catalog", catalog);

		let workspace = graph.insert_json(&json!({
			"isWorkspaceAddVisible": state.add_visible,
			"isFullscreen": state.fullscreen,
			"type": state.layout,
			"focusedWindowId": state.focused,
		}));
		if let Some(node) = focused_node {
			graph.insert(workspace, "focusedWindow", node);
		}
		graph.insert(root, "workspace", workspace);

		let config = graph.insert_json(&state.config);
		graph.insert(root, "config", config);
		if let Some(adapter) = &state.adapter {
			graph.reinject_native(ANNOTATION_ADAPTER_PATH, adapter.clone());
		}
		graph
	}

	fn dispatch(&self, action: ViewerAction) {
		trace!(action = action.name(), "mock_viewer.dispatch");
		self.apply(&action);
		self.log.borrow_mut().push(action);
		self.notify();
	}

	fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
		self.listeners.add(listener)
	}
}
