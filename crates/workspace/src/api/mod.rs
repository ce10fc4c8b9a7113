//! The public workspace module.
//!
//! A [`Workspace`] owns the resource store, the event target and the viewer
//! observable. Mounting renders the workspace markup into the host's
//! containers and binds a [`WorkArea`] to the current area; everything else
//! is a thin call into the store or the mounted viewer.
//!
//! A viewer is withdrawn from [`Workspace::viewer_api`] as soon as it is torn
//! down and its replacement is published one turn later, either by
//! [`Workspace::run`] or by the next call into the workspace.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use folio_common::{Observable, Subscription};
use folio_state::persist::{Persistor, rehydrate};
use folio_state::{
	Command, I18nConfig, Language, Location, MemoryStorage, Resource, SessionStorage, State, Store,
	selectors,
};
use folio_sync::annotations::DEFAULT_PAGE_ID;
use folio_sync::{
	AnnotationStore, Event, EventDetail, EventKind, EventTarget, LifecycleEvent, PublishedViewer,
	ViewerHandle, WorkArea, WorkAreaOptions,
};
use folio_viewer::{PluginConfig, ViewerAction, ViewerConfig, ViewerModule, WindowLayout};
use indexmap::IndexMap;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::config::Config;
use crate::container::{Container, Containers, Unit};
use crate::error::MountError;
use crate::loader::ViewerLoader;
use crate::msg::{self, MsgReceiver, MsgSender};


struct Mounted {
	containers: Vec<(Unit, Rc<dyn Container>)>,
	work_area: Rc<WorkArea>,
}

enum MountPhase {
	Unmounted,
	/// Waiting for the viewer library.
	Mounting,
	Mounted(Mounted),
}

/// Puts the phase back to `Unmounted` if a mount is abandoned while waiting
/// for the viewer library.
struct MountAttempt<'a>(&'a RefCell<MountPhase>);

impl Drop for MountAttempt<'_> {
	fn drop(&mut self) {
		let mut phase = self.0.borrow_mut();
		if matches!(*phase, MountPhase::Mounting) {
			*phase = MountPhase::Unmounted;
			debug!("workspace.mount cancelled");
		}
	}
}

/// Embeddable workspace module.
pub struct Workspace {
	config: Config,
	store: Rc<Store>,
	events: Rc<EventTarget>,
	annotations: Rc<AnnotationStore>,
	loader: Rc<dyn ViewerLoader>,
	viewer_module: OnceCell<Option<Rc<dyn ViewerModule>>>,
	viewer_api: PublishedViewer,
	phase: RefCell<MountPhase>,
	msg_tx: MsgSender,
	msg_rx: Mutex<MsgReceiver>,
	_store_subscriptions: Vec<Subscription>,
}

impl Workspace {
	/// Creates a workspace with in-memory session storage.
	pub fn create(config: Config, loader: Rc<dyn ViewerLoader>) -> Self {
		Self::with_storage(config, loader, Rc::new(MemoryStorage::new()))
	}

	/// Creates a workspace persisting into `storage`.
	///
	/// With `persist_store` set, the store starts from whatever `storage`
	/// holds and writes a snapshot after every change.
	pub fn with_storage(
		config: Config,
		loader: Rc<dyn ViewerLoader>,
		storage: Rc<dyn SessionStorage>,
	) -> Self {
		let initial = if config.persist_store {
			rehydrate(storage.as_ref(), State::default())
		} else {
			State::default()
		};
		let store = Rc::new(Store::new(initial));
		let events = Rc::new(EventTarget::new());
		let mut subscriptions = Vec::new();

		if config.persist_store {
			let persistor = Persistor::new(Rc::clone(&storage));
			persistor.write(&store.state());
			subscriptions.push(store.subscribe(move |state| persistor.write(state)));
		}

		let target = Rc::clone(&events);
		subscriptions.push(store.subscribe(move |state| {
			target.fire(EventKind::StateChanged, EventDetail::State(Arc::clone(state)), false);
		}));

		let (msg_tx, msg_rx) = msg::channel();
		debug!(persist = config.persist_store, "workspace.created");
		Self {
			annotations: Rc::new(AnnotationStore::new(storage, DEFAULT_PAGE_ID)),
			config,
			store,
			events,
			loader,
			viewer_module: OnceCell::new(),
			viewer_api: Rc::new(Observable::new(None)),
			phase: RefCell::new(MountPhase::Unmounted),
			msg_tx,
			msg_rx: Mutex::new(msg_rx),
			_store_subscriptions: subscriptions,
		}
	}

	/// Renders the workspace into `containers` and binds a viewer to the
	/// current area.
	///
	/// The first entry hosts the workspace root. Fails if `containers` is
	/// empty or names an unknown unit. Calling this while mounted, or while
	/// a previous call is still loading the viewer, does nothing. If the
	/// viewer library cannot be loaded the workspace mounts without viewer.
	/// Dropping the future before the library arrives leaves the workspace
	/// unmounted.
	pub async fn mount(&self, containers: Containers) -> Result<(), MountError> {
		if containers.is_empty() {
			return Err(MountError::InvalidArgument(
				"mount(): unit container was empty".to_string(),
			));
		}
		let containers = containers
			.into_iter()
			.map(|(name, container)| name.parse::<Unit>().map(|unit| (unit, container)))
			.collect::<Result<Vec<_>, MountError>>()?;

		{
			let mut phase = self.phase.borrow_mut();
			if !matches!(*phase, MountPhase::Unmounted) {
				debug!("workspace.mount ignored, already mounted");
				return Ok(());
			}
			*phase = MountPhase::Mounting;
		}
		let _attempt = MountAttempt(&self.phase);

		let module = self
			.viewer_module
			.get_or_init(|| self.loader.load())
			.await
			.clone();
		if module.is_none() {
			warn!("viewer library unavailable, mounting without viewer");
		}

		for (unit, container) in &containers {
			container.replace_children(Some(&unit.markup(&self.config.class_name_prefix)));
		}

		let work_area = WorkArea::new(
			Rc::clone(&self.store),
			Rc::clone(&self.events),
			Rc::clone(&self.annotations),
			self.work_area_options(),
			Rc::clone(&self.viewer_api),
			self.msg_tx.clone(),
		);
		*self.phase.borrow_mut() = MountPhase::Mounted(Mounted {
			containers,
			work_area: Rc::clone(&work_area),
		});
		work_area.attach(module);
		debug!("workspace.mounted");

		tokio::task::yield_now().await;
		self.drain_messages();
		Ok(())
	}

	/// Tears the workspace down. Returns whether anything was mounted.
	///
	/// The viewer is unmounted and its session saved before the containers
	/// are emptied.
	pub async fn unmount(&self) -> bool {
		let mounted = {
			let mut phase = self.phase.borrow_mut();
			match std::mem::replace(&mut *phase, MountPhase::Unmounted) {
				MountPhase::Mounted(mounted) => mounted,
				other => {
					*phase = other;
					return false;
				}
			}
		};
		mounted.work_area.detach();
		for (_, container) in &mounted.containers {
			container.replace_children(None);
		}
		self.drain_messages();
		debug!("workspace.unmounted");
		true
	}

	pub fn is_mounted(&self) -> bool {
		matches!(*self.phase.borrow(), MountPhase::Mounted(_))
	}

	/// Publishes queued lifecycle notifications. Returns how many there were.
	///
	/// Every other call into the workspace drains first, so a viewer created
	/// by one call is published by the next. Does nothing while
	/// [`Workspace::run`] is publishing.
	pub fn drain_messages(&self) -> usize {
		let messages: Vec<LifecycleEvent> = {
			let Ok(mut rx) = self.msg_rx.try_lock() else {
				return 0;
			};
			std::iter::from_fn(|| rx.try_recv().ok()).collect()
		};
		let count = messages.len();
		self.publish(messages);
		count
	}

	/// Publishes lifecycle notifications one turn after they were queued.
	///
	/// Never returns; hosts run it alongside their own tasks, for example in
	/// a `tokio::task::LocalSet`, and cancel it by dropping the future.
	pub async fn run(&self) {
		let mut rx = self.msg_rx.lock().await;
		while let Some(first) = rx.recv().await {
			tokio::task::yield_now().await;
			let mut messages = vec![first];
			messages.extend(std::iter::from_fn(|| rx.try_recv().ok()));
			self.publish(messages);
		}
	}

	/// Observable of the published viewer.
	pub fn viewer_api(&self) -> &Observable<Option<ViewerHandle>> {
		self.drain_messages();
		&self.viewer_api
	}

	pub fn get_config(&self) -> &Config {
		&self.config
	}

	pub fn event_target(&self) -> &Rc<EventTarget> {
		&self.events
	}

	/// Registers a listener; the returned handle removes it again.
	pub fn add_event_listener(
		&self,
		kind: EventKind,
		listener: impl Fn(&Event) + 'static,
	) -> Subscription {
		self.events.add_event_listener(kind, listener)
	}

	pub fn store(&self) -> &Rc<Store> {
		&self.store
	}

	pub fn get_state(&self) -> Arc<State> {
		self.store.state()
	}

	pub fn set_state(&self, state: State) {
		self.dispatch(Command::SetState(Arc::new(state)));
	}

	pub fn get_location(&self) -> Location {
		selectors::location(&self.store.state()).clone()
	}

	pub fn set_location(&self, location: Location) {
		self.dispatch(Command::SetLocation(location));
	}

	pub fn get_language(&self) -> Language {
		selectors::i18n_config(&self.store.state()).language
	}

	pub fn set_language(&self, language: Language) {
		let current = selectors::i18n_config(&self.store.state()).clone();
		self.dispatch(Command::SetI18nConfig(I18nConfig {
			language,
			..current
		}));
	}

	/// Adds or replaces a resource. `area` defaults to the current area.
	pub fn add_resource(&self, resource: Resource, area: Option<&str>) {
		self.dispatch(Command::AddResource {
			resource,
			area: area.map(str::to_string),
		});
	}

	pub fn remove_resource(&self, resource: &Resource, area: Option<&str>) {
		self.dispatch(Command::RemoveResource {
			id: resource.id.clone(),
			area: area.map(str::to_string),
		});
	}

	/// Removes every resource of a manifest.
	pub fn remove_resources(&self, manifest_id: &str, area: Option<&str>) {
		self.dispatch(Command::RemoveResources {
			manifest_id: manifest_id.to_string(),
			area: area.map(str::to_string),
		});
	}

	/// Resources of an area in insertion order.
	pub fn get_resources(&self, area: Option<&str>) -> Vec<Resource> {
		selectors::resources(&self.store.state(), area)
			.into_iter()
			.cloned()
			.collect()
	}

	pub fn create_area(&self, name: &str) {
		self.dispatch(Command::CreateArea {
			name: name.to_string(),
		});
	}

	pub fn delete_area(&self, name: &str) {
		self.dispatch(Command::DeleteArea {
			name: name.to_string(),
		});
	}

	pub fn set_current_area(&self, name: &str) {
		self.dispatch(Command::SetCurrentArea {
			name: name.to_string(),
		});
	}

	pub fn get_area_names(&self) -> Vec<String> {
		selectors::area_names(&self.store.state())
			.into_iter()
			.map(str::to_string)
			.collect()
	}

	pub fn get_current_area_name(&self) -> String {
		selectors::current_area_name(&self.store.state()).to_string()
	}

	pub fn set_window_type_dialog_open(&self, open: bool) {
		self.dispatch(Command::SetWindowTypeDialogOpen { open, area: None });
	}

	pub fn set_jump_to_window_dialog_open(&self, open: bool) {
		self.dispatch(Command::SetJumpToWindowDialogOpen { open, area: None });
	}

	pub fn set_fullscreen(&self) {
		self.with_viewer(|viewer| {
			viewer.store().dispatch(ViewerAction::SetWorkspaceFullscreen(true));
		});
	}

	/// Shows or hides the viewer's album panel.
	pub fn toggle_album(&self) {
		self.with_viewer(|viewer| {
			let store = viewer.store();
			let visible = store.is_workspace_add_visible();
			store.dispatch(ViewerAction::SetWorkspaceAddVisibility(!visible));
		});
	}

	pub fn set_window_type(&self, layout: WindowLayout) {
		self.with_viewer(|viewer| {
			viewer.store().dispatch(ViewerAction::UpdateWorkspace { layout });
		});
	}

	/// Focuses a window, hides the album panel and closes the
	/// jump-to-window dialog.
	pub fn focus_window(&self, id: &str) {
		let focused = self.with_viewer(|viewer| {
			let store = viewer.store();
			store.dispatch(ViewerAction::FocusWindow {
				id: id.to_string(),
				pan: true,
			});
			if store.is_workspace_add_visible() {
				store.dispatch(ViewerAction::SetWorkspaceAddVisibility(false));
			}
		});
		if focused.is_some() {
			self.set_jump_to_window_dialog_open(false);
		}
	}

	/// Window titles by window id; untitled windows fall back to their id.
	pub fn window_titles(&self) -> IndexMap<String, String> {
		self.with_viewer(|viewer| {
			let store = viewer.store();
			store
				.window_ids()
				.into_iter()
				.map(|id| {
					let title = store
						.window(&id)
						.and_then(|window| window.title)
						.unwrap_or_else(|| id.clone());
					(id, title)
				})
				.collect()
		})
		.unwrap_or_default()
	}

	fn dispatch(&self, command: Command) {
		self.drain_messages();
		self.store.dispatch(command);
	}

	/// Publishes a drained batch. Announcements of viewers that were torn
	/// down in the meantime are dropped.
	fn publish(&self, messages: Vec<LifecycleEvent>) {
		for message in messages {
			match message {
				LifecycleEvent::ViewerReady(handle) => {
					let live = self.live_viewer();
					if !live.is_some_and(|live| live.same_instance(&handle)) {
						debug!(area = %handle.area, "workspace.viewer_superseded");
						continue;
					}
					debug!(area = %handle.area, "workspace.viewer_published");
					self.viewer_api.set(Some(handle));
				}
				LifecycleEvent::ViewerDetached => {
					if self.viewer_api.get().is_some() {
						self.viewer_api.set(None);
					}
				}
			}
		}
	}

	fn live_viewer(&self) -> Option<ViewerHandle> {
		match &*self.phase.borrow() {
			MountPhase::Mounted(mounted) => mounted.work_area.viewer(),
			_ => None,
		}
	}

	/// Runs `f` against the mounted viewer, if there is one.
	fn with_viewer<R>(&self, f: impl FnOnce(&ViewerHandle) -> R) -> Option<R> {
		self.drain_messages();
		self.live_viewer().as_ref().map(f)
	}

	fn work_area_options(&self) -> WorkAreaOptions {
		WorkAreaOptions {
			viewer: ViewerConfig {
				language: self.get_language().code().to_string(),
				..ViewerConfig::default()
			},
			plugins: vec![
				PluginConfig::TeiViewer {
					tei_endpoint: self.config.tei_endpoint.to_string(),
				},
				PluginConfig::Annotations {
					export_local_storage_annotations: true,
				},
			],
		}
	}
}

impl std::fmt::Debug for Workspace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Workspace")
			.field("config", &self.config)
			.field("mounted", &self.is_mounted())
			.finish_non_exhaustive()
	}
}
