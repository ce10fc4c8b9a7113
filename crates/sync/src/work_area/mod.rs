//! Area lifecycle controller.
//!
//! A [`WorkArea`] binds one viewer instance at a time to the current area of
//! the resource store. It reacts to store changes (area switch, resource
//! drift, language) and to viewer changes (user opened or closed windows),
//! and saves the outgoing area's session whenever a viewer is torn down.
//!
//! # Lifecycle
//!
//! ```text
//! Detached ──attach(None)──► NoViewer
//!    │
//!    └──attach(Some)──► Active ──switch──► Detaching ──► Active (next area)
//!                         │
//!                         └──detach──► Detaching ──► Detached
//! ```
//!
//! The viewer is unmounted during `Detaching`, while its container is still
//! attached. A torn-down viewer is retracted from the published slot before
//! it is unmounted. Newly created viewers are only announced on the lifecycle
//! channel; the owner publishes them one turn later, so consumers can
//! subscribe before the first notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use folio_common::{Observable, Subscription};
use folio_session::{NativeRef, decode, encode};
use folio_state::{Area, Command, Language, Resources, State, Store, selectors};
use folio_viewer::{
	ANNOTATION_ADAPTER_PATH, PluginConfig, ViewerAction, ViewerConfig, ViewerInstance,
	ViewerModule, ViewerStore,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::annotations::AnnotationStore;
use crate::events::EventTarget;
use crate::reconcile::{sync_area_into_viewer, sync_viewer_into_area};


/// A live viewer together with the library that created it.
#[derive(Clone)]
pub struct ViewerHandle {
	pub module: Rc<dyn ViewerModule>,
	pub instance: Rc<dyn ViewerInstance>,
	/// Area the viewer is bound to.
	pub area: String,
}

impl ViewerHandle {
	pub fn store(&self) -> Rc<dyn ViewerStore> {
		self.instance.store()
	}

	/// Whether both handles refer to the same viewer instance.
	pub fn same_instance(&self, other: &ViewerHandle) -> bool {
		Rc::ptr_eq(&self.instance, &other.instance)
	}
}

impl fmt::Debug for ViewerHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewerHandle")
			.field("area", &self.area)
			.finish_non_exhaustive()
	}
}

/// Lifecycle notifications sent to the owner of a [`WorkArea`].
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
	/// A viewer was created and bound to an area.
	ViewerReady(ViewerHandle),
	/// The viewer was torn down without a replacement.
	ViewerDetached,
}

/// Channel sender for lifecycle notifications.
pub type LifecycleSender = mpsc::UnboundedSender<LifecycleEvent>;

/// Slot the owner publishes the current viewer through.
pub type PublishedViewer = Rc<Observable<Option<ViewerHandle>>>;

/// Viewer settings every created viewer starts from.
#[derive(Debug, Clone, Default)]
pub struct WorkAreaOptions {
	pub viewer: ViewerConfig,
	pub plugins: Vec<PluginConfig>,
}

/// Observable lifecycle phase of a [`WorkArea`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
	Detached,
	/// Attached to the store, but no viewer library is available.
	NoViewer,
	/// A viewer is mounted for the current area.
	Active,
	/// The viewer is being unmounted.
	Detaching,
}

struct ActiveViewer {
	handle: ViewerHandle,
	store: Rc<dyn ViewerStore>,
	subscription: Subscription,
	/// Resources last converged into the viewer.
	resources: Arc<Resources>,
	language: Language,
}

enum Phase {
	Detached,
	NoViewer,
	Active(ActiveViewer),
	Detaching,
}

/// What a store change requires from the work area.
enum Reaction {
	Switch(Arc<Area>),
	Converge {
		area: Option<Arc<Area>>,
		language: Option<Language>,
	},
}

/// Keeps the viewer of the current area in sync with the resource store.
pub struct WorkArea {
	this: Weak<WorkArea>,
	store: Rc<Store>,
	events: Rc<EventTarget>,
	annotations: Rc<AnnotationStore>,
	options: WorkAreaOptions,
	published: PublishedViewer,
	tx: LifecycleSender,
	phase: RefCell<Phase>,
	store_subscription: RefCell<Option<Subscription>>,
	/// Set while a pass or transition runs; viewer notifications are ignored.
	busy: Cell<bool>,
	/// A store change arrived while busy.
	pending: Cell<bool>,
}

struct BusyGuard<'a>(&'a Cell<bool>);

impl Drop for BusyGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

impl WorkArea {
	pub fn new(
		store: Rc<Store>,
		events: Rc<EventTarget>,
		annotations: Rc<AnnotationStore>,
		options: WorkAreaOptions,
		published: PublishedViewer,
		tx: LifecycleSender,
	) -> Rc<Self> {
		Rc::new_cyclic(|this| Self {
			this: this.clone(),
			store,
			events,
			annotations,
			options,
			published,
			tx,
			phase: RefCell::new(Phase::Detached),
			store_subscription: RefCell::new(None),
			busy: Cell::new(false),
			pending: Cell::new(false),
		})
	}

	pub fn phase(&self) -> LifecyclePhase {
		match &*self.phase.borrow() {
			Phase::Detached => LifecyclePhase::Detached,
			Phase::NoViewer => LifecyclePhase::NoViewer,
			Phase::Active(_) => LifecyclePhase::Active,
			Phase::Detaching => LifecyclePhase::Detaching,
		}
	}

	/// The mounted viewer, if any.
	pub fn viewer(&self) -> Option<ViewerHandle> {
		match &*self.phase.borrow() {
			Phase::Active(active) => Some(active.handle.clone()),
			_ => None,
		}
	}

	/// Starts following the store and, if `module` is available, mounts a
	/// viewer for the current area.
	///
	/// Without a module the work area stays attached but viewer-less. Calling
	/// this while attached does nothing.
	pub fn attach(&self, module: Option<Rc<dyn ViewerModule>>) {
		if !matches!(*self.phase.borrow(), Phase::Detached) {
			debug!("work_area.attach ignored, already attached");
			return;
		}

		let this = self.this.clone();
		let subscription = self.store.subscribe(move |state| {
			if let Some(work_area) = this.upgrade() {
				work_area.on_store_change(state);
			}
		});
		*self.store_subscription.borrow_mut() = Some(subscription);

		let Some(module) = module else {
			warn!("viewer library unavailable, work area stays without viewer");
			*self.phase.borrow_mut() = Phase::NoViewer;
			return;
		};

		let state = self.store.state();
		let Some(area) = selectors::current_area(&state).cloned() else {
			warn!(area = %state.current_area_name, "current work area does not exist");
			*self.phase.borrow_mut() = Phase::NoViewer;
			return;
		};
		{
			let _busy = self.enter();
			self.init_viewer(module, &area, state.i18n_config.language);
		}
		self.flush_pending();
	}

	/// Saves the current area's session, unmounts the viewer and stops
	/// following the store.
	pub fn detach(&self) {
		if matches!(*self.phase.borrow(), Phase::Detached) {
			return;
		}
		if let Some(subscription) = self.store_subscription.borrow_mut().take() {
			subscription.unsubscribe();
		}

		let _busy = self.enter();
		if let Some(active) = self.begin_teardown() {
			self.teardown(active);
		}
		*self.phase.borrow_mut() = Phase::Detached;
		self.pending.set(false);
		debug!("work_area.detached");
		self.announce(LifecycleEvent::ViewerDetached);
	}

	fn enter(&self) -> BusyGuard<'_> {
		self.busy.set(true);
		BusyGuard(&self.busy)
	}

	fn on_store_change(&self, state: &Arc<State>) {
		if self.busy.get() {
			self.pending.set(true);
			return;
		}
		self.react(state);
		self.flush_pending();
	}

	fn flush_pending(&self) {
		while self.pending.replace(false) {
			self.react(&self.store.state());
		}
	}

	fn react(&self, state: &Arc<State>) {
		let Some(reaction) = self.plan(state) else {
			return;
		};
		let _busy = self.enter();
		match reaction {
			Reaction::Switch(next) => self.switch_area(&next, state.i18n_config.language),
			Reaction::Converge { area, language } => {
				let Some((store, area_name)) = self.active_store() else {
					return;
				};
				if let Some(area) = area {
					sync_area_into_viewer(&area, store.as_ref());
					self.with_active(|active| active.resources = Arc::clone(&area.resources));
				}
				if let Some(language) = language {
					debug!(area = %area_name, %language, "work_area.language");
					store.dispatch(ViewerAction::UpdateConfig {
						language: language.code().to_string(),
					});
					self.with_active(|active| active.language = language);
				}
			}
		}
	}

	fn plan(&self, state: &State) -> Option<Reaction> {
		let phase = self.phase.borrow();
		let Phase::Active(active) = &*phase else {
			return None;
		};
		let Some(area) = selectors::current_area(state) else {
			warn!(area = %state.current_area_name, "current work area does not exist");
			return None;
		};
		if area.name != active.handle.area {
			return Some(Reaction::Switch(Arc::clone(area)));
		}

		let resources_changed = !Arc::ptr_eq(&area.resources, &active.resources);
		let language = state.i18n_config.language;
		let language_changed = language != active.language;
		if !resources_changed && !language_changed {
			return None;
		}
		Some(Reaction::Converge {
			area: resources_changed.then(|| Arc::clone(area)),
			language: language_changed.then_some(language),
		})
	}

	fn switch_area(&self, next: &Area, language: Language) {
		let Some(active) = self.begin_teardown() else {
			return;
		};
		debug!(from = %active.handle.area, to = %next.name, "work_area.switch");
		let module = Rc::clone(&active.handle.module);
		self.teardown(active);
		self.init_viewer(module, next, language);
	}

	/// Moves an active viewer out of the phase, leaving `Detaching` behind.
	fn begin_teardown(&self) -> Option<ActiveViewer> {
		let mut phase = self.phase.borrow_mut();
		match std::mem::replace(&mut *phase, Phase::Detaching) {
			Phase::Active(active) => Some(active),
			other => {
				*phase = other;
				None
			}
		}
	}

	/// Retracts the published viewer, saves session and annotations of the
	/// outgoing area, then unsubscribes from and unmounts its viewer.
	fn teardown(&self, active: ActiveViewer) {
		if self.published.get().is_some() {
			self.published.set(None);
		}
		let area = Some(active.handle.area.clone());
		let text = self
			.annotations
			.all()
			.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
		self.store.dispatch_batch([
			Command::SetSessionState {
				token: Some(encode(&active.store.export_state())),
				area: area.clone(),
			},
			Command::SetAnnotationText { text, area },
		]);
		active.subscription.unsubscribe();
		active.handle.instance.unmount();
		debug!(area = %active.handle.area, "work_area.viewer_unmounted");
	}

	/// Creates a viewer for `area`, restores its saved session and converges
	/// it onto the area's resources.
	fn init_viewer(&self, module: Rc<dyn ViewerModule>, area: &Area, language: Language) {
		let adapter = NativeRef::from_rc(Rc::clone(&self.annotations));
		let mut config = self.options.viewer.clone();
		config.language = language.code().to_string();
		config.annotation_adapter = Some(adapter.clone());
		self.annotations.replace_page(Some(&area.annotation_text));

		let instance = module.create(config, self.options.plugins.clone());
		let store = instance.store();

		if let Some(token) = &area.session_state {
			match decode(token) {
				Ok(mut session) => {
					if !session.reinject_native(ANNOTATION_ADAPTER_PATH, adapter) {
						debug!(area = %area.name, "saved session has no viewer config");
					}
					store.dispatch(ViewerAction::ImportState(session));
				}
				Err(error) => {
					warn!(area = %area.name, %error, "discarding unreadable viewer session");
				}
			}
		}
		store.dispatch(ViewerAction::UpdateConfig {
			language: language.code().to_string(),
		});
		sync_area_into_viewer(area, store.as_ref());

		let this = self.this.clone();
		let subscription = store.subscribe(Rc::new(move || {
			if let Some(work_area) = this.upgrade() {
				work_area.on_viewer_change();
			}
		}));

		let handle = ViewerHandle {
			module,
			instance,
			area: area.name.clone(),
		};
		*self.phase.borrow_mut() = Phase::Active(ActiveViewer {
			handle: handle.clone(),
			store,
			subscription,
			resources: Arc::clone(&area.resources),
			language,
		});
		debug!(area = %area.name, restored = area.session_state.is_some(), "work_area.viewer_ready");
		self.announce(LifecycleEvent::ViewerReady(handle));
	}

	fn on_viewer_change(&self) {
		if self.busy.get() {
			return;
		}
		let Some((store, area_name)) = self.active_store() else {
			return;
		};
		let state = self.store.state();
		let Some(area) = selectors::area(&state, Some(&area_name)) else {
			return;
		};
		{
			let _busy = self.enter();
			let (commands, _) = sync_viewer_into_area(area, store.as_ref(), &self.events);
			self.store.dispatch_batch(commands);
		}
		self.flush_pending();
	}

	fn active_store(&self) -> Option<(Rc<dyn ViewerStore>, String)> {
		match &*self.phase.borrow() {
			Phase::Active(active) => Some((Rc::clone(&active.store), active.handle.area.clone())),
			_ => None,
		}
	}

	fn with_active(&self, f: impl FnOnce(&mut ActiveViewer)) {
		if let Phase::Active(active) = &mut *self.phase.borrow_mut() {
			f(active);
		}
	}

	fn announce(&self, event: LifecycleEvent) {
		if self.tx.send(event).is_err() {
			debug!("work_area.announce dropped, receiver closed");
		}
	}
}

impl fmt::Debug for WorkArea {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WorkArea")
			.field("phase", &self.phase())
			.field("busy", &self.busy.get())
			.finish_non_exhaustive()
	}
}
