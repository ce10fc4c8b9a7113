//! Session-scoped persistence of the resource store.
//!
//! Only areas, their resources, session tokens and annotation text survive a
//! reload, together with the current area name. Transient dialog flags,
//! language and location are rebuilt from defaults.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{Areas, State};

mod snapshot;
mod storage;


pub use snapshot::{PersistedArea, PersistedState, SCHEMA_VERSION};
pub use storage::{MemoryStorage, SessionStorage};

/// Storage key of the store snapshot.
pub const STORAGE_KEY: &str = "workspace/mirador-areas";

/// Reads the stored snapshot, if any.
pub fn load(storage: &dyn SessionStorage) -> Result<Option<PersistedState>> {
	storage
		.get(STORAGE_KEY)
		.map(|raw| PersistedState::from_json_str(&raw))
		.transpose()
}

/// Builds the initial state from `initial` and whatever `storage` holds.
///
/// An unreadable snapshot is logged and ignored.
pub fn rehydrate(storage: &dyn SessionStorage, initial: State) -> State {
	match load(storage) {
		Ok(Some(snapshot)) => {
			debug!(areas = snapshot.areas.as_ref().map_or(0, |a| a.len()), "persist.rehydrated");
			snapshot.merge_into(&initial)
		}
		Ok(None) => initial,
		Err(error) => {
			warn!(%error, "discarding unreadable persisted state");
			initial
		}
	}
}

/// Writes store snapshots whenever a persisted field changed.
pub struct Persistor {
	storage: Rc<dyn SessionStorage>,
	last: RefCell<Option<(Arc<Areas>, String)>>,
}

impl Persistor {
	pub fn new(storage: Rc<dyn SessionStorage>) -> Self {
		Self {
			storage,
			last: RefCell::new(None),
		}
	}

	/// Writes `state` unless its persisted fields are identical to the last write.
	pub fn write(&self, state: &State) {
		let unchanged = self.last.borrow().as_ref().is_some_and(|(areas, current)| {
			Arc::ptr_eq(areas, &state.areas) && *current == state.current_area_name
		});
		if unchanged {
			return;
		}
		match PersistedState::capture(state).to_json_string() {
			Ok(raw) => {
				self.storage.set(STORAGE_KEY, raw);
				*self.last.borrow_mut() =
					Some((Arc::clone(&state.areas), state.current_area_name.clone()));
			}
			Err(error) => warn!(%error, "failed to persist workspace state"),
		}
	}

	/// Removes the stored snapshot.
	pub fn purge(&self) {
		self.storage.remove(STORAGE_KEY);
		self.last.borrow_mut().take();
	}
}

impl std::fmt::Debug for Persistor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Persistor").finish_non_exhaustive()
	}
}
