//! Subscribable resource store.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use folio_common::{Listeners, Subscription};
use tracing::trace;

use crate::command::Command;
use crate::model::State;
use crate::reducer::reduce;

#[cfg(test)]
mod tests;

type StoreListener = dyn Fn(&Arc<State>);

/// Single source of truth for areas and resources.
///
/// Subscribers see whole snapshots only. A command dispatched from inside a
/// subscriber is reduced right away, but its notification waits until the
/// running round has reached every subscriber; subscribers never run nested.
pub struct Store {
	state: RefCell<Arc<State>>,
	listeners: Listeners<StoreListener>,
	notifying: Cell<bool>,
	dirty: Cell<bool>,
}

impl Store {
	/// Creates a store holding `initial`.
	pub fn new(initial: State) -> Self {
		Self {
			state: RefCell::new(Arc::new(initial)),
			listeners: Listeners::new(),
			notifying: Cell::new(false),
			dirty: Cell::new(false),
		}
	}

	/// Current state snapshot.
	pub fn state(&self) -> Arc<State> {
		Arc::clone(&self.state.borrow())
	}

	/// Applies one command.
	pub fn dispatch(&self, command: Command) {
		self.dispatch_batch([command]);
	}

	/// Applies commands in order and notifies subscribers once.
	///
	/// Nothing is sent when the batch leaves the state untouched.
	pub fn dispatch_batch(&self, commands: impl IntoIterator<Item = Command>) {
		let changed = {
			let mut state = self.state.borrow_mut();
			let before = Arc::clone(&state);
			for command in commands {
				trace!(command = command.name(), "store.dispatch");
				*state = reduce(&state, command);
			}
			!Arc::ptr_eq(&before, &state)
		};
		if changed {
			self.notify();
		}
	}

	/// Registers a listener called with every new state.
	pub fn subscribe(&self, listener: impl Fn(&Arc<State>) + 'static) -> Subscription {
		self.listeners.add(Rc::new(listener))
	}

	fn notify(&self) {
		if self.notifying.get() {
			self.dirty.set(true);
			return;
		}
		self.notifying.set(true);
		loop {
			self.dirty.set(false);
			let snapshot = self.state();
			for listener in self.listeners.snapshot() {
				listener(&snapshot);
			}
			if !self.dirty.get() {
				break;
			}
		}
		self.notifying.set(false);
	}
}

impl Default for Store {
	fn default() -> Self {
		Self::new(State::default())
	}
}

impl std::fmt::Debug for Store {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Store")
			.field("current_area", &self.state.borrow().current_area_name)
			.field("listeners", &self.listeners)
			.finish()
	}
}
