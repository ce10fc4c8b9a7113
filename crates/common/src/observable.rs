//! Minimal publish-subscribe value holder.
//!
//! Decouples the moment a value becomes available from the moment consumers
//! register interest: consumers read the current value with
//! [`Observable::get`] and react to later replacements via
//! [`Observable::subscribe`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::listeners::{Listeners, Subscription};

#[cfg(test)]
mod tests;

/// A value holder that synchronously notifies subscribers on every `set`.
pub struct Observable<T> {
	value: RefCell<T>,
	listeners: Listeners<dyn Fn(&T)>,
}

impl<T: Clone + 'static> Observable<T> {
	/// Creates a holder with an initial value. No notification is sent.
	pub fn new(init: T) -> Self {
		Self {
			value: RefCell::new(init),
			listeners: Listeners::new(),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T {
		self.value.borrow().clone()
	}

	/// Replaces the value, then notifies a snapshot of the current subscribers.
	///
	/// Subscribers may call `get`, `set` or `subscribe` from inside the
	/// callback; the in-flight pass is not affected by registry changes.
	pub fn set(&self, value: T) {
		*self.value.borrow_mut() = value;
		let current = self.get();
		for listener in self.listeners.snapshot() {
			listener(&current);
		}
	}

	/// Registers a listener for future replacements.
	pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
		self.listeners.add(Rc::new(listener))
	}

	/// Number of registered subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.listeners.len()
	}
}

impl<T: Clone + Default + 'static> Default for Observable<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observable")
			.field("value", &*self.value.borrow())
			.field("listeners", &self.listeners)
			.finish()
	}
}
