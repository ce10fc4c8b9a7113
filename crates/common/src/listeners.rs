use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};


/// Handle returned by every `subscribe` call.
///
/// Dropping the handle leaves the listener registered; only
/// [`Subscription::unsubscribe`] detaches it.
#[must_use = "dropping a Subscription keeps the listener registered forever"]
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Wraps an unsubscribe callback.
	pub fn new(cancel: impl FnOnce() + 'static) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// A handle with nothing to detach.
	pub fn noop() -> Self {
		Self { cancel: None }
	}

	/// Detaches the listener. Calling this after the source is gone is a no-op.
	pub fn unsubscribe(mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}

struct Entry<F: ?Sized> {
	id: u64,
	listener: Rc<F>,
}

struct ListenerList<F: ?Sized> {
	next_id: u64,
	entries: Vec<Entry<F>>,
}

/// Ordered listener registry.
///
/// Notification always iterates a [`snapshot`](Self::snapshot), so listeners
/// added or removed while a notification is running only affect the next one.
pub struct Listeners<F: ?Sized> {
	inner: Rc<RefCell<ListenerList<F>>>,
}

impl<F: ?Sized + 'static> Listeners<F> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			inner: Rc::new(RefCell::new(ListenerList {
				next_id: 0,
				entries: Vec::new(),
			})),
		}
	}

	/// Registers a listener and returns the handle that removes it again.
	pub fn add(&self, listener: Rc<F>) -> Subscription {
		let id = {
			let mut list = self.inner.borrow_mut();
			let id = list.next_id;
			list.next_id += 1;
			list.entries.push(Entry { id, listener });
			id
		};

		let weak: Weak<RefCell<ListenerList<F>>> = Rc::downgrade(&self.inner);
		Subscription::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.borrow_mut().entries.retain(|entry| entry.id != id);
			}
		})
	}

	/// Copies the currently registered listeners in registration order.
	pub fn snapshot(&self) -> Vec<Rc<F>> {
		self.inner
			.borrow()
			.entries
			.iter()
			.map(|entry| Rc::clone(&entry.listener))
			.collect()
	}

	/// Number of registered listeners.
	pub fn len(&self) -> usize {
		self.inner.borrow().entries.len()
	}

	/// Returns true when no listener is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<F: ?Sized + 'static> Default for Listeners<F> {
	fn default() -> Self {
		Self::new()
	}
}

impl<F: ?Sized> fmt::Debug for Listeners<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Listeners")
			.field("len", &self.inner.borrow().entries.len())
			.finish()
	}
}
