use std::cell::RefCell;
use std::collections::HashMap;

/// Session-scoped key/value storage.
///
/// Values survive a page reload but not the end of the browsing session.
/// Implementations use interior mutability so one storage can be shared by
/// the store persistor and the annotation adapter.
pub trait SessionStorage {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&self, key: &str, value: String);
	fn remove(&self, key: &str);
}

/// In-process [`SessionStorage`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
	entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

impl SessionStorage for MemoryStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.borrow().get(key).cloned()
	}

	fn set(&self, key: &str, value: String) {
		self.entries.borrow_mut().insert(key.to_string(), value);
	}

	fn remove(&self, key: &str) {
		self.entries.borrow_mut().remove(key);
	}
}
