//! Annotation storage adapter handed to the viewer's annotation plugin.
//!
//! Annotations of one page live as a single `AnnotationPage` JSON document in
//! [`SessionStorage`] under the page id. The adapter travels inside the
//! viewer config as a native value, so it is stripped from encoded sessions
//! and reinjected when a session is restored.

use std::fmt;
use std::rc::Rc;

use folio_state::SessionStorage;
use serde_json::{Value, json};
use tracing::warn;

#[cfg(test)]
mod tests;

/// Page id used by the workspace when none is configured.
pub const DEFAULT_PAGE_ID: &str = "workspace/annotations";

/// Annotation page persisted in session storage.
pub struct AnnotationStore {
	storage: Rc<dyn SessionStorage>,
	page_id: String,
}

impl AnnotationStore {
	pub fn new(storage: Rc<dyn SessionStorage>, page_id: impl Into<String>) -> Self {
		Self {
			storage,
			page_id: page_id.into(),
		}
	}

	pub fn page_id(&self) -> &str {
		&self.page_id
	}

	/// Appends `annotation`, creating an empty page first if none is stored.
	/// Returns the updated page.
	pub fn create(&self, annotation: Value) -> Value {
		let mut page = self.all().unwrap_or_else(|| self.empty_page());
		if let Some(items) = items_mut(&mut page) {
			items.push(annotation);
		}
		self.write(&page);
		page
	}

	/// Replaces the item whose id matches `annotation`'s.
	///
	/// An annotation with an unknown id is appended. Returns `None` when no
	/// page is stored.
	pub fn update(&self, annotation: Value) -> Option<Value> {
		let mut page = self.all()?;
		let items = items_mut(&mut page)?;
		match items.iter().position(|item| item["id"] == annotation["id"]) {
			Some(index) => items[index] = annotation,
			None => items.push(annotation),
		}
		self.write(&page);
		Some(page)
	}

	/// Drops every item with id `id`. Returns `None` when no page is stored.
	pub fn delete(&self, id: &str) -> Option<Value> {
		let mut page = self.all()?;
		if let Some(items) = items_mut(&mut page) {
			items.retain(|item| item["id"].as_str() != Some(id));
		}
		self.write(&page);
		Some(page)
	}

	pub fn get(&self, id: &str) -> Option<Value> {
		let page = self.all()?;
		page["items"]
			.as_array()?
			.iter()
			.find(|item| item["id"].as_str() == Some(id))
			.cloned()
	}

	/// The stored page, `None` if nothing or something unreadable is stored.
	pub fn all(&self) -> Option<Value> {
		let raw = self.storage.get(&self.page_id)?;
		match serde_json::from_str::<Value>(&raw) {
			Ok(page) if page.is_object() => Some(page),
			Ok(_) => None,
			Err(error) => {
				warn!(page = %self.page_id, %error, "discarding unreadable annotation page");
				None
			}
		}
	}

	/// Overwrites the stored page, or clears it for `None` and for values
	/// that are not annotation pages (e.g. the `{}` of a fresh area).
	pub fn replace_page(&self, page: Option<&Value>) {
		match page.filter(|page| page["items"].is_array()) {
			Some(page) => self.write(page),
			None => self.storage.remove(&self.page_id),
		}
	}

	fn empty_page(&self) -> Value {
		json!({
			"id": self.page_id,
			"items": [],
			"type": "AnnotationPage",
		})
	}

	fn write(&self, page: &Value) {
		self.storage.set(&self.page_id, page.to_string());
	}
}

impl fmt::Debug for AnnotationStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnnotationStore")
			.field("page_id", &self.page_id)
			.finish_non_exhaustive()
	}
}

/// Items array of a page, repairing a missing or malformed one.
fn items_mut(page: &mut Value) -> Option<&mut Vec<Value>> {
	let page = page.as_object_mut()?;
	let items = page
		.entry("items")
		.or_insert_with(|| Value::Array(Vec::new()));
	if !items.is_array() {
		*items = Value::Array(Vec::new());
	}
	items.as_array_mut()
}
