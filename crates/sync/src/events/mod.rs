//! Named, optionally cancellable events.
//!
//! Dispatch is synchronous: every listener registered for the event's kind
//! runs before [`EventTarget::dispatch`] returns, so a listener calling
//! [`Event::prevent_default`] vetoes the pending default action in the same
//! turn.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use folio_common::{Listeners, Subscription};
use folio_state::{Resource, State};
use serde_json::Value;
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Every event the workspace emits or relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// The resource store changed. Not cancelable.
	StateChanged,
	/// The viewer opened a window not yet tracked as a resource.
	ResourceAddedToMirador,
	/// The viewer closed a window of a tracked resource.
	ResourceRemovedFromMirador,
	/// The viewer changed the record carried by a window.
	MiradorResourceUpdated,
	OpenResourceInSearchClicked,
	OpenAuthorityIdInSearchClicked,
	MiradorWindowSizeChanged,
	LinkClicked,
}

impl EventKind {
	/// Event name as seen by the host page.
	pub fn as_str(self) -> &'static str {
		match self {
			EventKind::StateChanged => "stateChanged",
			EventKind::ResourceAddedToMirador => "resourceAddedToMirador",
			EventKind::ResourceRemovedFromMirador => "resourceRemovedFromMirador",
			EventKind::MiradorResourceUpdated => "miradorResourceUpdated",
			EventKind::OpenResourceInSearchClicked => "openResourceInSearchClicked",
			EventKind::OpenAuthorityIdInSearchClicked => "openAuthorityIdInSearchClicked",
			EventKind::MiradorWindowSizeChanged => "miradorWindowSizeChanged",
			EventKind::LinkClicked => "linkClicked",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error for an event name no [`EventKind`] carries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event {0:?}")]
pub struct UnknownEvent(pub String);

impl FromStr for EventKind {
	type Err = UnknownEvent;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"stateChanged" => EventKind::StateChanged,
			"resourceAddedToMirador" => EventKind::ResourceAddedToMirador,
			"resourceRemovedFromMirador" => EventKind::ResourceRemovedFromMirador,
			"miradorResourceUpdated" => EventKind::MiradorResourceUpdated,
			"openResourceInSearchClicked" => EventKind::OpenResourceInSearchClicked,
			"openAuthorityIdInSearchClicked" => EventKind::OpenAuthorityIdInSearchClicked,
			"miradorWindowSizeChanged" => EventKind::MiradorWindowSizeChanged,
			"linkClicked" => EventKind::LinkClicked,
			other => return Err(UnknownEvent(other.to_string())),
		})
	}
}

/// Payload of an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
	None,
	State(Arc<State>),
	Resource(Resource),
	/// Free-form payload, e.g. `{ "href": ... }` for [`EventKind::LinkClicked`].
	Json(Value),
}

/// One dispatched event.
#[derive(Debug)]
pub struct Event {
	kind: EventKind,
	detail: EventDetail,
	cancelable: bool,
	default_prevented: Cell<bool>,
}

impl Event {
	pub fn new(kind: EventKind, detail: EventDetail, cancelable: bool) -> Self {
		Self {
			kind,
			detail,
			cancelable,
			default_prevented: Cell::new(false),
		}
	}

	pub fn kind(&self) -> EventKind {
		self.kind
	}

	pub fn detail(&self) -> &EventDetail {
		&self.detail
	}

	/// The resource carried by the event, if any.
	pub fn resource(&self) -> Option<&Resource> {
		match &self.detail {
			EventDetail::Resource(resource) => Some(resource),
			_ => None,
		}
	}

	pub fn cancelable(&self) -> bool {
		self.cancelable
	}

	/// Vetoes the default action. Ignored for non-cancelable events.
	pub fn prevent_default(&self) {
		if self.cancelable {
			self.default_prevented.set(true);
		}
	}

	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}
}

type EventListener = dyn Fn(&Event);

/// Registry of event listeners keyed by [`EventKind`].
#[derive(Default)]
pub struct EventTarget {
	listeners: RefCell<HashMap<EventKind, Listeners<EventListener>>>,
}

impl EventTarget {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener for one event kind.
	pub fn add_event_listener(
		&self,
		kind: EventKind,
		listener: impl Fn(&Event) + 'static,
	) -> Subscription {
		self.listeners
			.borrow_mut()
			.entry(kind)
			.or_default()
			.add(Rc::new(listener))
	}

	/// Delivers `event` to every listener of its kind.
	///
	/// Returns `false` iff the event is cancelable and a listener prevented it.
	pub fn dispatch(&self, event: &Event) -> bool {
		let listeners = self
			.listeners
			.borrow()
			.get(&event.kind)
			.map(Listeners::snapshot)
			.unwrap_or_default();
		for listener in listeners {
			listener(event);
		}
		!event.default_prevented()
	}

	/// Builds and dispatches an event in one step.
	pub fn fire(&self, kind: EventKind, detail: EventDetail, cancelable: bool) -> bool {
		self.dispatch(&Event::new(kind, detail, cancelable))
	}

	/// Number of listeners registered for `kind`.
	pub fn listener_count(&self, kind: EventKind) -> usize {
		self.listeners
			.borrow()
			.get(&kind)
			.map_or(0, Listeners::len)
	}
}

impl fmt::Debug for EventTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventTarget")
			.field("kinds", &self.listeners.borrow().len())
			.finish()
	}
}
