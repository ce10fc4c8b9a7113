use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::model::{Resource, ResourceKind};

fn resource(id: &str) -> Resource {
	Resource::new(ResourceKind::IiifManifest, id)
}

fn resource_count(state: &State) -> usize {
	crate::selectors::resources(state, None).len()
}

#[test]
fn batch_notifies_once_with_final_state() {
	let store = Store::default();
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	let _sub = store.subscribe(move |state| sink.borrow_mut().push(resource_count(state)));

	store.dispatch_batch([
		Command::add_resource(resource("a")),
		Command::add_resource(resource("b")),
		Command::add_resource(resource("c")),
	]);

	assert_eq!(*seen.borrow(), [3]);
}

#[test]
fn no_op_dispatch_does_not_notify() {
	let store = Store::default();
	let calls = Rc::new(RefCell::new(0));
	let counter = Rc::clone(&calls);
	let _sub = store.subscribe(move |_| *counter.borrow_mut() += 1);

	store.dispatch(Command::AddResource {
		resource: resource("a"),
		area: Some("missing".into()),
	});

	assert_eq!(*calls.borrow(), 0);
}

#[test]
fn unsubscribe_stops_notifications() {
	let store = Store::default();
	let calls = Rc::new(RefCell::new(0));
	let counter = Rc::clone(&calls);
	let sub = store.subscribe(move |_| *counter.borrow_mut() += 1);

	store.dispatch(Command::add_resource(resource("a")));
	sub.unsubscribe();
	store.dispatch(Command::add_resource(resource("b")));

	assert_eq!(*calls.borrow(), 1);
}

#[test]
fn dispatch_from_subscriber_is_coalesced_into_next_round() {
	let store = Rc::new(Store::default());
	let log = Rc::new(RefCell::new(Vec::new()));

	let weak = Rc::downgrade(&store);
	let first_log = Rc::clone(&log);
	let _first = store.subscribe(move |state| {
		let count = resource_count(state);
		first_log.borrow_mut().push(("first", count));
		if count == 1 {
			if let Some(store) = weak.upgrade() {
				store.dispatch(Command::add_resource(resource("b")));
			}
		}
	});
	let second_log = Rc::clone(&log);
	let _second = store.subscribe(move |state| {
		second_log.borrow_mut().push(("second", resource_count(state)));
	});

	store.dispatch(Command::add_resource(resource("a")));

	assert_eq!(
		*log.borrow(),
		[("first", 1), ("second", 1), ("first", 2), ("second", 2)]
	);
	assert_eq!(resource_count(&store.state()), 2);
}
