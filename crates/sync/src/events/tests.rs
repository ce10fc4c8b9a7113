use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case(EventKind::StateChanged)]
#[case(EventKind::ResourceAddedToMirador)]
#[case(EventKind::ResourceRemovedFromMirador)]
#[case(EventKind::MiradorResourceUpdated)]
#[case(EventKind::OpenResourceInSearchClicked)]
#[case(EventKind::OpenAuthorityIdInSearchClicked)]
#[case(EventKind::MiradorWindowSizeChanged)]
#[case(EventKind::LinkClicked)]
fn event_names_parse_back(#[case] kind: EventKind) {
	assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
}

#[test]
fn unknown_event_name_is_rejected() {
	assert_eq!(
		"nope".parse::<EventKind>(),
		Err(UnknownEvent("nope".to_string()))
	);
}

#[test]
fn listeners_only_see_their_kind() {
	let target = EventTarget::new();
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	let _sub = target.add_event_listener(EventKind::LinkClicked, move |event| {
		sink.borrow_mut().push(event.detail().clone());
	});

	target.fire(
		EventKind::LinkClicked,
		EventDetail::Json(json!({"href": "http://example.com/foo"})),
		false,
	);
	target.fire(EventKind::MiradorWindowSizeChanged, EventDetail::None, false);

	assert_eq!(
		*seen.borrow(),
		[EventDetail::Json(json!({"href": "http://example.com/foo"}))]
	);
}

#[test]
fn removed_listener_is_not_called() {
	let target = EventTarget::new();
	let counts = Rc::new(RefCell::new((0, 0)));

	let first = Rc::clone(&counts);
	let remove_first = target.add_event_listener(EventKind::LinkClicked, move |_| first.borrow_mut().0 += 1);
	let second = Rc::clone(&counts);
	let remove_second = target.add_event_listener(EventKind::LinkClicked, move |_| second.borrow_mut().1 += 1);

	target.fire(EventKind::LinkClicked, EventDetail::None, false);
	remove_first.unsubscribe();
	target.fire(EventKind::LinkClicked, EventDetail::None, false);
	remove_second.unsubscribe();
	target.fire(EventKind::LinkClicked, EventDetail::None, false);

	assert_eq!(*counts.borrow(), (1, 2));
	assert_eq!(target.listener_count(EventKind::LinkClicked), 0);
}

#[test]
fn prevent_default_cancels_only_cancelable_events() {
	let target = EventTarget::new();
	let _sub = target.add_event_listener(EventKind::ResourceAddedToMirador, |event| {
		event.prevent_default();
	});

	assert!(!target.fire(EventKind::ResourceAddedToMirador, EventDetail::None, true));
	assert!(target.fire(EventKind::ResourceAddedToMirador, EventDetail::None, false));
	assert!(target.fire(EventKind::ResourceRemovedFromMirador, EventDetail::None, true));
}

#[test]
fn every_listener_runs_even_after_prevention() {
	let target = EventTarget::new();
	let calls = Rc::new(RefCell::new(0));
	let _a = target.add_event_listener(EventKind::MiradorResourceUpdated, |event| event.prevent_default());
	let counter = Rc::clone(&calls);
	let _b = target.add_event_listener(EventKind::MiradorResourceUpdated, move |event| {
		assert!(event.default_prevented());
		*counter.borrow_mut() += 1;
	});

	assert!(!target.fire(EventKind::MiradorResourceUpdated, EventDetail::None, true));
	assert_eq!(*calls.borrow(), 1);
}
