use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn get_returns_initial_value() {
	let observable = Observable::new(3);
	assert_eq!(observable.get(), 3);
}

#[test]
fn set_replaces_value_then_notifies() {
	let observable = Rc::new(Observable::new(String::from("a")));
	let seen = Rc::new(RefCell::new(Vec::new()));

	let o = observable.clone();
	let s = seen.clone();
	let _sub = observable.subscribe(move |value: &String| {
		s.borrow_mut().push((value.clone(), o.get()));
	});

	observable.set("b".into());
	assert_eq!(*seen.borrow(), vec![("b".to_string(), "b".to_string())]);
}

#[test]
fn unsubscribed_listener_is_not_notified() {
	let observable = Observable::new(0);
	let hits = Rc::new(RefCell::new(0));

	let h = hits.clone();
	let sub = observable.subscribe(move |_| *h.borrow_mut() += 1);
	observable.set(1);
	sub.unsubscribe();
	observable.set(2);

	assert_eq!(*hits.borrow(), 1);
	assert_eq!(observable.subscriber_count(), 0);
}

#[test]
fn subscriber_added_during_notification_waits_for_next_set() {
	let observable = Rc::new(Observable::new(0));
	let late_hits = Rc::new(RefCell::new(Vec::new()));
	let late_sub = Rc::new(RefCell::new(None));

	let o = observable.clone();
	let hits = late_hits.clone();
	let slot = late_sub.clone();
	let _sub = observable.subscribe(move |_| {
		if slot.borrow().is_none() {
			let h = hits.clone();
			*slot.borrow_mut() = Some(o.subscribe(move |v: &i32| h.borrow_mut().push(*v)));
		}
	});

	observable.set(1);
	assert!(late_hits.borrow().is_empty());

	observable.set(2);
	assert_eq!(*late_hits.borrow(), vec![2]);
}

#[test]
fn subscriber_removed_during_notification_still_runs_in_flight_pass() {
	let observable = Rc::new(Observable::new(0));
	let second_hits = Rc::new(RefCell::new(0));
	let second_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

	let slot = second_sub.clone();
	let _first = observable.subscribe(move |_| {
		if let Some(sub) = slot.borrow_mut().take() {
			sub.unsubscribe();
		}
	});
	let h = second_hits.clone();
	*second_sub.borrow_mut() = Some(observable.subscribe(move |_| *h.borrow_mut() += 1));

	observable.set(1);
	assert_eq!(*second_hits.borrow(), 1);

	observable.set(2);
	assert_eq!(*second_hits.borrow(), 1);
}
