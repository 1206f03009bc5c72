use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn get_returns_latest_value() {
    let cell = StateCell::new(1u32);
    assert_eq!(cell.get(), 1);
    cell.set(7);
    assert_eq!(cell.get(), 7);
}

#[test]
fn observers_run_on_every_write_in_registration_order() {
    let cell = StateCell::new(false);
    let seen: Rc<RefCell<Vec<(u8, bool)>>> = Rc::new(RefCell::new(Vec::new()));

    let s1 = seen.clone();
    cell.subscribe(move |v| s1.borrow_mut().push((1, *v)));
    let s2 = seen.clone();
    cell.subscribe(move |v| s2.borrow_mut().push((2, *v)));

    cell.set(true);
    // Same value again still notifies.
    cell.set(true);

    assert_eq!(
        *seen.borrow(),
        vec![(1, true), (2, true), (1, true), (2, true)]
    );
}

#[test]
fn observer_may_read_the_cell_it_observes() {
    let cell = Rc::new(StateCell::new(0i32));
    let seen = Rc::new(RefCell::new(Vec::new()));

    let weak = Rc::downgrade(&cell);
    let s = seen.clone();
    cell.subscribe(move |v| {
        let current = weak.upgrade().map(|c| c.get());
        s.borrow_mut().push((*v, current));
    });

    cell.set(3);
    assert_eq!(*seen.borrow(), vec![(3, Some(3))]);
}

#[test]
fn client_state_starts_idle_and_empty() {
    let state = ClientState::new();
    assert!(state.catalog.get().is_empty());
    assert!(!state.uploading.get());
    assert!(state.selection.get().is_none());
}
