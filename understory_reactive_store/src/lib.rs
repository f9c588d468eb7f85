// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reactive_store --heading-base-level=0

//! Understory Reactive Store: a `no_std` pub/sub state container keyed by selectors.
//!
//! ## Overview
//!
//! A [`ReactiveStore`] owns one state value. Listeners subscribe with a
//! *selector* that projects the part of the state they care about. Every
//! [`set`](ReactiveStore::set) replaces the state and then notifies, in
//! subscription order, exactly the listeners whose selected value changed.
//! Listeners receive `(next, prev)`.
//!
//! ```
//! use understory_reactive_store::ReactiveStore;
//! use std::{cell::RefCell, rc::Rc};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct TableState {
//!     visible_columns: Vec<&'static str>,
//!     page: u32,
//! }
//!
//! let mut store = ReactiveStore::new(TableState { visible_columns: vec!["name"], page: 1 });
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = seen.clone();
//! store.subscribe(
//!     |s: &TableState| s.page,
//!     move |next: &TableState, prev: &TableState| log.borrow_mut().push((prev.page, next.page)),
//! );
//!
//! // Changing columns leaves the page untouched: no notification.
//! store.set(|s| TableState { visible_columns: vec!["name", "type"], ..s.clone() });
//! store.set(|s| TableState { page: 2, ..s.clone() });
//! assert_eq!(*seen.borrow(), [(1, 2)]);
//! ```
//!
//! Richer stores wrap a `ReactiveStore` and expose domain setters that call
//! [`set`](ReactiveStore::set). Read-only consumers can be handed a
//! [`ReadonlyReactiveStore`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Handle returned by [`ReactiveStore::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription<S> {
    id: SubscriptionId,
    notify: Box<dyn FnMut(&S, &S)>,
}

/// Read access to a store: the current state and change subscriptions.
pub trait ReadonlyReactiveStore<S> {
    /// The current state.
    fn get(&self) -> &S;

    /// Call `listener(next, prev)` after every update that changes `selector`'s output.
    fn subscribe<R, F, L>(&mut self, selector: F, listener: L) -> SubscriptionId
    where
        R: PartialEq,
        F: Fn(&S) -> R + 'static,
        L: FnMut(&S, &S) + 'static;

    /// Remove a subscription. Returns `false` if it was already gone.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// State container that notifies subscribers by selected value.
pub struct ReactiveStore<S> {
    state: S,
    subscriptions: Vec<Subscription<S>>,
    next_id: u64,
}

impl<S: core::fmt::Debug> core::fmt::Debug for ReactiveStore<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReactiveStore")
            .field("state", &self.state)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl<S: Default> Default for ReactiveStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> ReactiveStore<S> {
    /// Create a store holding `state`, with no subscriptions.
    pub fn new(state: S) -> Self {
        Self {
            state,
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    /// The current state.
    pub fn get(&self) -> &S {
        &self.state
    }

    /// Replace the state with `update(&current)` and notify affected listeners.
    pub fn set(&mut self, update: impl FnOnce(&S) -> S) {
        let next = update(&self.state);
        let prev = core::mem::replace(&mut self.state, next);
        for subscription in &mut self.subscriptions {
            (subscription.notify)(&self.state, &prev);
        }
    }

    /// Call `listener(next, prev)` after every update that changes `selector`'s output.
    pub fn subscribe<R, F, L>(&mut self, selector: F, mut listener: L) -> SubscriptionId
    where
        R: PartialEq,
        F: Fn(&S) -> R + 'static,
        L: FnMut(&S, &S) + 'static,
        S: 'static,
    {
        self.push(Box::new(move |next: &S, prev: &S| {
            if selector(prev) != selector(next) {
                listener(next, prev);
            }
        }))
    }

    /// Call `effect(next, prev)` with the selected values whenever they differ.
    ///
    /// A selector-level variant of [`subscribe`](Self::subscribe), for effects
    /// that only need the projection.
    pub fn react<R, F, E>(&mut self, selector: F, mut effect: E) -> SubscriptionId
    where
        R: PartialEq,
        F: Fn(&S) -> R + 'static,
        E: FnMut(&R, &R) + 'static,
        S: 'static,
    {
        self.push(Box::new(move |next: &S, prev: &S| {
            let (next, prev) = (selector(next), selector(prev));
            if prev != next {
                effect(&next, &prev);
            }
        }))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether there are no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    fn push(&mut self, notify: Box<dyn FnMut(&S, &S)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, notify });
        id
    }
}

impl<S: 'static> ReadonlyReactiveStore<S> for ReactiveStore<S> {
    fn get(&self) -> &S {
        Self::get(self)
    }

    fn subscribe<R, F, L>(&mut self, selector: F, listener: L) -> SubscriptionId
    where
        R: PartialEq,
        F: Fn(&S) -> R + 'static,
        L: FnMut(&S, &S) + 'static,
    {
        Self::subscribe(self, selector, listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        Self::unsubscribe(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::RefCell;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct State {
        name: String,
        count: u32,
    }

    type Log = Rc<RefCell<Vec<(u32, u32)>>>;

    fn count_log(store: &mut ReactiveStore<State>) -> (Log, SubscriptionId) {
        let log = Log::default();
        let sink = log.clone();
        let id = store.subscribe(
            |s: &State| s.count,
            move |next: &State, prev: &State| sink.borrow_mut().push((next.count, prev.count)),
        );
        (log, id)
    }

    #[test]
    fn set_replaces_state() {
        let mut store = ReactiveStore::new(State::default());
        store.set(|s| State {
            count: s.count + 1,
            ..s.clone()
        });
        assert_eq!(store.get().count, 1);
    }

    #[test]
    fn listeners_fire_only_on_selected_change() {
        let mut store = ReactiveStore::new(State::default());
        let (log, _) = count_log(&mut store);
        store.set(|s| State {
            name: "renamed".into(),
            ..s.clone()
        });
        assert!(log.borrow().is_empty());
        store.set(|s| State {
            count: 5,
            ..s.clone()
        });
        store.set(|s| s.clone());
        assert_eq!(*log.borrow(), [(5, 0)]);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let mut store = ReactiveStore::new(State::default());
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let order = order.clone();
            store.subscribe(|s: &State| s.count, move |_: &State, _: &State| {
                order.borrow_mut().push(tag);
            });
        }
        store.set(|s| State {
            count: 1,
            ..s.clone()
        });
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = ReactiveStore::new(State::default());
        let (log, id) = count_log(&mut store);
        let (other, _) = count_log(&mut store);
        assert_eq!(store.len(), 2);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        assert_eq!(store.len(), 1);
        store.set(|s| State {
            count: 2,
            ..s.clone()
        });
        assert!(log.borrow().is_empty());
        assert_eq!(*other.borrow(), [(2, 0)]);
    }

    #[test]
    fn react_receives_selected_values() {
        let mut store = ReactiveStore::new(State::default());
        let names = Rc::new(RefCell::new(Vec::new()));
        let sink = names.clone();
        store.react(
            |s: &State| s.name.clone(),
            move |next: &String, prev: &String| sink.borrow_mut().push((prev.clone(), next.clone())),
        );
        store.set(|s| State {
            name: "a".into(),
            ..s.clone()
        });
        store.set(|s| State {
            count: 9,
            ..s.clone()
        });
        assert_eq!(*names.borrow(), [(String::new(), String::from("a"))]);
    }

    #[test]
    fn readonly_view_subscribes() {
        fn watch(store: &mut impl ReadonlyReactiveStore<State>, log: Log) -> SubscriptionId {
            store.subscribe(
                |s: &State| s.count,
                move |next: &State, prev: &State| log.borrow_mut().push((next.count, prev.count)),
            )
        }
        let mut store = ReactiveStore::<State>::default();
        let log = Log::default();
        let id = watch(&mut store, log.clone());
        assert_eq!(ReadonlyReactiveStore::get(&store).count, 0);
        store.set(|s| State {
            count: 3,
            ..s.clone()
        });
        assert_eq!(*log.borrow(), [(3, 0)]);
        assert!(ReadonlyReactiveStore::unsubscribe(&mut store, id));
        assert!(store.is_empty());
    }
}
