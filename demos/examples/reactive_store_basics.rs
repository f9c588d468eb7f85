// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reactive store basics.
//!
//! Wraps a store in a table-like state type with domain setters and shows that
//! listeners only hear about the slice of state they selected.
//!
//! Run:
//! - `cargo run -p understory_demos --example reactive_store_basics`

use understory_reactive_store::ReactiveStore;

#[derive(Clone, Debug, Default, PartialEq)]
struct TableState {
    visible_columns: Vec<String>,
    sorting_column: Option<String>,
}

#[derive(Debug, Default)]
struct TableStore {
    store: ReactiveStore<TableState>,
}

impl TableStore {
    fn set_visible_columns(&mut self, columns: &[&str]) {
        let visible_columns = columns.iter().map(|c| (*c).to_owned()).collect();
        self.store.set(|prev| TableState {
            visible_columns,
            ..prev.clone()
        });
    }

    fn sort_by(&mut self, column: &str) {
        let sorting_column = Some(column.to_owned());
        self.store.set(|prev| TableState {
            sorting_column,
            ..prev.clone()
        });
    }
}

fn main() {
    let mut table = TableStore::default();

    table.store.subscribe(
        |s: &TableState| s.visible_columns.clone(),
        |next: &TableState, prev: &TableState| {
            println!("columns: {:?} -> {:?}", prev.visible_columns, next.visible_columns);
        },
    );
    let sorting = table.store.react(
        |s: &TableState| s.sorting_column.clone(),
        |next: &Option<String>, prev: &Option<String>| {
            println!("sorting: {prev:?} -> {next:?}");
        },
    );

    table.set_visible_columns(&["name", "type"]);
    table.sort_by("name");
    // Same value again: no notification.
    table.sort_by("name");

    table.store.unsubscribe(sorting);
    table.sort_by("type");
    println!("final state: {:?}", table.store.get());
    println!("subscriptions left: {}", table.store.len());
}
