//! Observable State Stores
//!
//! Each store owns its state behind a [`StoreCell`]: actions mutate the
//! state, then every subscriber receives the new snapshot. The UI subscribes
//! once and mirrors snapshots into its reactive store.

mod employees;
mod session;
mod users;
mod workload;

pub use employees::{EmployeeError, EmployeeRow, EmployeeState, EmployeeStats, EmployeeStore, SaveOutcome};
pub use session::{SessionError, SessionState, SessionStore};
pub use users::{UserManagementStore, UserState, UserStats};
pub use workload::{
    WorkloadByUsersState, WorkloadByUsersStore, WorkloadState, WorkloadStore, WorkloadTableState,
};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

type Callback<T> = Rc<dyn Fn(&T)>;

pub struct Observers<T> {
    next_id: Cell<usize>,
    callbacks: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            callbacks: RefCell::new(Vec::new()),
        }
    }
}

impl<T> Observers<T> {
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.callbacks.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.callbacks.borrow_mut().retain(|(sub, _)| *sub != id);
    }

    pub fn notify(&self, value: &T) {
        // callbacks may subscribe or unsubscribe while running
        let callbacks: Vec<Callback<T>> = self.callbacks.borrow().iter().map(|(_, cb)| cb.clone()).collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

/// Shared state plus its observers
pub struct StoreCell<S> {
    state: Rc<RefCell<S>>,
    observers: Rc<Observers<S>>,
}

impl<S> Clone for StoreCell<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<S: Clone> StoreCell<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            observers: Rc::new(Observers::default()),
        }
    }

    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Mutate, then notify with the new snapshot
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.state.borrow_mut();
            let result = f(&mut state);
            (result, state.clone())
        };
        self.observers.notify(&snapshot);
        result
    }

    pub fn subscribe(&self, callback: impl Fn(&S) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers.unsubscribe(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_notifies_with_new_state() {
        let cell = StoreCell::new(0u32);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = cell.subscribe(move |v| sink.borrow_mut().push(*v));

        cell.update(|v| *v += 1);
        cell.update(|v| *v += 2);
        cell.unsubscribe(id);
        cell.update(|v| *v += 4);

        assert_eq!(*seen.borrow(), vec![1, 3]);
        assert_eq!(cell.snapshot(), 7);
    }

    #[test]
    fn test_callback_may_read_store() {
        let cell = StoreCell::new(String::new());
        let reader = cell.clone();
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = seen.clone();
        cell.subscribe(move |_| *sink.borrow_mut() = reader.snapshot());

        cell.update(|s| s.push_str("ok"));

        assert_eq!(*seen.borrow(), "ok");
    }
}
