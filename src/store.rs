//! Global Application State Store
//!
//! Mirrors core store snapshots into a reactive_stores store so components
//! get field-level reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use workload_core::stores::{EmployeeState, SessionState, UserState, WorkloadByUsersState, WorkloadState};

use crate::context::AppContext;

#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub session: SessionState,
    pub employees: EmployeeState,
    pub users: UserState,
    pub workload: WorkloadState,
    pub by_users: WorkloadByUsersState,
    /// Session restore finished (auth guard waits for it)
    pub ready: bool,
}

pub type AppStore = Store<AppState>;

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// Seed the store from current snapshots and follow every change
pub fn bridge(store: AppStore, ctx: AppContext) {
    let session = ctx.session();
    *store.session().write() = session.state();
    session.subscribe(move |s| *store.session().write() = s.clone());

    let employees = ctx.employees();
    *store.employees().write() = employees.state();
    employees.subscribe(move |s| *store.employees().write() = s.clone());

    let users = ctx.users();
    *store.users().write() = users.state();
    users.subscribe(move |s| *store.users().write() = s.clone());

    let workload = ctx.workload();
    *store.workload().write() = workload.state();
    workload.subscribe(move |s| *store.workload().write() = s.clone());

    let by_users = ctx.by_users();
    *store.by_users().write() = by_users.state();
    by_users.subscribe(move |s| *store.by_users().write() = s.clone());
}
