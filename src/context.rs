//! Application Context
//!
//! Core services and navigation shared via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;
use workload_core::stores::{
    EmployeeStore, SessionStore, UserManagementStore, WorkloadByUsersStore, WorkloadStore,
};
use workload_core::{ApiClient, AppConfig, HttpTransport};

use crate::storage::browser_storage;

/// Top-level screens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    Workload,
    WorkloadByUsers,
    Employees,
    Users,
    Profile,
}

impl Page {
    pub const NAV: [Page; 5] = [
        Page::Workload,
        Page::WorkloadByUsers,
        Page::Employees,
        Page::Users,
        Page::Profile,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Login => "Вход",
            Page::Workload => "Нагрузка",
            Page::WorkloadByUsers => "По сотрудникам",
            Page::Employees => "Ставки",
            Page::Users => "Пользователи",
            Page::Profile => "Профиль",
        }
    }
}

/// Stores wired to one API client; not Send, so kept in local storage
pub struct Services {
    pub config: AppConfig,
    pub session: SessionStore,
    pub employees: EmployeeStore,
    pub users: UserManagementStore,
    pub workload: WorkloadStore,
    pub by_users: WorkloadByUsersStore,
}

impl Services {
    pub fn from_browser() -> Self {
        let config = AppConfig::from_build_env();
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        let base_url = config.resolve_base_url(&origin);
        log::info!("API base URL: {}", base_url);

        let storage = browser_storage();
        let api = ApiClient::new(Rc::new(HttpTransport::new(&base_url)), storage.clone());
        let session = SessionStore::new(api.clone(), storage.clone());
        Self {
            employees: EmployeeStore::new(api.clone()),
            users: UserManagementStore::new(api.clone(), session.clone()),
            workload: WorkloadStore::new(api.clone(), storage, &config.default_queue),
            by_users: WorkloadByUsersStore::new(api),
            session,
            config,
        }
    }
}

#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<Services, LocalStorage>,
    /// Current screen - read
    pub page: ReadSignal<Page>,
    /// Current screen - write
    set_page: WriteSignal<Page>,
}

impl AppContext {
    pub fn new(services: Services, page: (ReadSignal<Page>, WriteSignal<Page>)) -> Self {
        Self {
            services: StoredValue::new_local(services),
            page: page.0,
            set_page: page.1,
        }
    }

    pub fn navigate(&self, page: Page) {
        self.set_page.set(page);
    }

    pub fn config(&self) -> AppConfig {
        self.services.with_value(|s| s.config.clone())
    }

    pub fn session(&self) -> SessionStore {
        self.services.with_value(|s| s.session.clone())
    }

    pub fn employees(&self) -> EmployeeStore {
        self.services.with_value(|s| s.employees.clone())
    }

    pub fn users(&self) -> UserManagementStore {
        self.services.with_value(|s| s.users.clone())
    }

    pub fn workload(&self) -> WorkloadStore {
        self.services.with_value(|s| s.workload.clone())
    }

    pub fn by_users(&self) -> WorkloadByUsersStore {
        self.services.with_value(|s| s.by_users.clone())
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
