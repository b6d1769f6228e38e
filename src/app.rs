//! Workload Admin App
//!
//! Restores the session, guards pages behind authentication, and switches
//! between the admin screens.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{
    EmployeeRates, LoginForm, ProfilePanel, TitleBar, UserManagement, WorkloadByUsersView, WorkloadView,
};
use crate::context::{AppContext, Page, Services};
use crate::store::{bridge, AppState, AppStateStoreFields, AppStore};

#[component]
pub fn App() -> impl IntoView {
    let page = signal(Page::Login);
    let ctx = AppContext::new(Services::from_browser(), page);
    provide_context(ctx);

    let store: AppStore = AppStore::new(AppState::default());
    provide_context(store);
    bridge(store, ctx);

    // Restore the session once on mount
    spawn_local(async move {
        let signed_in = ctx.session().init().await;
        log::info!("Session restored: {}", signed_in);
        if signed_in {
            ctx.navigate(Page::Workload);
        }
        *store.ready().write() = true;
    });

    // Auth guard: anonymous users only see the login page,
    // signed-in users never do
    Effect::new(move |_| {
        if !store.ready().get() {
            return;
        }
        let authenticated = store.session().with(|s| s.is_authenticated());
        match (authenticated, ctx.page.get()) {
            (false, page) if page != Page::Login => ctx.navigate(Page::Login),
            (true, Page::Login) => ctx.navigate(Page::Workload),
            _ => {}
        }
    });

    view! {
        <div class="app-layout">
            <Show
                when=move || store.ready().get()
                fallback=|| view! { <div class="loading-screen">"Загрузка..."</div> }
            >
                <Show when=move || ctx.page.get() != Page::Login>
                    <TitleBar />
                </Show>
                <main class="main-content">
                    {move || match ctx.page.get() {
                        Page::Login => view! { <LoginForm /> }.into_any(),
                        Page::Workload => view! { <WorkloadView /> }.into_any(),
                        Page::WorkloadByUsers => view! { <WorkloadByUsersView /> }.into_any(),
                        Page::Employees => view! { <EmployeeRates /> }.into_any(),
                        Page::Users => view! { <UserManagement /> }.into_any(),
                        Page::Profile => view! { <ProfilePanel /> }.into_any(),
                    }}
                </main>
            </Show>
        </div>
    }
}
