//! Title Bar Component
//!
//! Navigation between admin screens, current user and sign-out.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_app_context, Page};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn TitleBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let user_name = move || {
        store
            .session()
            .with(|s| s.profile.as_ref().map(|p| p.display_name()))
            .unwrap_or_default()
    };
    let initials = move || {
        store
            .session()
            .with(|s| s.profile.as_ref().map(|p| p.initials()))
            .unwrap_or_default()
    };

    let logout = move |_| {
        spawn_local(async move {
            ctx.session().logout().await;
        });
    };

    view! {
        <header class="titlebar">
            <span class="titlebar-title">"Workload Admin"</span>
            <nav class="titlebar-nav">
                {Page::NAV.iter().map(|&page| {
                    view! {
                        <button
                            class=move || if ctx.page.get() == page { "nav-btn active" } else { "nav-btn" }
                            on:click=move |_| ctx.navigate(page)
                        >
                            {page.title()}
                        </button>
                    }
                }).collect_view()}
            </nav>
            <div class="titlebar-user">
                <span class="avatar">{initials}</span>
                <span class="user-name">{user_name}</span>
                <button class="titlebar-btn logout" title="Выйти" on:click=logout>
                    "Выйти"
                </button>
            </div>
        </header>
    }
}
