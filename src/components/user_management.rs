//! User Management Component
//!
//! Account list with activation, password reset and deletion.

use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;
use workload_core::models::Profile;

use crate::components::RegistrationForm;
use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn UserManagement() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    // Temporary password from the last reset, shown once
    let (issued_password, set_issued_password) = signal::<Option<(String, String)>>(None);

    let reload = move || {
        spawn_local(async move {
            let users = ctx.users();
            users.load_users().await;
            users.load_pending_users().await;
        });
    };
    reload();

    let users = move || store.users().with(|s| s.users.clone());
    let pending = move || store.users().with(|s| s.pending.clone());
    let stats = move || store.users().with(|s| s.stats());

    view! {
        <section class="user-management">
            <h2>"Пользователи"</h2>
            <p class="stats">
                {move || {
                    let s = stats();
                    format!("Всего: {} · Активных: {} · Неактивных: {}", s.total, s.active, s.inactive)
                }}
            </p>

            {move || store.users().with(|s| s.error.clone()).map(|e| view! {
                <p class="form-error" on:click=move |_| ctx.users().clear_error()>{e}</p>
            })}

            {move || issued_password.get().map(|(login, password)| view! {
                <div class="issued-password">
                    "Временный пароль для " {login} ": " <code>{password}</code>
                    <button class="cancel-btn" on:click=move |_| set_issued_password.set(None)>"✗"</button>
                </div>
            })}

            <RegistrationForm on_registered=move |_| reload() />

            <Show when=move || !pending().is_empty()>
                <h3>"Ожидают активации"</h3>
                <ul class="pending-list">
                    <For
                        each=pending
                        key=|u| u.id
                        children=move |user: Profile| {
                            let id = user.id;
                            view! {
                                <li>
                                    <span>{user.display_name()} " (" {user.login.clone()} ")"</span>
                                    <button on:click=move |_| {
                                        spawn_local(async move {
                                            // absent from the main list until reloaded
                                            let users = ctx.users();
                                            if users.state().users.iter().all(|u| u.id != id) {
                                                users.load_users().await;
                                            }
                                            users.toggle_user_status(id).await;
                                        });
                                    }>"Активировать"</button>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>

            <table class="users-table">
                <thead>
                    <tr>
                        <th></th>
                        <th>"Имя"</th>
                        <th>"Логин"</th>
                        <th>"Роль"</th>
                        <th>"Статус"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=users
                        key=|u| (u.id, u.is_active, u.updated_at)
                        children=move |user: Profile| {
                            view! { <UserRow user=user set_issued_password=set_issued_password /> }
                        }
                    />
                </tbody>
            </table>
        </section>
    }
}

#[component]
fn UserRow(user: Profile, set_issued_password: WriteSignal<Option<(String, String)>>) -> impl IntoView {
    let ctx = use_app_context();
    let id: Uuid = user.id;
    let login = user.login.clone();
    let is_active = user.is_active;
    let row_class = if is_active { "user-row" } else { "user-row inactive" };

    let toggle = move |_| {
        spawn_local(async move {
            ctx.users().toggle_user_status(id).await;
        });
    };
    let reset = move |_| {
        let login = login.clone();
        spawn_local(async move {
            if let Some(password) = ctx.users().reset_password(id).await {
                set_issued_password.set(Some((login, password)));
            }
        });
    };
    view! {
        <tr class=row_class>
            <td><span class="avatar">{user.initials()}</span></td>
            <td>{user.display_name()}</td>
            <td>{user.login.clone()}</td>
            <td>{user.role.clone()}</td>
            <td>
                <button class="status-btn" on:click=toggle>
                    {if is_active { "Активен" } else { "Неактивен" }}
                </button>
            </td>
            <td class="row-actions">
                <button on:click=reset>"Сбросить пароль"</button>
                <DeleteUserButton user_id=id name=user.display_name() />
            </td>
        </tr>
    }
}

fn delete_prompt(name: &str) -> String {
    format!("Удалить пользователя {}?", name)
}

/// × that asks for confirmation, then deletes; locked while the request runs
#[component]
fn DeleteUserButton(user_id: Uuid, name: String) -> impl IntoView {
    let ctx = use_app_context();
    let (confirming, set_confirming) = signal(false);
    let (deleting, set_deleting) = signal(false);
    let prompt = delete_prompt(&name);

    let confirm = move |_| {
        set_deleting.set(true);
        spawn_local(async move {
            // on success the row leaves the list; on failure the store records the error
            if !ctx.users().delete_user(user_id).await {
                set_deleting.set(false);
                set_confirming.set(false);
            }
        });
    };

    view! {
        <Show
            when=move || confirming.get()
            fallback=move || view! {
                <button class="delete-btn" title="Удалить" on:click=move |_| set_confirming.set(true)>"×"</button>
            }
        >
            <span class="delete-confirm">
                <span class="delete-confirm-text">{prompt.clone()}</span>
                <button class="confirm-btn" disabled=move || deleting.get() on:click=confirm>
                    {move || if deleting.get() { "…" } else { "✓" }}
                </button>
                <button
                    class="cancel-btn"
                    disabled=move || deleting.get()
                    on:click=move |_| set_confirming.set(false)
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
