//! Profile Panel Component
//!
//! Current user's details, name editing and password change.

use leptos::prelude::*;
use leptos::task::spawn_local;
use workload_core::models::{ChangePasswordRequest, UpdateProfileRequest};

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[component]
pub fn ProfilePanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let profile = move || store.session().with(|s| s.profile.clone());

    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (old_password, set_old_password) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (message, set_message) = signal::<Option<String>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    // Fetch a fresh profile and seed the form
    spawn_local(async move {
        match ctx.session().current_profile().await {
            Ok(p) => {
                set_first_name.set(p.first_name.unwrap_or_default());
                set_last_name.set(p.last_name.unwrap_or_default());
            }
            Err(err) => set_error.set(Some(err.to_string())),
        }
    });

    let save_profile = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let data = UpdateProfileRequest {
            first_name: optional(first_name.get()),
            last_name: optional(last_name.get()),
        };
        set_message.set(None);
        set_error.set(None);
        spawn_local(async move {
            match ctx.session().update_current_profile(&data).await {
                Ok(_) => set_message.set(Some("Профиль обновлен".to_string())),
                Err(err) => set_error.set(Some(err.to_string())),
            }
        });
    };

    let change_password = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let data = ChangePasswordRequest {
            old_password: old_password.get(),
            new_password: new_password.get(),
        };
        set_message.set(None);
        set_error.set(None);
        spawn_local(async move {
            match ctx.session().change_current_password(&data).await {
                Ok(()) => {
                    set_old_password.set(String::new());
                    set_new_password.set(String::new());
                    set_message.set(Some("Пароль изменен".to_string()));
                }
                Err(err) => set_error.set(Some(err.to_string())),
            }
        });
    };

    view! {
        <section class="profile-panel">
            <h2>"Профиль"</h2>
            {move || profile().map(|p| view! {
                <dl class="profile-facts">
                    <dt>"Логин"</dt><dd>{p.login.clone()}</dd>
                    <dt>"Роль"</dt><dd>{p.role.clone()}</dd>
                    <dt>"Последний вход"</dt>
                    <dd>{p.last_login_at.map(|t| t.format("%d.%m.%Y %H:%M").to_string()).unwrap_or_else(|| "—".to_string())}</dd>
                </dl>
            })}

            {move || message.get().map(|m| view! { <p class="form-success">{m}</p> })}
            {move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}

            <form class="profile-form" on:submit=save_profile>
                <label>
                    "Имя"
                    <input type="text" prop:value=move || first_name.get()
                        on:input=move |ev| set_first_name.set(event_target_value(&ev)) />
                </label>
                <label>
                    "Фамилия"
                    <input type="text" prop:value=move || last_name.get()
                        on:input=move |ev| set_last_name.set(event_target_value(&ev)) />
                </label>
                <button type="submit">"Сохранить"</button>
            </form>

            <form class="password-form" on:submit=change_password>
                <label>
                    "Текущий пароль"
                    <input type="password" autocomplete="current-password" prop:value=move || old_password.get()
                        on:input=move |ev| set_old_password.set(event_target_value(&ev)) />
                </label>
                <label>
                    "Новый пароль"
                    <input type="password" autocomplete="new-password" prop:value=move || new_password.get()
                        on:input=move |ev| set_new_password.set(event_target_value(&ev)) />
                </label>
                <button type="submit">"Сменить пароль"</button>
            </form>
        </section>
    }
}
