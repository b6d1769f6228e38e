//! Login Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;
use workload_core::models::LoginRequest;

use crate::context::use_app_context;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();

    let (login, set_login) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let data = LoginRequest {
            login: login.get().trim().to_string(),
            password: password.get(),
        };
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            // the auth guard navigates once the session changes
            if let Err(err) = ctx.session().login(&data).await {
                set_error.set(Some(err.to_string()));
            }
            set_busy.set(false);
        });
    };

    view! {
        <form class="login-form" on:submit=submit>
            <h1>"Вход в систему"</h1>
            <label>
                "Логин"
                <input
                    type="text"
                    autocomplete="username"
                    prop:value=move || login.get()
                    on:input=move |ev| set_login.set(event_target_value(&ev))
                />
            </label>
            <label>
                "Пароль"
                <input
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </label>
            {move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
            <button type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Вход..." } else { "Войти" }}
            </button>
        </form>
    }
}
