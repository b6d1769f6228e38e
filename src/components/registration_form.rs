//! Registration Form Component
//!
//! Lets a signed-in admin register a new account.

use leptos::prelude::*;
use leptos::task::spawn_local;
use workload_core::models::RegistrationRequest;

use crate::context::use_app_context;

#[component]
pub fn RegistrationForm(#[prop(into)] on_registered: Callback<()>) -> impl IntoView {
    let ctx = use_app_context();

    let (login, set_login) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let non_empty = |s: String| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        let data = RegistrationRequest {
            login: login.get().trim().to_string(),
            password: password.get(),
            first_name: non_empty(first_name.get()),
            last_name: non_empty(last_name.get()),
        };
        set_error.set(None);
        spawn_local(async move {
            match ctx.session().register(&data).await {
                Ok(profile) => {
                    log::info!("Registered {}", profile.login);
                    set_login.set(String::new());
                    set_password.set(String::new());
                    set_first_name.set(String::new());
                    set_last_name.set(String::new());
                    on_registered.run(());
                }
                Err(err) => set_error.set(Some(err.to_string())),
            }
        });
    };

    view! {
        <form class="registration-form" on:submit=submit>
            <h3>"Новый пользователь"</h3>
            <div class="form-row">
                <input type="text" placeholder="Логин" prop:value=move || login.get()
                    on:input=move |ev| set_login.set(event_target_value(&ev)) />
                <input type="password" placeholder="Пароль" autocomplete="new-password" prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev)) />
                <input type="text" placeholder="Имя" prop:value=move || first_name.get()
                    on:input=move |ev| set_first_name.set(event_target_value(&ev)) />
                <input type="text" placeholder="Фамилия" prop:value=move || last_name.get()
                    on:input=move |ev| set_last_name.set(event_target_value(&ev)) />
                <button type="submit">"Зарегистрировать"</button>
            </div>
            {move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
        </form>
    }
}
