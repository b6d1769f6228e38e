//! Employee Rates Component
//!
//! Roster with inline rate editing; pending edits are saved in one batch.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;
use workload_core::format::{format_currency, format_rate, EMPTY};
use workload_core::models::RateType;
use workload_core::stores::EmployeeRow;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

const NOTICE_MS: u32 = 3000;

const RATE_TYPES: &[(RateType, &str)] = &[
    (RateType::Global, "Общая"),
    (RateType::Project, "Проект"),
    (RateType::Queue, "Очередь"),
];

fn parse_rate_type(value: &str) -> RateType {
    match value {
        "project" => RateType::Project,
        "queue" => RateType::Queue,
        _ => RateType::Global,
    }
}

#[component]
pub fn EmployeeRates() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (rate_type, set_rate_type) = signal(RateType::Global);
    let (context_value, set_context_value) = signal::<Option<String>>(None);
    let (include_all, set_include_all) = signal(false);
    let (notice, set_notice) = signal::<Option<String>>(None);

    let load = move || {
        let (kind, context, all) = (rate_type.get_untracked(), context_value.get_untracked(), include_all.get_untracked());
        spawn_local(async move {
            let employees = ctx.employees();
            match kind {
                RateType::Global => employees.load_employees(all).await,
                _ => employees.load_employees_by_rate_type(kind, context, all).await,
            }
        });
    };

    spawn_local(async move { ctx.employees().load_lookups().await });
    load();

    // Context options for the selected scope
    let contexts = move || {
        store.employees().with(|s| match rate_type.get() {
            RateType::Project => s.projects.iter().map(|p| (p.key.clone(), p.name.clone())).collect(),
            RateType::Queue => s.queues.iter().map(|q| (q.key.clone(), q.name.clone())).collect(),
            RateType::Global => Vec::<(String, String)>::new(),
        })
    };

    let save_all = move |_| {
        let (kind, context) = (rate_type.get_untracked(), context_value.get_untracked());
        set_notice.set(None);
        spawn_local(async move {
            // failures land in the store's error field
            if let Ok(outcome) = ctx.employees().save_all_changes(kind, context).await {
                set_notice.set(Some(format!("Сохранено изменений: {}", outcome.updated)));
                TimeoutFuture::new(NOTICE_MS).await;
                set_notice.set(None);
            }
        });
    };

    let rows = move || store.employees().with(|s| s.rows.clone());
    let stats = move || store.employees().with(|s| s.stats());
    let changes_count = move || store.employees().with(|s| s.changes_count());

    view! {
        <section class="employee-rates">
            <h2>"Ставки сотрудников"</h2>

            <div class="rate-controls">
                <select on:change=move |ev| {
                    set_rate_type.set(parse_rate_type(&event_target_value(&ev)));
                    set_context_value.set(None);
                }>
                    {RATE_TYPES.iter().map(|(kind, label)| view! {
                        <option value=kind.as_str() selected=move || rate_type.get() == *kind>{*label}</option>
                    }).collect_view()}
                </select>
                <Show when=move || rate_type.get() != RateType::Global>
                    <select on:change=move |ev| {
                        let value = event_target_value(&ev);
                        set_context_value.set((!value.is_empty()).then_some(value));
                    }>
                        <option value="">"— выберите —"</option>
                        {move || contexts().into_iter().map(|(key, name)| {
                            let selected = context_value.get().as_deref() == Some(key.as_str());
                            view! { <option value=key.clone() selected=selected>{name}</option> }
                        }).collect_view()}
                    </select>
                </Show>
                <label class="checkbox">
                    <input type="checkbox" prop:checked=move || include_all.get()
                        on:change=move |ev| set_include_all.set(event_target_checked(&ev)) />
                    "Включая уволенных"
                </label>
                <button on:click=move |_| load()>"Загрузить"</button>
            </div>

            <p class="stats">
                {move || {
                    let s = stats();
                    format!(
                        "Всего: {} · Со ставкой: {} · Без ставки: {} · Средняя: {}",
                        s.total, s.with_rate, s.without_rate, format_currency(Some(s.average_rate))
                    )
                }}
            </p>

            {move || store.employees().with(|s| s.error.clone()).map(|e| view! {
                <p class="form-error" on:click=move |_| ctx.employees().clear_error()>{e}</p>
            })}
            {move || notice.get().map(|n| view! { <p class="form-success">{n}</p> })}

            <Show when=move || store.employees().with(|s| s.loading)>
                <p class="loading">"Загрузка..."</p>
            </Show>

            <table class="rates-table">
                <thead>
                    <tr>
                        <th>"Сотрудник"</th>
                        <th>"Логин"</th>
                        <th>"Ставка"</th>
                        <th>"В час"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=rows
                        key=row_key
                        children=move |row: EmployeeRow| view! { <RateRow id=row.employee.id /> }
                    />
                </tbody>
            </table>

            <div class="rate-footer">
                <span>{move || format!("Несохраненных изменений: {}", changes_count())}</span>
                <button
                    disabled=move || changes_count() == 0 || store.employees().with(|s| s.saving)
                    on:click=save_all
                >
                    {move || if store.employees().with(|s| s.saving) { "Сохранение..." } else { "Сохранить все" }}
                </button>
                <button disabled=move || changes_count() == 0 on:click=move |_| ctx.employees().discard_all_changes()>
                    "Отменить все"
                </button>
            </div>
        </section>
    }
}

/// Rows stay mounted for the whole edit; their state is read live
fn row_key(row: &EmployeeRow) -> Uuid {
    row.employee.id
}

fn row_class(row: &EmployeeRow) -> &'static str {
    match (row.employee.dismissed, row.has_changes) {
        (_, true) => "rate-row changed",
        (true, false) => "rate-row dismissed",
        (false, false) => "rate-row",
    }
}

#[component]
fn RateRow(id: Uuid) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    // Live snapshot of this row; None once it leaves the list
    let row = move || store.employees().with(|s| s.rows.iter().find(|r| r.employee.id == id).cloned());
    let field = move |f: fn(&EmployeeRow) -> String| row().map(|r| f(&r)).unwrap_or_default();
    let is_editing = move || row().is_some_and(|r| r.is_editing);
    let pending = move || row().and_then(|r| r.new_rate.filter(|_| r.has_changes));
    let hourly = move || {
        row()
            .and_then(|r| r.employee.rate)
            .map(|rate| format_currency(Some(ctx.config().hourly_rate(rate))))
            .unwrap_or_else(|| EMPTY.to_string())
    };

    view! {
        <tr class=move || row().map(|r| row_class(&r)).unwrap_or("rate-row")>
            <td>{move || field(|r| r.employee.display.clone())}</td>
            <td>{move || field(|r| r.employee.login.clone())}</td>
            <td>
                {move || field(|r| format_rate(r.employee.rate))}
                {move || pending().map(|rate| view! { <span class="pending-rate">" → " {format_rate(Some(rate))}</span> })}
            </td>
            <td>{hourly}</td>
            <td class="row-actions">
                <Show
                    when=is_editing
                    fallback=move || view! {
                        <button on:click=move |_| ctx.employees().start_editing(id)>"Изменить"</button>
                        <Show when=move || pending().is_some()>
                            <button class="cancel-btn" on:click=move |_| ctx.employees().cancel_editing(id)>"✗"</button>
                        </Show>
                    }
                >
                    // read untracked so typing never re-renders the input
                    <input
                        type="number"
                        min="0"
                        step="100"
                        value=store
                            .employees()
                            .with_untracked(|s| s.rows.iter().find(|r| r.employee.id == id).and_then(|r| r.new_rate))
                            .unwrap_or(0.0)
                            .to_string()
                        on:input=move |ev| {
                            if let Ok(value) = event_target_value(&ev).trim().parse::<f64>() {
                                ctx.employees().update_employee_rate(id, value);
                            }
                        }
                    />
                    <button class="confirm-btn" on:click=move |_| ctx.employees().apply_change(id)>"✓"</button>
                    <button class="cancel-btn" on:click=move |_| ctx.employees().cancel_editing(id)>"✗"</button>
                </Show>
            </td>
        </tr>
    }
}
