//! Workload View
//!
//! Period selector, project/task tree and the details panel.

use chrono::{Local, NaiveDate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use workload_core::hierarchy::DisplayRow;
use workload_core::period::{DateRange, PeriodPreset};

use crate::components::{TaskDetails, WorkloadRow};
use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn WorkloadView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let reload = move || spawn_local(async move { ctx.workload().load_period().await });
    reload();

    let on_period = move |period: DateRange| {
        ctx.workload().set_period(period);
        if period.is_complete() || period == DateRange::default() {
            reload();
        }
    };

    let rows = move || {
        store.workload().with(|s| {
            s.visible_rows()
                .into_iter()
                .map(|row| {
                    let selected = s.table.is_selected(&row.key);
                    (row.clone(), selected)
                })
                .collect::<Vec<_>>()
        })
    };
    let lookups = move || store.workload().with(|s| s.lookups.clone());
    let period = Signal::derive(move || store.workload().with(|s| s.table.period));

    view! {
        <section class="workload-view">
            <h2>"Нагрузка"</h2>
            <div class="workload-controls">
                <PeriodPicker period=period on_change=on_period />
                <button on:click=move |_| reload()>"Обновить"</button>
                <button on:click=move |_| ctx.workload().expand_all()>"Развернуть все"</button>
                <button on:click=move |_| ctx.workload().collapse_all()>"Свернуть все"</button>
            </div>

            {move || store.workload().with(|s| s.error.clone()).map(|e| view! { <p class="form-error">{e}</p> })}

            <div class="workload-layout">
                <table class="workload-table">
                    <thead>
                        <tr>
                            <th>"Задача"</th>
                            <th>"Тип / статус"</th>
                            <th>"Исполнитель"</th>
                            <th>"Часы"</th>
                            <th>"Сумма"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show
                            when=move || !store.workload().with(|s| s.loading)
                            fallback=|| view! { <tr><td colspan="5" class="loading">"Загрузка..."</td></tr> }
                        >
                            {move || {
                                let lookups = lookups();
                                let rows = rows();
                                if rows.is_empty() {
                                    return view! {
                                        <tr><td colspan="5" class="empty">"Нет данных за период"</td></tr>
                                    }
                                    .into_any();
                                }
                                rows.into_iter()
                                    .map(|(row, selected): (DisplayRow, bool)| {
                                        view! { <WorkloadRow row=row lookups=lookups.clone() selected=selected /> }
                                    })
                                    .collect_view()
                                    .into_any()
                            }}
                        </Show>
                    </tbody>
                </table>
                <TaskDetails />
            </div>
        </section>
    }
}

/// Preset buttons plus start/end date inputs
#[component]
pub fn PeriodPicker(
    #[prop(into)] period: Signal<DateRange>,
    #[prop(into)] on_change: Callback<DateRange>,
) -> impl IntoView {
    let today = move || Local::now().date_naive();
    let parse = |value: String| NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok();
    let input_value = |date: Option<NaiveDate>| date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();

    view! {
        <div class="period-picker">
            {PeriodPreset::ALL
                .into_iter()
                .map(|preset| view! {
                    <button
                        class=move || {
                            if period.get() == DateRange::preset(preset, today()) { "preset active" } else { "preset" }
                        }
                        on:click=move |_| on_change.run(DateRange::preset(preset, today()))
                    >
                        {preset.label()}
                    </button>
                })
                .collect_view()}
            <input
                type="date"
                prop:value=move || input_value(period.get().start)
                on:change=move |ev| {
                    let current = period.get_untracked();
                    on_change.run(DateRange::new(parse(event_target_value(&ev)), current.end));
                }
            />
            <span>"—"</span>
            <input
                type="date"
                prop:value=move || input_value(period.get().end)
                on:change=move |ev| {
                    let current = period.get_untracked();
                    on_change.run(DateRange::new(current.start, parse(event_target_value(&ev))));
                }
            />
            <span class="period-label">{move || period.get().display()}</span>
        </div>
    }
}
