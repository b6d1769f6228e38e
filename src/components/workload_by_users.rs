//! Workload By Users View
//!
//! Hours per employee for the shared reporting period.

use leptos::prelude::*;
use leptos::task::spawn_local;
use workload_core::format::format_hours_hm;
use workload_core::models::WorkloadByUser;
use workload_core::period::DateRange;

use crate::components::PeriodPicker;
use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn WorkloadByUsersView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let load = move || {
        let period = ctx.workload().period();
        spawn_local(async move { ctx.by_users().load_data(period).await });
    };
    load();

    let on_period = move |period: DateRange| {
        ctx.workload().set_period(period);
        if period.is_complete() || period == DateRange::default() {
            load();
        }
    };

    let period = Signal::derive(move || store.workload().with(|s| s.table.period));
    let rows = move || store.by_users().with(|s| s.rows.clone());
    let total = move || store.by_users().with(|s| s.total_hours());

    view! {
        <section class="workload-by-users">
            <h2>"Нагрузка по сотрудникам"</h2>
            <div class="workload-controls">
                <PeriodPicker period=period on_change=on_period />
                <button on:click=move |_| load()>"Обновить"</button>
                <button on:click=move |_| ctx.by_users().clear_data()>"Очистить"</button>
            </div>

            {move || store.by_users().with(|s| s.error.clone()).map(|e| view! { <p class="form-error">{e}</p> })}

            <Show
                when=move || !store.by_users().with(|s| s.loading)
                fallback=|| view! { <p class="loading">"Загрузка..."</p> }
            >
                <table class="by-users-table">
                    <thead>
                        <tr>
                            <th>"Сотрудник"</th>
                            <th>"Часы"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=rows
                            key=|row| (row.user_id.clone(), row.hours_spent.to_bits())
                            children=|row: WorkloadByUser| view! {
                                <tr>
                                    <td>{row.display}</td>
                                    <td class="num">{format_hours_hm(Some(row.hours_spent))}</td>
                                </tr>
                            }
                        />
                    </tbody>
                    <tfoot>
                        <tr>
                            <td>"Итого"</td>
                            <td class="num">{move || format_hours_hm(Some(total()))}</td>
                        </tr>
                    </tfoot>
                </table>
            </Show>
        </section>
    }
}
