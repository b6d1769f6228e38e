//! Task Details Component
//!
//! Side panel for the selected task: dates, totals, description and worklogs.

use leptos::prelude::*;
use workload_core::format::{format_currency, format_hours, EMPTY};
use workload_core::models::WorkloadTask;

use crate::context::use_app_context;
use crate::markdown::render_markdown;
use crate::store::{use_app_store, AppStateStoreFields};

/// Tracker timestamps arrive as ISO strings; keep only the date part
fn date_part(value: &str) -> String {
    value.split('T').next().unwrap_or(value).to_string()
}

fn optional_date(value: Option<&str>) -> String {
    value.map(date_part).unwrap_or_else(|| EMPTY.to_string())
}

#[component]
pub fn TaskDetails() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let selected = move || {
        store
            .workload()
            .with(|s| s.selected_task().cloned().map(|task| (task, s.lookups.clone())))
    };

    move || {
        selected().map(|(task, lookups)| {
            let WorkloadTask { key, summary, description, worklogs, .. } = task.clone();
            let description = description
                .filter(|d| !d.trim().is_empty())
                .map(|d| render_markdown(&d));
            let worklog_rows = worklogs
                .into_iter()
                .map(|log| {
                    view! {
                        <tr>
                            <td>{date_part(&log.created_at)}</td>
                            <td>{lookups.assignee_display(Some(&log.author_id))}</td>
                            <td class="num">{format_hours(log.hours_spent)}</td>
                            <td class="num">{format_currency(log.amount)}</td>
                            <td>{log.comment.unwrap_or_default()}</td>
                        </tr>
                    }
                })
                .collect_view();

            view! {
                <aside class="task-details">
                    <header>
                        <span class="task-key">{key}</span>
                        <button class="cancel-btn" on:click=move |_| ctx.workload().clear_selection()>"✗"</button>
                    </header>
                    <h3>{summary}</h3>
                    <dl>
                        <dt>"Статус"</dt>
                        <dd>{lookups.status_display(&task.status_key)}</dd>
                        <dt>"Тип"</dt>
                        <dd>{lookups.type_display(&task.type_key)}</dd>
                        <dt>"Исполнитель"</dt>
                        <dd>{lookups.assignee_display(task.assignee_id.as_deref())}</dd>
                        <dt>"Создана"</dt>
                        <dd>{date_part(&task.created_at)}</dd>
                        <dt>"Срок"</dt>
                        <dd>{optional_date(task.deadline.as_deref())}</dd>
                        <dt>"Решена"</dt>
                        <dd>{optional_date(task.resolved_at.as_deref())}</dd>
                        <dt>"Затрачено"</dt>
                        <dd>{format_hours(task.hours_spent)}</dd>
                        <dt>"Сумма"</dt>
                        <dd>{format_currency(task.amount)}</dd>
                    </dl>
                    {description.map(|html| view! { <div class="task-description" inner_html=html></div> })}
                    <h4>"Списания времени"</h4>
                    <table class="worklogs">
                        <thead>
                            <tr>
                                <th>"Дата"</th>
                                <th>"Автор"</th>
                                <th>"Часы"</th>
                                <th>"Сумма"</th>
                                <th>"Комментарий"</th>
                            </tr>
                        </thead>
                        <tbody>{worklog_rows}</tbody>
                    </table>
                </aside>
            }
        })
    }
}
