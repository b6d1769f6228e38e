//! Workload Row Component
//!
//! One line of the workload table: project group or task.

use leptos::prelude::*;
use workload_core::format::{format_currency, format_hours};
use workload_core::hierarchy::{total_amount, total_hours, DisplayRow};
use workload_core::lookups::{row_meta, status_color, type_color, WorkloadLookups};

use crate::context::use_app_context;

const INDENT_PX: usize = 20;

#[component]
pub fn WorkloadRow(row: DisplayRow, lookups: WorkloadLookups, selected: bool) -> impl IntoView {
    let ctx = use_app_context();
    let meta = row_meta(&row);
    let key = row.key.clone();
    let indent = row.level * INDENT_PX;
    let hours = format_hours(Some(total_hours(&row)));
    let amount = format_currency(Some(total_amount(&row)));
    let is_task = !row.is_group();

    let mut class = format!("workload-row {}", meta.style.class());
    if selected {
        class.push_str(" selected");
    }

    // Collapse toggle
    let toggle = if row.has_children() {
        let key = key.clone();
        view! {
            <button class="collapse-btn" on:click=move |ev| {
                ev.stop_propagation();
                ctx.workload().toggle_expanded(&key);
            }>
                {if row.is_expanded { "▼" } else { "▶" }}
            </button>
        }
        .into_any()
    } else {
        view! { <span class="collapse-placeholder">"·"</span> }.into_any()
    };

    let badges = row.task().map(|task| {
        let type_badge = type_color(&task.type_key);
        let type_class = match meta.badge_class.or(type_badge.custom_class) {
            Some(custom) => format!("badge {}", custom),
            None => format!("badge badge-{}", type_badge.color.as_str()),
        };
        let type_label = if meta.display_type.is_empty() {
            lookups.type_display(&task.type_key)
        } else {
            meta.display_type.clone()
        };
        let status_class = format!("badge badge-{}", status_color(&task.status_key).as_str());
        view! {
            <span class=type_class>{type_label}</span>
            <span class=status_class>{lookups.status_display(&task.status_key)}</span>
        }
    });
    let assignee = row
        .task()
        .map(|task| lookups.assignee_display(task.assignee_id.as_deref()))
        .unwrap_or_default();

    let on_select = move |_| {
        if is_task {
            ctx.workload().select_task(Some(key.clone()));
        }
    };

    view! {
        <tr class=class on:click=on_select>
            <td class="title-cell">
                <div style=format!("padding-left: {}px;", indent)>
                    {toggle}
                    {(!meta.hide_key).then(|| view! { <span class="task-key">{row.key.clone()}</span> })}
                    <span class="task-title">{row.title().to_string()}</span>
                </div>
            </td>
            <td class="badges">{badges}</td>
            <td>{assignee}</td>
            <td class="num">{hours}</td>
            <td class="num">{amount}</td>
        </tr>
    }
}
