//! Lookup tables and badge styling for the workload table

use std::collections::HashMap;

use crate::hierarchy::{DisplayRow, RowKind};
use crate::models::{Workload, WorkloadItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Neutral,
    Primary,
    Info,
    Success,
    Warning,
    Error,
}

impl BadgeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Neutral => "neutral",
            BadgeColor::Primary => "primary",
            BadgeColor::Info => "info",
            BadgeColor::Success => "success",
            BadgeColor::Warning => "warning",
            BadgeColor::Error => "error",
        }
    }
}

/// Type badge: a palette color, or a custom CSS class that overrides it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBadge {
    pub color: BadgeColor,
    pub custom_class: Option<&'static str>,
}

/// key → display maps built from a workload response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadLookups {
    statuses: HashMap<String, String>,
    assignees: HashMap<String, String>,
    types: HashMap<String, String>,
}

fn to_map(items: &[WorkloadItem]) -> HashMap<String, String> {
    items.iter().map(|i| (i.key.clone(), i.display.clone())).collect()
}

impl WorkloadLookups {
    pub fn from_workload(workload: &Workload) -> Self {
        Self {
            statuses: to_map(&workload.statuses),
            assignees: to_map(&workload.assignees),
            types: to_map(&workload.types),
        }
    }

    pub fn status_display(&self, key: &str) -> String {
        self.statuses.get(key).cloned().unwrap_or_else(|| key.to_string())
    }

    pub fn assignee_display(&self, id: Option<&str>) -> String {
        match id.filter(|id| !id.is_empty()) {
            None => "—".to_string(),
            Some(id) => self.assignees.get(id).cloned().unwrap_or_else(|| id.to_string()),
        }
    }

    pub fn type_display(&self, key: &str) -> String {
        self.types.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

pub fn status_color(status_key: &str) -> BadgeColor {
    match status_key.to_lowercase().as_str() {
        "in_progress" | "reopened" => BadgeColor::Info,
        "resolved" | "closed" | "done" => BadgeColor::Success,
        "blocked" | "rejected" => BadgeColor::Error,
        _ => BadgeColor::Neutral,
    }
}

pub fn type_color(type_key: &str) -> TypeBadge {
    let key = type_key.to_lowercase();
    if key == "epic" {
        return TypeBadge { color: BadgeColor::Neutral, custom_class: Some("badge-epic") };
    }
    let color = match key.as_str() {
        "story" | "feature" => BadgeColor::Info,
        "task" => BadgeColor::Success,
        "bug" => BadgeColor::Error,
        "subtask" => BadgeColor::Warning,
        "project" => BadgeColor::Primary,
        _ => BadgeColor::Neutral,
    };
    TypeBadge { color, custom_class: None }
}

/// Human name for tracker type keys; empty when unknown
pub fn type_display_name(type_key: &str) -> &'static str {
    match type_key {
        "bug" => "Bug",
        "task" => "Task",
        "newFeature" => "New Feature",
        "improvement" => "Improvement",
        "refactoring" => "Refactoring",
        "epic" => "Epic",
        "story" => "Story",
        "changeRequest" => "Change Request",
        "incident" => "Incident",
        "serviceRequest" => "Service Request",
        "release" => "Release",
        "project" => "Project",
        "leave" => "Leave",
        "businessTrip" => "Business Trip",
        "changes" => "Changes",
        "documents" => "Documents",
        "request" => "Request",
        "vacancy" => "Vacancy",
        "applicant" => "Applicant",
        "goal" => "Goal",
        "milestone" => "Milestone",
        "reserc" => "Research",
        "revu" => "Review",
        "kommunikacia" => "Communication",
        _ => "",
    }
}

/// How a row is emphasized in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Project,
    Epic,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMeta {
    pub style: RowStyle,
    pub display_type: String,
    pub hide_key: bool,
    pub badge_class: Option<&'static str>,
}

impl RowStyle {
    /// CSS modifier applied to the whole row
    pub fn class(&self) -> &'static str {
        match self {
            RowStyle::Project => "row-project",
            RowStyle::Epic => "row-epic",
            RowStyle::Plain => "",
        }
    }
}

pub fn row_meta(row: &DisplayRow) -> RowMeta {
    let task = match &row.kind {
        RowKind::Task(task) => task,
        RowKind::Project { .. } | RowKind::Ungrouped => {
            return RowMeta {
                style: RowStyle::Project,
                display_type: "Project".to_string(),
                hide_key: true,
                badge_class: None,
            }
        }
    };

    // tracker keys are camelCase; try the lowercased form first
    let mut display_type = type_display_name(&task.type_key.to_lowercase());
    if display_type.is_empty() {
        display_type = type_display_name(&task.type_key);
    }
    if task.type_key.eq_ignore_ascii_case("epic") {
        return RowMeta {
            style: RowStyle::Epic,
            display_type: "Epic".to_string(),
            hide_key: false,
            badge_class: Some("badge-epic"),
        };
    }
    RowMeta {
        style: RowStyle::Plain,
        display_type: display_type.to_string(),
        hide_key: false,
        badge_class: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_hierarchy;
    use crate::models::WorkloadTask;
    use serde_json::json;

    fn item(key: &str, display: &str) -> WorkloadItem {
        WorkloadItem { key: key.to_string(), display: display.to_string() }
    }

    #[test]
    fn test_lookup_fallbacks() {
        let workload = Workload {
            statuses: vec![item("open", "Открыт")],
            assignees: vec![item("u1", "Иван Иванов")],
            types: vec![item("bug", "Ошибка")],
            ..Workload::default()
        };
        let lookups = WorkloadLookups::from_workload(&workload);

        assert_eq!(lookups.status_display("open"), "Открыт");
        assert_eq!(lookups.status_display("weird"), "weird");
        assert_eq!(lookups.assignee_display(Some("u1")), "Иван Иванов");
        assert_eq!(lookups.assignee_display(Some("u9")), "u9");
        assert_eq!(lookups.assignee_display(None), "—");
        assert_eq!(lookups.type_display("bug"), "Ошибка");
    }

    #[test]
    fn test_colors() {
        assert_eq!(status_color("IN_PROGRESS"), BadgeColor::Info);
        assert_eq!(status_color("done"), BadgeColor::Success);
        assert_eq!(status_color("whatever"), BadgeColor::Neutral);
        assert_eq!(type_color("Bug").color, BadgeColor::Error);
        assert_eq!(type_color("Epic").custom_class, Some("badge-epic"));
        assert_eq!(type_color("task").custom_class, None);
    }

    #[test]
    fn test_row_meta() {
        let epic: WorkloadTask = serde_json::from_value(json!({
            "key": "E-1", "createdAt": "2025-03-01T10:00:00Z", "summary": "Epic",
            "statusKey": "open", "typeKey": "epic", "projectId": "P1"
        }))
        .unwrap();
        let mut feature = epic.clone();
        feature.key = "F-1".into();
        feature.type_key = "newFeature".into();
        feature.parent_key = Some("E-1".into());

        let rows = build_hierarchy(&[epic, feature], &[item("P1", "Proj")]);
        let project = row_meta(&rows[0]);
        assert_eq!(project.style, RowStyle::Project);
        assert!(project.hide_key);

        let epic_meta = row_meta(&rows[0].children[0]);
        assert_eq!(epic_meta.style, RowStyle::Epic);
        assert_eq!(epic_meta.badge_class, Some("badge-epic"));

        let feature_meta = row_meta(&rows[0].children[0].children[0]);
        assert_eq!(feature_meta.style, RowStyle::Plain);
        assert_eq!(feature_meta.display_type, "New Feature");
    }
}
