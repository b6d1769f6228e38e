//! Workload Hierarchy
//!
//! Builds the project → task → subtask tree shown in the workload table
//! from the flat task list, and walks it for rendering and roll-ups.

use std::collections::{HashMap, HashSet};

use crate::models::{WorkloadItem, WorkloadTask};

/// Row key of the group for tasks that belong to no known project
pub const NO_PROJECT_KEY: &str = "group:no-project";
/// Project row keys live under this prefix so they never clash with task keys
pub const PROJECT_KEY_PREFIX: &str = "project:";
pub const NO_PROJECT_DISPLAY: &str = "Без проекта";
pub const NO_PROJECT_SUMMARY: &str = "Задачи без проекта";

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Task(WorkloadTask),
    Project { display: String },
    /// Trailing group for tasks without a project
    Ungrouped,
}

/// Node of the workload table
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub key: String,
    pub kind: RowKind,
    pub children: Vec<DisplayRow>,
    /// 0 for project rows, +1 per nesting step
    pub level: usize,
    pub is_expanded: bool,
}

/// Row key of a project group
pub fn project_row_key(project_key: &str) -> String {
    format!("{}{}", PROJECT_KEY_PREFIX, project_key)
}

impl DisplayRow {
    pub fn task(&self) -> Option<&WorkloadTask> {
        match &self.kind {
            RowKind::Task(task) => Some(task),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        !matches!(self.kind, RowKind::Task(_))
    }

    pub fn title(&self) -> &str {
        match &self.kind {
            RowKind::Task(task) => &task.summary,
            RowKind::Project { display } => display,
            RowKind::Ungrouped => NO_PROJECT_DISPLAY,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Build root rows: one per non-empty project in list order, then the
/// ungrouped row if any task has no known project.
///
/// A parent edge that would close a cycle is dropped and the task stays at
/// project level, so the result is always a forest.
pub fn build_hierarchy(tasks: &[WorkloadTask], projects: &[WorkloadItem]) -> Vec<DisplayRow> {
    // first occurrence wins on duplicate keys
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<usize> = Vec::new();
    for (i, task) in tasks.iter().enumerate() {
        if !index.contains_key(task.key.as_str()) {
            index.insert(task.key.as_str(), i);
            unique.push(i);
        }
    }

    let mut parent_of: HashMap<usize, usize> = HashMap::new();
    for &i in &unique {
        let Some(parent) = tasks[i].parent_key.as_deref().and_then(|k| index.get(k).copied()) else {
            continue;
        };
        if closes_cycle(i, parent, &parent_of) {
            log::warn!("Ignoring parent {} of {}: cycle", tasks[parent].key, tasks[i].key);
            continue;
        }
        parent_of.insert(i, parent);
    }

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    for &i in &unique {
        if let Some(&parent) = parent_of.get(&i) {
            children.entry(parent).or_default().push(i);
        }
    }

    let known_projects: HashSet<&str> = projects.iter().map(|p| p.key.as_str()).collect();
    // None collects the ungrouped roots
    let mut roots_by_project: HashMap<Option<&str>, Vec<usize>> = HashMap::new();
    for &i in &unique {
        if parent_of.contains_key(&i) {
            continue;
        }
        let group = tasks[i].project_id.as_deref().filter(|p| known_projects.contains(p));
        roots_by_project.entry(group).or_default().push(i);
    }

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for project in projects {
        if !seen.insert(project.key.as_str()) {
            continue;
        }
        if let Some(roots) = roots_by_project.get(&Some(project.key.as_str())) {
            rows.push(DisplayRow {
                key: project_row_key(&project.key),
                kind: RowKind::Project { display: project.display.clone() },
                children: roots.iter().map(|&i| task_row(i, 1, tasks, &children)).collect(),
                level: 0,
                is_expanded: true,
            });
        }
    }
    if let Some(roots) = roots_by_project.get(&None) {
        rows.push(DisplayRow {
            key: NO_PROJECT_KEY.to_string(),
            kind: RowKind::Ungrouped,
            children: roots.iter().map(|&i| task_row(i, 1, tasks, &children)).collect(),
            level: 0,
            is_expanded: true,
        });
    }
    rows
}

/// Would `child -> parent` make `child` its own ancestor?
fn closes_cycle(child: usize, parent: usize, parent_of: &HashMap<usize, usize>) -> bool {
    let mut current = Some(parent);
    while let Some(node) = current {
        if node == child {
            return true;
        }
        current = parent_of.get(&node).copied();
    }
    false
}

fn task_row(
    i: usize,
    level: usize,
    tasks: &[WorkloadTask],
    children: &HashMap<usize, Vec<usize>>,
) -> DisplayRow {
    let task = &tasks[i];
    DisplayRow {
        key: task.key.clone(),
        kind: RowKind::Task(task.clone()),
        children: children
            .get(&i)
            .map(|kids| kids.iter().map(|&c| task_row(c, level + 1, tasks, children)).collect())
            .unwrap_or_default(),
        level,
        is_expanded: true,
    }
}

/// Depth-first pre-order walk descending only into expanded rows
pub fn flatten(rows: &[DisplayRow]) -> Vec<&DisplayRow> {
    fn collect<'a>(rows: &'a [DisplayRow], out: &mut Vec<&'a DisplayRow>) {
        for row in rows {
            out.push(row);
            if row.is_expanded {
                collect(&row.children, out);
            }
        }
    }

    let mut out = Vec::new();
    collect(rows, &mut out);
    out
}

/// Set every row's expansion flag from the expanded-key set
pub fn apply_expansion(rows: &mut [DisplayRow], expanded: &HashSet<String>) {
    for row in rows {
        row.is_expanded = expanded.contains(&row.key);
        apply_expansion(&mut row.children, expanded);
    }
}

/// Keys of every row that has children
pub fn expandable_keys(rows: &[DisplayRow]) -> Vec<String> {
    let mut keys = Vec::new();
    let mut stack: Vec<&DisplayRow> = rows.iter().rev().collect();
    while let Some(row) = stack.pop() {
        if row.has_children() {
            keys.push(row.key.clone());
            stack.extend(row.children.iter().rev());
        }
    }
    keys
}

pub fn find_row<'a>(rows: &'a [DisplayRow], key: &str) -> Option<&'a DisplayRow> {
    for row in rows {
        if row.key == key {
            return Some(row);
        }
        if let Some(found) = find_row(&row.children, key) {
            return Some(found);
        }
    }
    None
}

fn sum_leaves(row: &DisplayRow, value: fn(&WorkloadTask) -> Option<f64>) -> f64 {
    if row.children.is_empty() {
        return row.task().and_then(value).unwrap_or(0.0);
    }
    row.children.iter().map(|c| sum_leaves(c, value)).sum()
}

/// Sum of leaf `hours_spent` in the subtree; missing values count as zero
pub fn total_hours(row: &DisplayRow) -> f64 {
    sum_leaves(row, |t| t.hours_spent)
}

pub fn total_amount(row: &DisplayRow) -> f64 {
    sum_leaves(row, |t| t.amount)
}

pub fn has_worklogs_in_tree(row: &DisplayRow) -> bool {
    row.task().is_some_and(|t| !t.worklogs.is_empty()) || row.children.iter().any(has_worklogs_in_tree)
}
