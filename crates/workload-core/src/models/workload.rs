//! Workload report models

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_QUEUE;
use crate::validate::{min_chars, Validate, ValidationError};

/// Key/display pair used by every lookup list in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadItem {
    pub key: String,
    pub display: String,
}

/// Time entry attached to a work item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    pub key: i64,
    pub issue_key: String,
    pub author_id: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: String,
    pub hours_spent: Option<f64>,
    pub amount: Option<f64>,
}

/// Work item pulled from the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadTask {
    pub key: String,
    pub created_at: String,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    #[serde(default)]
    pub delta_time: Option<f64>,
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
    #[serde(default)]
    pub hours_spent: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
    pub status_key: String,
    pub type_key: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub sprint_key: Option<String>,
    #[serde(default)]
    pub parent_key: Option<String>,
}

/// `/aggregations/workload` response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workload {
    pub projects: Vec<WorkloadItem>,
    pub sprints: Vec<WorkloadItem>,
    pub types: Vec<WorkloadItem>,
    pub assignees: Vec<WorkloadItem>,
    pub statuses: Vec<WorkloadItem>,
    pub tasks: Vec<WorkloadTask>,
}

/// Query window for the workload report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub queue: String,
}

impl Default for WorkloadQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            queue: DEFAULT_QUEUE.to_string(),
        }
    }
}

impl WorkloadQuery {
    pub fn between(from: Option<String>, to: Option<String>) -> Self {
        Self { from, to, ..Self::default() }
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = &self.from {
            pairs.push(("from".to_string(), from.clone()));
        }
        if let Some(to) = &self.to {
            pairs.push(("to".to_string(), to.clone()));
        }
        pairs.push(("queue".to_string(), self.queue.clone()));
        pairs
    }
}

impl Validate for WorkloadQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        min_chars("queue", &self.queue, 1, "Не указана очередь")?;
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            // ISO dates compare correctly as strings
            if from > to {
                return Err(ValidationError::new("from", "Начало периода позже его окончания"));
            }
        }
        Ok(())
    }
}

/// `/aggregations/workload-users` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadByUser {
    pub user_id: String,
    pub display: String,
    pub hours_spent: f64,
}
