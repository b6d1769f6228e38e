//! Employee roster with pending rate edits

use thiserror::Error;
use uuid::Uuid;

use super::{StoreCell, SubscriptionId};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{
    BatchRateUpdate, Employee, RateChange, RateChangeResult, RateType, RateTypeQuery, TrackerProject,
    TrackerQueue,
};

pub const INITIAL_RATE_COMMENT: &str = "Установка первоначальной ставки";
pub const CHANGED_RATE_COMMENT: &str = "Изменение ставки";

/// Backend employee plus transient edit state
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub employee: Employee,
    /// Scratch value while editing or pending save
    pub new_rate: Option<f64>,
    pub has_changes: bool,
    pub is_editing: bool,
}

impl From<Employee> for EmployeeRow {
    fn from(employee: Employee) -> Self {
        Self {
            employee,
            new_rate: None,
            has_changes: false,
            is_editing: false,
        }
    }
}

impl EmployeeRow {
    fn reset(&mut self) {
        self.new_rate = None;
        self.has_changes = false;
        self.is_editing = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmployeeStats {
    pub total: usize,
    pub with_rate: usize,
    pub without_rate: usize,
    /// Mean over employees that have a rate, rounded
    pub average_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeState {
    pub rows: Vec<EmployeeRow>,
    pub loading: bool,
    pub saving: bool,
    pub loading_lookups: bool,
    pub error: Option<String>,
    pub projects: Vec<TrackerProject>,
    pub queues: Vec<TrackerQueue>,
}

impl EmployeeState {
    pub fn pending(&self) -> impl Iterator<Item = &EmployeeRow> {
        self.rows.iter().filter(|r| r.has_changes)
    }

    pub fn changes_count(&self) -> usize {
        self.pending().count()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.pending().next().is_some()
    }

    pub fn stats(&self) -> EmployeeStats {
        let rates: Vec<f64> = self.rows.iter().filter_map(|r| r.employee.rate).collect();
        let average_rate = if rates.is_empty() {
            0.0
        } else {
            (rates.iter().sum::<f64>() / rates.len() as f64).round()
        };
        EmployeeStats {
            total: self.rows.len(),
            with_rate: rates.len(),
            without_rate: self.rows.len() - rates.len(),
            average_rate,
        }
    }

    fn row_mut(&mut self, id: Uuid) -> Option<&mut EmployeeRow> {
        self.rows.iter_mut().find(|r| r.employee.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmployeeError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Сохранение уже выполняется")]
    SaveInProgress,
    /// Some entries of a batch were rejected; nothing was applied locally
    #[error("Некоторые обновления не удались: {}", describe_failures(.0))]
    PartialFailure(Vec<(Uuid, String)>),
}

fn describe_failures(failures: &[(Uuid, String)]) -> String {
    failures
        .iter()
        .map(|(id, reason)| format!("{}: {}", id, reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub updated: usize,
}

#[derive(Clone)]
pub struct EmployeeStore {
    api: ApiClient,
    cell: StoreCell<EmployeeState>,
}

impl EmployeeStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cell: StoreCell::new(EmployeeState::default()),
        }
    }

    pub fn state(&self) -> EmployeeState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self, callback: impl Fn(&EmployeeState) + 'static) -> SubscriptionId {
        self.cell.subscribe(callback)
    }

    fn finish_load(&self, result: Result<Vec<Employee>, ApiError>) {
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(employees) => s.rows = employees.into_iter().map(EmployeeRow::from).collect(),
                Err(err) => s.error = Some(err.to_string()),
            }
        });
    }

    pub async fn load_employees(&self, include_all: bool) {
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.api.employees(include_all).await;
        self.finish_load(result);
    }

    pub async fn load_employees_by_rate_type(
        &self,
        rate_type: RateType,
        context_value: Option<String>,
        include_all: bool,
    ) {
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let query = RateTypeQuery {
            rate_type,
            context_value,
            include_dismissed: include_all,
        };
        let result = self.api.employees_by_rate_type(&query).await;
        self.finish_load(result);
    }

    /// Tracker projects and queues, fetched concurrently
    pub async fn load_lookups(&self) {
        self.cell.update(|s| {
            s.loading_lookups = true;
            s.error = None;
        });
        let (projects, queues) = futures::join!(self.api.tracker_projects(), self.api.tracker_queues());
        self.cell.update(|s| {
            s.loading_lookups = false;
            match (projects, queues) {
                (Ok(projects), Ok(queues)) => {
                    s.projects = projects;
                    s.queues = queues;
                }
                (Err(err), _) | (_, Err(err)) => {
                    log::error!("Failed to load rate lookups: {}", err);
                    s.error = Some(err.to_string());
                }
            }
        });
    }

    pub fn start_editing(&self, id: Uuid) {
        self.cell.update(|s| {
            if let Some(row) = s.row_mut(id) {
                row.is_editing = true;
                row.new_rate = Some(row.employee.rate.unwrap_or(0.0));
            }
        });
    }

    pub fn update_employee_rate(&self, id: Uuid, value: f64) {
        self.cell.update(|s| {
            if let Some(row) = s.row_mut(id) {
                row.new_rate = Some(value);
                row.has_changes = row.employee.rate != Some(value);
                row.is_editing = true;
            }
        });
    }

    /// Leave edit mode; the pending change stays until save or discard
    pub fn apply_change(&self, id: Uuid) {
        self.cell.update(|s| {
            if let Some(row) = s.row_mut(id).filter(|r| r.new_rate.is_some()) {
                row.is_editing = false;
            }
        });
    }

    pub fn cancel_editing(&self, id: Uuid) {
        self.cell.update(|s| {
            if let Some(row) = s.row_mut(id) {
                row.reset();
            }
        });
    }

    pub fn discard_all_changes(&self) {
        self.cell.update(|s| s.rows.iter_mut().for_each(EmployeeRow::reset));
    }

    pub fn clear_error(&self) {
        self.cell.update(|s| s.error = None);
    }

    /// Send every pending change in one batch.
    ///
    /// Local rates change only when the whole batch succeeds.
    pub async fn save_all_changes(
        &self,
        rate_type: RateType,
        context_value: Option<String>,
    ) -> Result<SaveOutcome, EmployeeError> {
        let changes = self.cell.read(|s| {
            if s.saving {
                return Err(EmployeeError::SaveInProgress);
            }
            Ok(s.pending()
                .filter_map(|row| {
                    let rate = row.new_rate?;
                    let comment = match row.employee.rate {
                        None => INITIAL_RATE_COMMENT,
                        Some(_) => CHANGED_RATE_COMMENT,
                    };
                    Some(RateChange {
                        rate_type,
                        rate,
                        user_id: row.employee.id,
                        context_value: context_value.clone(),
                        comment: Some(comment.to_string()),
                    })
                })
                .collect::<Vec<_>>())
        })?;
        if changes.is_empty() {
            return Ok(SaveOutcome { updated: 0 });
        }

        self.cell.update(|s| {
            s.saving = true;
            s.error = None;
        });
        let batch = BatchRateUpdate { changes };
        let result = self.api.update_rates(&batch).await;

        let outcome = result
            .map_err(EmployeeError::from)
            .and_then(|results| check_results(&results));
        self.cell.update(|s| {
            s.saving = false;
            match &outcome {
                Ok(()) => {
                    for change in &batch.changes {
                        if let Some(row) = s.row_mut(change.user_id) {
                            row.employee.rate = Some(change.rate);
                            if row.new_rate == Some(change.rate) {
                                row.reset();
                            } else {
                                // edited again while the save was in flight
                                row.has_changes = row.new_rate.is_some();
                            }
                        }
                    }
                }
                Err(err) => s.error = Some(err.to_string()),
            }
        });

        match outcome {
            Ok(()) => {
                log::info!("Saved {} rate changes", batch.changes.len());
                Ok(SaveOutcome { updated: batch.changes.len() })
            }
            Err(err) => {
                log::error!("Rate save failed: {}", err);
                Err(err)
            }
        }
    }
}

fn check_results(results: &[RateChangeResult]) -> Result<(), EmployeeError> {
    let failures: Vec<(Uuid, String)> = results
        .iter()
        .filter(|r| !r.success)
        .map(|r| (r.user_id, r.error.clone().unwrap_or_else(|| "Неизвестная ошибка".to_string())))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(EmployeeError::PartialFailure(failures))
    }
}
