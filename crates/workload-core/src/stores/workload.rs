//! Workload report stores and table view state

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use super::{StoreCell, SubscriptionId};
use crate::api::ApiClient;
use crate::hierarchy::{self, DisplayRow};
use crate::lookups::WorkloadLookups;
use crate::models::{Workload, WorkloadByUser, WorkloadQuery, WorkloadTask};
use crate::period::DateRange;
use crate::storage::KeyValueStore;

/// Selection, expansion and period of the workload table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadTableState {
    pub selected_key: Option<String>,
    pub expanded: HashSet<String>,
    pub period: DateRange,
}

impl WorkloadTableState {
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected_key.as_deref() == Some(key)
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn select_task(&mut self, key: Option<String>) {
        self.selected_key = key;
    }

    pub fn clear_selection(&mut self) {
        self.selected_key = None;
    }

    pub fn toggle_expanded(&mut self, key: &str) {
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    pub fn set_expanded(&mut self, key: &str, expanded: bool) {
        if expanded {
            self.expanded.insert(key.to_string());
        } else {
            self.expanded.remove(key);
        }
    }

    /// Replace the expanded set
    pub fn initialize_expanded(&mut self, keys: impl IntoIterator<Item = String>) {
        self.expanded = keys.into_iter().collect();
    }

    pub fn clear_expanded(&mut self) {
        self.expanded.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadState {
    pub workload: Option<Workload>,
    pub rows: Vec<DisplayRow>,
    pub lookups: WorkloadLookups,
    pub table: WorkloadTableState,
    pub loading: bool,
    pub error: Option<String>,
}

impl WorkloadState {
    /// Rows in display order, skipping collapsed subtrees
    pub fn visible_rows(&self) -> Vec<&DisplayRow> {
        hierarchy::flatten(&self.rows)
    }

    pub fn selected_task(&self) -> Option<&WorkloadTask> {
        let key = self.table.selected_key.as_deref()?;
        hierarchy::find_row(&self.rows, key)?.task()
    }

    fn sync_expansion(&mut self) {
        hierarchy::apply_expansion(&mut self.rows, &self.table.expanded);
    }
}

#[derive(Clone)]
pub struct WorkloadStore {
    api: ApiClient,
    storage: Rc<dyn KeyValueStore>,
    queue: String,
    generation: Rc<Cell<u64>>,
    cell: StoreCell<WorkloadState>,
}

impl WorkloadStore {
    /// Restores the last saved period from `storage`
    pub fn new(api: ApiClient, storage: Rc<dyn KeyValueStore>, queue: &str) -> Self {
        let state = WorkloadState {
            table: WorkloadTableState {
                period: DateRange::load(storage.as_ref()),
                ..WorkloadTableState::default()
            },
            ..WorkloadState::default()
        };
        Self {
            api,
            storage,
            queue: queue.to_string(),
            generation: Rc::new(Cell::new(0)),
            cell: StoreCell::new(state),
        }
    }

    pub fn state(&self) -> WorkloadState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self, callback: impl Fn(&WorkloadState) + 'static) -> SubscriptionId {
        self.cell.subscribe(callback)
    }

    pub fn period(&self) -> DateRange {
        self.cell.read(|s| s.table.period)
    }

    /// Change and persist the reporting period
    pub fn set_period(&self, period: DateRange) {
        period.save(self.storage.as_ref());
        self.cell.update(|s| s.table.period = period);
    }

    /// Load the report for the stored period
    pub async fn load_period(&self) {
        let mut query = self.period().to_query();
        query.queue = self.queue.clone();
        self.load(&query).await;
    }

    /// Fetch and rebuild the tree; a response overtaken by a newer load is dropped
    pub async fn load(&self, query: &WorkloadQuery) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.api.workload(query).await;
        if self.generation.get() != generation {
            log::debug!("Dropping stale workload response #{}", generation);
            return;
        }

        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(workload) => {
                    s.rows = hierarchy::build_hierarchy(&workload.tasks, &workload.projects);
                    s.lookups = WorkloadLookups::from_workload(&workload);
                    s.table.initialize_expanded(hierarchy::expandable_keys(&s.rows));
                    if s.selected_task().is_none() {
                        s.table.clear_selection();
                    }
                    s.workload = Some(workload);
                }
                Err(err) => {
                    s.error = Some(err.to_string());
                    s.workload = None;
                    s.rows.clear();
                }
            }
            s.sync_expansion();
        });
    }

    pub fn select_task(&self, key: Option<String>) {
        self.cell.update(|s| s.table.select_task(key));
    }

    pub fn clear_selection(&self) {
        self.cell.update(|s| s.table.clear_selection());
    }

    pub fn toggle_expanded(&self, key: &str) {
        self.cell.update(|s| {
            s.table.toggle_expanded(key);
            s.sync_expansion();
        });
    }

    pub fn set_expanded(&self, key: &str, expanded: bool) {
        self.cell.update(|s| {
            s.table.set_expanded(key, expanded);
            s.sync_expansion();
        });
    }

    pub fn expand_all(&self) {
        self.cell.update(|s| {
            s.table.initialize_expanded(hierarchy::expandable_keys(&s.rows));
            s.sync_expansion();
        });
    }

    pub fn collapse_all(&self) {
        self.cell.update(|s| {
            s.table.clear_expanded();
            s.sync_expansion();
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadByUsersState {
    pub rows: Vec<WorkloadByUser>,
    pub loading: bool,
    pub error: Option<String>,
}

impl WorkloadByUsersState {
    pub fn total_hours(&self) -> f64 {
        self.rows.iter().map(|r| r.hours_spent).sum()
    }
}

#[derive(Clone)]
pub struct WorkloadByUsersStore {
    api: ApiClient,
    cell: StoreCell<WorkloadByUsersState>,
}

impl WorkloadByUsersStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cell: StoreCell::new(WorkloadByUsersState::default()),
        }
    }

    pub fn state(&self) -> WorkloadByUsersState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self, callback: impl Fn(&WorkloadByUsersState) + 'static) -> SubscriptionId {
        self.cell.subscribe(callback)
    }

    pub async fn load_data(&self, period: DateRange) {
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let (from, to) = period.query_bounds();
        let result = self.api.workload_by_users(from.as_deref(), to.as_deref()).await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(rows) => s.rows = rows,
                Err(err) => {
                    s.error = Some(err.to_string());
                    s.rows.clear();
                }
            }
        });
    }

    pub fn clear_data(&self) {
        self.cell.update(|s| *s = WorkloadByUsersState::default());
    }
}
