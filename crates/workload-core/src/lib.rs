//! Workload Admin Core
//!
//! Platform-independent layer of the admin frontend:
//! - models: wire types shared with the backend
//! - api: one function per backend endpoint, behind a `Transport` seam
//! - stores: observable state containers (session, employees, users, workload)
//! - hierarchy: workload tree building, flattening and roll-ups
//! - format / lookups / period: pure view helpers

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod hierarchy;
pub mod lookups;
pub mod models;
pub mod period;
pub mod storage;
pub mod stores;
pub mod validate;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiRequest, HttpTransport, Transport};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult, ErrorCode, TransportError};
pub use storage::{KeyValueStore, MemoryStorage};
pub use validate::{Validate, ValidationError};
