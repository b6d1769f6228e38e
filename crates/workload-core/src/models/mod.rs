//! Models
//!
//! Data structures matching the backend wire format (camelCase JSON).

mod auth;
mod employee;
mod workload;

pub use auth::*;
pub use employee::*;
pub use workload::*;
