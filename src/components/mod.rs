//! UI Components
//!
//! Leptos components for the admin screens.

mod employee_rates;
mod login_form;
mod profile_panel;
mod registration_form;
mod task_details;
mod title_bar;
mod user_management;
mod workload_by_users;
mod workload_row;
mod workload_view;

pub use employee_rates::EmployeeRates;
pub use login_form::LoginForm;
pub use profile_panel::ProfilePanel;
pub use registration_form::RegistrationForm;
pub use task_details::TaskDetails;
pub use title_bar::TitleBar;
pub use user_management::UserManagement;
pub use workload_by_users::WorkloadByUsersView;
pub use workload_row::WorkloadRow;
pub use workload_view::{PeriodPicker, WorkloadView};

