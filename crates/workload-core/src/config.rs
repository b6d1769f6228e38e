//! Runtime Configuration
//!
//! Values baked in at build time through environment variables, with defaults
//! matching a same-origin deployment behind an `/api` reverse proxy.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_WORK_HOURS_PER_MONTH: u32 = 160;
pub const DEFAULT_QUEUE: &str = "Prisma";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Backend base URL; may be origin-relative (`/api`)
    pub api_base_url: String,
    /// Norm used to derive hourly figures from monthly rates
    pub work_hours_per_month: u32,
    /// Tracker queue queried when the caller does not pick one
    pub default_queue: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            work_hours_per_month: DEFAULT_WORK_HOURS_PER_MONTH,
            default_queue: DEFAULT_QUEUE.to_string(),
        }
    }
}

impl AppConfig {
    /// Read `WORKLOAD_API_BASE_URL` / `WORKLOAD_WORK_HOURS_PER_MONTH` captured at compile time
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("WORKLOAD_API_BASE_URL"),
            option_env!("WORKLOAD_WORK_HOURS_PER_MONTH"),
        )
    }

    fn from_values(base_url: Option<&str>, hours: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(hours) = hours.and_then(|h| h.trim().parse::<u32>().ok()).filter(|h| *h > 0) {
            config.work_hours_per_month = hours;
        }
        config
    }

    /// Resolve an origin-relative base URL against the page origin
    pub fn resolve_base_url(&self, origin: &str) -> String {
        if self.api_base_url.starts_with('/') {
            format!("{}{}", origin.trim_end_matches('/'), self.api_base_url)
        } else {
            self.api_base_url.clone()
        }
    }

    /// Hourly rate implied by a monthly rate
    pub fn hourly_rate(&self, monthly: f64) -> f64 {
        monthly / f64::from(self.work_hours_per_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_missing() {
        let config = AppConfig::from_values(None, None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "/api");
        assert_eq!(config.work_hours_per_month, 160);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_values(Some("https://tracker.local/api/"), Some("168"));
        assert_eq!(config.api_base_url, "https://tracker.local/api");
        assert_eq!(config.work_hours_per_month, 168);

        // Garbage falls back to the default norm
        let config = AppConfig::from_values(None, Some("lots"));
        assert_eq!(config.work_hours_per_month, 160);
    }

    #[test]
    fn test_resolve_base_url() {
        let config = AppConfig::default();
        assert_eq!(config.resolve_base_url("https://admin.local/"), "https://admin.local/api");

        let absolute = AppConfig::from_values(Some("http://localhost:3000"), None);
        assert_eq!(absolute.resolve_base_url("https://admin.local"), "http://localhost:3000");
    }

    #[test]
    fn test_hourly_rate() {
        let config = AppConfig::default();
        assert_eq!(config.hourly_rate(160_000.0), 1000.0);
    }
}
