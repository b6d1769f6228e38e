//! Employee roster and rate models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{max_chars, min_chars, non_negative, Validate, ValidationError};

/// Tracker user as returned by `/users-tracker/*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub display: String,
    pub email: String,
    pub login: String,
    pub dismissed: bool,
    /// Backends serialize decimals as strings, so accept both
    #[serde(default, deserialize_with = "de_optional_number")]
    pub rate: Option<f64>,
}

fn de_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid rate: {}", s))),
        Some(other) => Err(D::Error::custom(format!("invalid rate: {}", other))),
    }
}

/// Scope a rate applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    Project,
    Queue,
    #[default]
    Global,
}

impl RateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateType::Project => "project",
            RateType::Queue => "queue",
            RateType::Global => "global",
        }
    }
}

/// One entry of a batched rate update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateChange {
    #[serde(rename = "type")]
    pub rate_type: RateType,
    pub rate: f64,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Validate for RateChange {
    fn validate(&self) -> Result<(), ValidationError> {
        non_negative("rate", self.rate, "Ставка должна быть неотрицательным числом")?;
        if self.rate_type != RateType::Global {
            let context = self.context_value.as_deref().unwrap_or_default();
            min_chars("contextValue", context, 1, "Для ставки проекта или очереди нужен контекст")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRateUpdate {
    pub changes: Vec<RateChange>,
}

impl Validate for BatchRateUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.changes.is_empty() {
            return Err(ValidationError::new("changes", "Нет изменений для сохранения"));
        }
        self.changes.iter().try_for_each(Validate::validate)
    }
}

/// Per-entry outcome reported by `/users-tracker-rate/batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateChangeResult {
    pub user_id: Uuid,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub rate_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerProject {
    pub id: i64,
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerQueue {
    pub id: i64,
    pub name: String,
    pub key: String,
}

/// Query for `/users-tracker/by-rate-type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTypeQuery {
    pub rate_type: RateType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_value: Option<String>,
    pub include_dismissed: bool,
}

impl Validate for RateTypeQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(context) = &self.context_value {
            max_chars("contextValue", context, 100, "Слишком длинный контекст ставки")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rate_accepts_string_and_null() {
        let base = json!({
            "id": "7f1c2a52-7f1e-4a0c-9a52-000000000001",
            "createdAt": "2025-01-10T09:00:00Z",
            "updatedAt": "2025-01-10T09:00:00Z",
            "display": "Иван Иванов",
            "email": "ivan@example.com",
            "login": "ivan",
            "dismissed": false,
        });

        let mut with_string = base.clone();
        with_string["rate"] = json!("1500.50");
        let employee: Employee = serde_json::from_value(with_string).unwrap();
        assert_eq!(employee.rate, Some(1500.5));

        let mut with_null = base.clone();
        with_null["rate"] = json!(null);
        let employee: Employee = serde_json::from_value(with_null).unwrap();
        assert_eq!(employee.rate, None);

        let employee: Employee = serde_json::from_value(base).unwrap();
        assert_eq!(employee.rate, None);
    }

    #[test]
    fn test_rate_change_wire_format() {
        let change = RateChange {
            rate_type: RateType::Global,
            rate: 1200.0,
            user_id: Uuid::nil(),
            context_value: None,
            comment: Some("Изменение ставки".into()),
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["type"], "global");
        assert_eq!(value["userId"], "00000000-0000-0000-0000-000000000000");
        assert!(value.get("contextValue").is_none());
    }

    #[test]
    fn test_rate_change_validation() {
        let mut change = RateChange {
            rate_type: RateType::Global,
            rate: -5.0,
            user_id: Uuid::nil(),
            context_value: None,
            comment: None,
        };
        assert_eq!(change.validate().unwrap_err().field, "rate");

        change.rate = 10.0;
        change.rate_type = RateType::Project;
        assert_eq!(change.validate().unwrap_err().field, "contextValue");

        change.context_value = Some("PRJ".into());
        assert!(change.validate().is_ok());
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let batch = BatchRateUpdate { changes: vec![] };
        assert!(batch.validate().is_err());
    }
}
