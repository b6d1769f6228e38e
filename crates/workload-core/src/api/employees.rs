//! Employee roster, rate and tracker reference endpoints

use reqwest::Method;
use uuid::Uuid;

use super::{payload, ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{
    BatchRateUpdate, Employee, RateChangeResult, RateTypeQuery, TrackerProject, TrackerQueue,
};
use crate::validate::Validate;

impl ApiClient {
    /// Roster, optionally including dismissed employees
    pub async fn employees(&self, include_dismissed: bool) -> ApiResult<Vec<Employee>> {
        let token = self.stored_token()?;
        self.send(
            ApiRequest::new(Method::GET, "/users-tracker/all")
                .bearer(&token)
                .query(vec![("includeDismissed".into(), include_dismissed.to_string())]),
            "Ошибка загрузки сотрудников",
        )
        .await
    }

    /// Single employee; a 404 means "no such employee", not a failure
    pub async fn employee_by_id(&self, id: Uuid) -> ApiResult<Option<Employee>> {
        let token = self.stored_token()?;
        let result = self
            .send(
                ApiRequest::new(Method::GET, format!("/users-tracker/{}", id)).bearer(&token),
                "Ошибка загрузки сотрудника",
            )
            .await;
        match result {
            Ok(employee) => Ok(Some(employee)),
            Err(err) if err.status() == Some(404) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Roster with the rate effective for the given scope
    pub async fn employees_by_rate_type(&self, query: &RateTypeQuery) -> ApiResult<Vec<Employee>> {
        query.validate()?;
        let token = self.stored_token()?;
        let mut pairs = vec![
            ("rateType".to_string(), query.rate_type.as_str().to_string()),
            ("includeDismissed".to_string(), query.include_dismissed.to_string()),
        ];
        if let Some(context) = &query.context_value {
            pairs.push(("contextValue".to_string(), context.clone()));
        }
        self.send(
            ApiRequest::new(Method::GET, "/users-tracker/by-rate-type")
                .bearer(&token)
                .query(pairs),
            "Ошибка загрузки сотрудников по типу ставки",
        )
        .await
    }

    /// Submit rate changes in one request; returns the per-entry outcomes untouched
    pub async fn update_rates(&self, batch: &BatchRateUpdate) -> ApiResult<Vec<RateChangeResult>> {
        let body = payload(batch)?;
        let token = self.stored_token()?;
        self.send(
            ApiRequest::new(Method::POST, "/users-tracker-rate/batch")
                .bearer(&token)
                .body(body),
            "Ошибка обновления ставок",
        )
        .await
    }

    pub async fn tracker_projects(&self) -> ApiResult<Vec<TrackerProject>> {
        let token = self.stored_token()?;
        self.send(
            ApiRequest::new(Method::GET, "/reference-tracker/projects").bearer(&token),
            "Ошибка загрузки проектов",
        )
        .await
    }

    pub async fn tracker_queues(&self) -> ApiResult<Vec<TrackerQueue>> {
        let token = self.stored_token()?;
        self.send(
            ApiRequest::new(Method::GET, "/reference-tracker/queues").bearer(&token),
            "Ошибка загрузки очередей",
        )
        .await
    }
}
