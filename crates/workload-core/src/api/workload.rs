//! Workload aggregation endpoints

use reqwest::Method;

use super::{ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{Workload, WorkloadByUser, WorkloadQuery};
use crate::validate::Validate;

impl ApiClient {
    pub async fn workload(&self, query: &WorkloadQuery) -> ApiResult<Workload> {
        query.validate()?;
        let token = self.stored_token()?;
        self.send(
            ApiRequest::new(Method::GET, "/aggregations/workload")
                .bearer(&token)
                .query(query.to_pairs()),
            "Ошибка загрузки данных о нагрузке",
        )
        .await
    }

    /// Hours per user over the period; open ends are left out of the query
    pub async fn workload_by_users(&self, from: Option<&str>, to: Option<&str>) -> ApiResult<Vec<WorkloadByUser>> {
        let token = self.stored_token()?;
        let mut pairs = Vec::new();
        if let Some(from) = from {
            pairs.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = to {
            pairs.push(("to".to_string(), to.to_string()));
        }
        self.send(
            ApiRequest::new(Method::GET, "/aggregations/workload-users")
                .bearer(&token)
                .query(pairs),
            "Ошибка загрузки нагрузки по пользователям",
        )
        .await
    }
}
