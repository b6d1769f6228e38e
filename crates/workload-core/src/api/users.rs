//! Admin user-management endpoints

use reqwest::Method;
use uuid::Uuid;

use super::{payload, ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{Profile, RegistrationRequest, SetPasswordRequest, UpdateUserRequest};

impl ApiClient {
    pub async fn all_users(&self, access_token: &str) -> ApiResult<Vec<Profile>> {
        self.send(
            ApiRequest::new(Method::GET, "/users").bearer(access_token),
            "Ошибка получения списка пользователей",
        )
        .await
    }

    pub async fn create_user(&self, access_token: &str, data: &RegistrationRequest) -> ApiResult<Profile> {
        let body = payload(data)?;
        self.send(
            ApiRequest::new(Method::POST, "/users").bearer(access_token).body(body),
            "Ошибка создания пользователя",
        )
        .await
    }

    pub async fn user_by_id(&self, access_token: &str, user_id: Uuid) -> ApiResult<Profile> {
        self.send(
            ApiRequest::new(Method::GET, format!("/users/{}", user_id)).bearer(access_token),
            "Ошибка получения данных пользователя",
        )
        .await
    }

    pub async fn update_user(
        &self,
        access_token: &str,
        user_id: Uuid,
        data: &UpdateUserRequest,
    ) -> ApiResult<Profile> {
        let body = payload(data)?;
        self.send(
            ApiRequest::new(Method::PUT, format!("/users/{}", user_id))
                .bearer(access_token)
                .body(body),
            "Ошибка обновления данных пользователя",
        )
        .await
    }

    pub async fn delete_user(&self, access_token: &str, user_id: Uuid) -> ApiResult<()> {
        self.send_ok(
            ApiRequest::new(Method::DELETE, format!("/users/{}", user_id)).bearer(access_token),
            "Ошибка удаления пользователя",
        )
        .await
    }

    pub async fn set_user_password(&self, access_token: &str, user_id: Uuid, new_password: &str) -> ApiResult<()> {
        let body = payload(&SetPasswordRequest { new_password: new_password.to_string() })?;
        self.send_ok(
            ApiRequest::new(Method::PATCH, format!("/users/{}/password", user_id))
                .bearer(access_token)
                .body(body),
            "Ошибка установки пароля пользователя",
        )
        .await
    }

    pub async fn activate_user(&self, access_token: &str, user_id: Uuid) -> ApiResult<()> {
        self.send_ok(
            ApiRequest::new(Method::PATCH, format!("/users/{}/activate", user_id)).bearer(access_token),
            "Ошибка активации пользователя",
        )
        .await
    }

    pub async fn deactivate_user(&self, access_token: &str, user_id: Uuid) -> ApiResult<()> {
        self.send_ok(
            ApiRequest::new(Method::PATCH, format!("/users/{}/deactivate", user_id)).bearer(access_token),
            "Ошибка деактивации пользователя",
        )
        .await
    }

    pub async fn update_user_status(&self, access_token: &str, user_id: Uuid, is_active: bool) -> ApiResult<()> {
        if is_active {
            self.activate_user(access_token, user_id).await
        } else {
            self.deactivate_user(access_token, user_id).await
        }
    }

    /// Accounts registered but not yet approved by an admin
    pub async fn pending_users(&self, access_token: &str) -> ApiResult<Vec<Profile>> {
        self.send(
            ApiRequest::new(Method::GET, "/users/pending-activation").bearer(access_token),
            "Ошибка получения списка пользователей, ожидающих активации",
        )
        .await
    }
}
