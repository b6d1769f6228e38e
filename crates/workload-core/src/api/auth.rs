//! Auth and profile endpoints

use reqwest::Method;

use super::{payload, ApiClient, ApiRequest};
use crate::error::ApiResult;
use crate::models::{
    ChangePasswordRequest, LoginRequest, Profile, RefreshRequest, RegistrationRequest, TokenAuth,
    UpdateProfileRequest,
};

impl ApiClient {
    pub async fn login(&self, data: &LoginRequest) -> ApiResult<TokenAuth> {
        let body = payload(data)?;
        self.send(ApiRequest::new(Method::POST, "/auth/login").body(body), "Ошибка авторизации")
            .await
    }

    pub async fn register_user(&self, data: &RegistrationRequest) -> ApiResult<Profile> {
        let body = payload(data)?;
        self.send(ApiRequest::new(Method::POST, "/auth/register").body(body), "Ошибка регистрации")
            .await
    }

    pub async fn refresh_tokens(&self, data: &RefreshRequest) -> ApiResult<TokenAuth> {
        let body = payload(data)?;
        self.send(
            ApiRequest::new(Method::POST, "/auth/refresh").body(body),
            "Ошибка обновления токенов",
        )
        .await
    }

    /// Invalidate the session server-side
    pub async fn logout(&self, access_token: &str) -> ApiResult<()> {
        self.send_ok(
            ApiRequest::new(Method::POST, "/auth/logout").bearer(access_token),
            "Ошибка выхода из системы",
        )
        .await
    }

    pub async fn profile(&self, access_token: &str) -> ApiResult<Profile> {
        self.send(
            ApiRequest::new(Method::GET, "/auth/profile").bearer(access_token),
            "Ошибка получения профиля пользователя",
        )
        .await
    }

    pub async fn update_profile(&self, access_token: &str, data: &UpdateProfileRequest) -> ApiResult<Profile> {
        let body = payload(data)?;
        self.send(
            ApiRequest::new(Method::PUT, "/auth/profile").bearer(access_token).body(body),
            "Ошибка обновления профиля пользователя",
        )
        .await
    }

    pub async fn change_password(&self, access_token: &str, data: &ChangePasswordRequest) -> ApiResult<()> {
        let body = payload(data)?;
        self.send_ok(
            ApiRequest::new(Method::PATCH, "/auth/profile/password")
                .bearer(access_token)
                .body(body),
            "Ошибка смены пароля",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::testing::{pad_token, profile_json, setup_client, token_json};
    use serde_json::json;

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let (client, transport, _) = setup_client();
        transport.respond(Method::POST, "/auth/login", Ok(token_json("access", "refresh")));

        let data = LoginRequest { login: "admin".into(), password: "secret1".into() };
        let tokens = client.login(&data).await.unwrap();

        assert_eq!(tokens.refresh_token, pad_token("refresh"));
        assert_eq!(tokens.user.map(|u| u.login).as_deref(), Some("admin"));
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, Some(json!({"login": "admin", "password": "secret1"})));
        assert!(requests[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_invalid_payload_never_hits_network() {
        let (client, transport, _) = setup_client();

        let data = LoginRequest { login: "ad".into(), password: "secret1".into() };
        let err = client.login(&data).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_profile_sends_bearer() {
        let (client, transport, _) = setup_client();
        transport.respond(Method::GET, "/auth/profile", Ok(profile_json("admin")));

        let profile = client.profile("token-123").await.unwrap();

        assert_eq!(profile.login, "admin");
        assert_eq!(transport.requests()[0].bearer.as_deref(), Some("token-123"));
    }

    #[tokio::test]
    async fn test_malformed_response_is_normalized() {
        let (client, transport, _) = setup_client();
        transport.respond(Method::GET, "/auth/profile", Ok(json!({"unexpected": true})));

        let err = client.profile("token-123").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
