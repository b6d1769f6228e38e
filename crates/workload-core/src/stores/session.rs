//! Authentication session: tokens, current profile, auth actions

use std::rc::Rc;

use thiserror::Error;

use super::{StoreCell, SubscriptionId};
use crate::api::ApiClient;
use crate::error::{ApiError, ErrorCode};
use crate::models::{
    ChangePasswordRequest, LoginRequest, Profile, RefreshRequest, RegistrationRequest, TokenAuth,
    UpdateProfileRequest,
};
use crate::storage::{KeyValueStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::validate::ValidationError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub profile: Option<Profile>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.profile.is_some()
    }
}

/// Auth failures as shown to the user
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Пользователь не авторизован")]
    NotAuthenticated,
    #[error("Неверные учетные данные. Пожалуйста, проверьте логин и пароль.")]
    InvalidCredentials,
    #[error("Пользователь не найден или неактивен. Обратитесь к администратору.")]
    UserInactive,
    #[error("Произошла ошибка при авторизации. Пожалуйста, попробуйте позже.")]
    LoginFailed,
    #[error("Этот логин уже занят. Пожалуйста, выберите другой логин.")]
    LoginTaken,
    #[error("Произошла ошибка при регистрации. Пожалуйста, попробуйте позже.")]
    RegistrationFailed,
    #[error("Токен недействителен или истек. Пожалуйста, войдите снова.")]
    TokenExpired,
    #[error("Произошла ошибка при получении профиля пользователя.")]
    ProfileFetchFailed,
    #[error("Произошла ошибка при обновлении профиля пользователя.")]
    ProfileUpdateFailed,
    #[error("Неверный старый пароль. Пожалуйста, попробуйте еще раз.")]
    InvalidCurrentPassword,
    #[error("Произошла ошибка при изменении пароля. Пожалуйста, попробуйте позже.")]
    PasswordChangeFailed,
}

/// Map an API failure onto `generic` unless its code calls for something specific
fn classify(err: ApiError, generic: SessionError) -> SessionError {
    if let ApiError::Validation(v) = err {
        return SessionError::Validation(v);
    }
    match (err.code(), &generic) {
        (Some(ErrorCode::InvalidCredentials), SessionError::LoginFailed) => SessionError::InvalidCredentials,
        (Some(ErrorCode::UserInactive), SessionError::LoginFailed) => SessionError::UserInactive,
        (Some(ErrorCode::LoginTaken), SessionError::RegistrationFailed) => SessionError::LoginTaken,
        (Some(ErrorCode::InvalidCurrentPassword), SessionError::PasswordChangeFailed) => {
            SessionError::InvalidCurrentPassword
        }
        // only the profile actions report an expired token
        (
            Some(ErrorCode::TokenInvalid),
            SessionError::ProfileFetchFailed | SessionError::ProfileUpdateFailed | SessionError::PasswordChangeFailed,
        ) => SessionError::TokenExpired,
        _ => generic,
    }
}

#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    storage: Rc<dyn KeyValueStore>,
    cell: StoreCell<SessionState>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            cell: StoreCell::new(SessionState::default()),
        }
    }

    pub fn state(&self) -> SessionState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self, callback: impl Fn(&SessionState) + 'static) -> SubscriptionId {
        self.cell.subscribe(callback)
    }

    pub fn is_authenticated(&self) -> bool {
        self.cell.read(SessionState::is_authenticated)
    }

    pub fn access_token(&self) -> Option<String> {
        self.cell.read(|s| s.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Token for an action that requires a signed-in user
    fn require_token(&self) -> Result<String, SessionError> {
        self.cell
            .read(|s| s.is_authenticated().then(|| s.access_token.clone()).flatten())
            .ok_or(SessionError::NotAuthenticated)
    }

    fn store_tokens(&self, tokens: TokenAuth) {
        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token);
        self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token);
        self.cell.update(|s| {
            s.access_token = Some(tokens.access_token);
            if let Some(profile) = tokens.user {
                s.profile = Some(profile);
            }
        });
    }

    fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
        self.cell.update(|s| *s = SessionState::default());
    }

    /// Restore a session at startup. Returns whether the user is signed in.
    pub async fn init(&self) -> bool {
        if let Some(stored) = self.storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty()) {
            self.cell.update(|s| s.access_token = Some(stored));
        }
        if self.refresh_token().is_none() {
            return false;
        }
        self.refresh_auth_token().await && self.is_authenticated()
    }

    pub async fn login(&self, data: &LoginRequest) -> Result<(), SessionError> {
        match self.api.login(data).await {
            // a login without a profile cannot authenticate, so keep nothing
            Ok(TokenAuth { user: None, .. }) => {
                log::error!("Login response for {} has no user profile", data.login);
                Err(SessionError::LoginFailed)
            }
            Ok(tokens) => {
                log::info!("Signed in as {}", data.login);
                self.store_tokens(tokens);
                Ok(())
            }
            Err(err) => {
                log::error!("Login failed: {}", err);
                Err(classify(err, SessionError::LoginFailed))
            }
        }
    }

    /// Best-effort server logout, then local sign-out regardless
    pub async fn logout(&self) {
        if let (Some(token), Some(_)) = (self.access_token(), self.refresh_token()) {
            if let Err(err) = self.api.logout(&token).await {
                log::warn!("Server logout failed: {}", err);
            }
        }
        self.clear();
    }

    /// Exchange the refresh token for a new pair; any failure signs out silently
    pub async fn refresh_auth_token(&self) -> bool {
        let Some(refresh_token) = self.refresh_token() else {
            return false;
        };
        match self.api.refresh_tokens(&RefreshRequest { refresh_token }).await {
            Ok(tokens) => {
                self.store_tokens(tokens);
                true
            }
            Err(err) => {
                log::warn!("Token refresh failed: {}", err);
                self.clear();
                false
            }
        }
    }

    /// Register another account (admin action)
    pub async fn register(&self, data: &RegistrationRequest) -> Result<Profile, SessionError> {
        self.require_token()?;
        self.api
            .register_user(data)
            .await
            .map_err(|e| classify(e, SessionError::RegistrationFailed))
    }

    pub async fn current_profile(&self) -> Result<Profile, SessionError> {
        let token = self.require_token()?;
        let profile = self
            .api
            .profile(&token)
            .await
            .map_err(|e| classify(e, SessionError::ProfileFetchFailed))?;
        self.cell.update(|s| s.profile = Some(profile.clone()));
        Ok(profile)
    }

    pub async fn update_current_profile(&self, data: &UpdateProfileRequest) -> Result<Profile, SessionError> {
        let token = self.require_token()?;
        let profile = self
            .api
            .update_profile(&token, data)
            .await
            .map_err(|e| classify(e, SessionError::ProfileUpdateFailed))?;
        self.cell.update(|s| s.profile = Some(profile.clone()));
        Ok(profile)
    }

    pub async fn change_current_password(&self, data: &ChangePasswordRequest) -> Result<(), SessionError> {
        let token = self.require_token()?;
        self.api
            .change_password(&token, data)
            .await
            .map_err(|e| classify(e, SessionError::PasswordChangeFailed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorBody, TransportError};
    use crate::storage::MemoryStorage;
    use crate::testing::{backend_error, pad_token, profile_json, setup_client, token_json, MockTransport};
    use reqwest::Method;
    use serde_json::json;
    use std::cell::RefCell;

    fn setup() -> (SessionStore, Rc<MockTransport>, Rc<MemoryStorage>) {
        let (client, transport, storage) = setup_client();
        let store = SessionStore::new(client, storage.clone());
        (store, transport, storage)
    }

    fn credentials() -> LoginRequest {
        LoginRequest { login: "admin".into(), password: "secret1".into() }
    }

    async fn signed_in() -> (SessionStore, Rc<MockTransport>, Rc<MemoryStorage>) {
        let (store, transport, storage) = setup();
        transport.respond(Method::POST, "/auth/login", Ok(token_json("access", "refresh")));
        store.login(&credentials()).await.unwrap();
        (store, transport, storage)
    }

    #[tokio::test]
    async fn test_login_persists_tokens_and_notifies() {
        let (store, transport, storage) = setup();
        transport.respond(Method::POST, "/auth/login", Ok(token_json("access", "refresh")));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |s| sink.borrow_mut().push(s.is_authenticated()));

        store.login(&credentials()).await.unwrap();

        assert!(store.is_authenticated());
        assert_eq!(storage.get(ACCESS_TOKEN_KEY), Some(pad_token("access")));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY), Some(pad_token("refresh")));
        assert_eq!(seen.borrow().last(), Some(&true));
    }

    #[tokio::test]
    async fn test_login_failures_are_classified() {
        let (store, transport, _) = setup();
        transport.respond(Method::POST, "/auth/login", Err(backend_error(401, "Invalid credentials")));
        transport.respond(
            Method::POST,
            "/auth/login",
            Err(TransportError::Status {
                status: 403,
                body: Some(ErrorBody {
                    message: Some(json!("Account disabled")),
                    code: Some(ErrorCode::UserInactive),
                }),
            }),
        );
        transport.respond(Method::POST, "/auth/login", Err(TransportError::Status { status: 500, body: None }));

        assert_eq!(store.login(&credentials()).await, Err(SessionError::InvalidCredentials));
        assert_eq!(store.login(&credentials()).await, Err(SessionError::UserInactive));
        assert_eq!(store.login(&credentials()).await, Err(SessionError::LoginFailed));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_without_profile_fails() {
        let (store, transport, storage) = setup();
        let mut response = token_json("access", "refresh");
        response.as_object_mut().unwrap().remove("user");
        transport.respond(Method::POST, "/auth/login", Ok(response));

        assert_eq!(store.login(&credentials()).await, Err(SessionError::LoginFailed));
        assert!(!store.is_authenticated());
        assert_eq!(store.state(), SessionState::default());
        assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
        assert!(storage.get(REFRESH_TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_token_makes_no_call() {
        let (store, transport, _) = setup();

        assert!(!store.refresh_auth_token().await);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_signs_out() {
        let (store, transport, storage) = signed_in().await;
        transport.respond(Method::POST, "/auth/refresh", Err(backend_error(401, "Token is invalid or expired")));

        assert!(!store.refresh_auth_token().await);
        assert_eq!(store.state(), SessionState::default());
        assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
        assert!(storage.get(REFRESH_TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn test_init_restores_session() {
        let (store, transport, storage) = setup();
        storage.set(ACCESS_TOKEN_KEY, "stale-access");
        storage.set(REFRESH_TOKEN_KEY, &pad_token("stored-refresh"));
        transport.respond(Method::POST, "/auth/refresh", Ok(token_json("fresh", "next")));

        assert!(store.init().await);
        assert_eq!(store.access_token(), Some(pad_token("fresh")));
        let sent = transport.requests_to("/auth/refresh");
        assert_eq!(sent[0].body, Some(json!({"refreshToken": pad_token("stored-refresh")})));
    }

    #[tokio::test]
    async fn test_init_without_refresh_token_stays_anonymous() {
        let (store, transport, storage) = setup();
        storage.set(ACCESS_TOKEN_KEY, "orphan");

        assert!(!store.init().await);
        assert_eq!(store.access_token().as_deref(), Some("orphan"));
        assert!(!store.is_authenticated());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        let (store, transport, storage) = signed_in().await;
        transport.respond(Method::POST, "/auth/logout", Err(TransportError::Network("offline".into())));

        store.logout().await;

        assert!(!store.is_authenticated());
        assert!(storage.get(REFRESH_TOKEN_KEY).is_none());
        assert_eq!(transport.requests_to("/auth/logout").len(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_actions_rejected_without_call() {
        let (store, transport, _) = setup();
        let registration = RegistrationRequest {
            login: "newbie".into(),
            password: "secret1".into(),
            first_name: None,
            last_name: None,
        };

        assert_eq!(store.register(&registration).await, Err(SessionError::NotAuthenticated));
        assert_eq!(store.current_profile().await, Err(SessionError::NotAuthenticated));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_profile_errors_translated() {
        let (store, transport, _) = signed_in().await;
        transport.respond(Method::GET, "/auth/profile", Err(backend_error(401, "Token is invalid or expired")));
        transport.respond(
            Method::PATCH,
            "/auth/profile/password",
            Err(backend_error(400, "Invalid current password")),
        );

        assert_eq!(store.current_profile().await, Err(SessionError::TokenExpired));
        let change = ChangePasswordRequest { old_password: "wrong1".into(), new_password: "secret2".into() };
        assert_eq!(
            store.change_current_password(&change).await,
            Err(SessionError::InvalidCurrentPassword)
        );
    }

    #[tokio::test]
    async fn test_update_profile_replaces_profile() {
        let (store, transport, _) = signed_in().await;
        let mut updated = profile_json("admin");
        updated["firstName"] = json!("Мария");
        transport.respond(Method::PUT, "/auth/profile", Ok(updated));

        let data = UpdateProfileRequest { first_name: Some("Мария".into()), ..Default::default() };
        store.update_current_profile(&data).await.unwrap();

        let profile = store.state().profile.unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Мария"));
    }
}
