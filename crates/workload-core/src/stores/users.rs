//! Admin user management

use uuid::Uuid;

use super::{SessionStore, StoreCell, SubscriptionId};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Profile, RegistrationRequest, UpdateUserRequest};

const TOKEN_MISSING: &str = "Токен доступа отсутствует";
const USER_NOT_FOUND: &str = "Пользователь не найден";
const TEMP_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub users: Vec<Profile>,
    pub pending: Vec<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl UserState {
    pub fn active_users(&self) -> impl Iterator<Item = &Profile> {
        self.users.iter().filter(|u| u.is_active)
    }

    pub fn inactive_users(&self) -> impl Iterator<Item = &Profile> {
        self.users.iter().filter(|u| !u.is_active)
    }

    pub fn stats(&self) -> UserStats {
        let active = self.active_users().count();
        UserStats {
            total: self.users.len(),
            active,
            inactive: self.users.len() - active,
        }
    }
}

/// Random lowercase alphanumeric password for an admin reset
fn temporary_password() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(TEMP_PASSWORD_LEN)
        .collect()
}

#[derive(Clone)]
pub struct UserManagementStore {
    api: ApiClient,
    session: SessionStore,
    cell: StoreCell<UserState>,
}

impl UserManagementStore {
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            cell: StoreCell::new(UserState::default()),
        }
    }

    pub fn state(&self) -> UserState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self, callback: impl Fn(&UserState) + 'static) -> SubscriptionId {
        self.cell.subscribe(callback)
    }

    pub fn clear_error(&self) {
        self.cell.update(|s| s.error = None);
    }

    /// Session token, or record the failure and give up
    fn token(&self) -> Option<String> {
        let token = self.session.access_token();
        if token.is_none() {
            self.cell.update(|s| s.error = Some(TOKEN_MISSING.to_string()));
        }
        token
    }

    fn fail(&self, context: &str, err: ApiError) {
        log::error!("{}: {}", context, err);
        self.cell.update(|s| s.error = Some(err.to_string()));
    }

    pub async fn load_users(&self) -> bool {
        let Some(token) = self.token() else { return false };
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.api.all_users(&token).await;
        self.cell.update(|s| s.loading = false);
        match result {
            Ok(users) => {
                self.cell.update(|s| s.users = users);
                true
            }
            Err(err) => {
                self.fail("Failed to load users", err);
                false
            }
        }
    }

    pub async fn load_pending_users(&self) -> bool {
        let Some(token) = self.token() else { return false };
        match self.api.pending_users(&token).await {
            Ok(pending) => {
                self.cell.update(|s| s.pending = pending);
                true
            }
            Err(err) => {
                self.fail("Failed to load pending users", err);
                false
            }
        }
    }

    /// Flip a user between active and inactive
    pub async fn toggle_user_status(&self, user_id: Uuid) -> bool {
        let Some(token) = self.token() else { return false };
        let Some(is_active) = self.cell.read(|s| s.users.iter().find(|u| u.id == user_id).map(|u| u.is_active))
        else {
            self.cell.update(|s| s.error = Some(USER_NOT_FOUND.to_string()));
            return false;
        };
        match self.api.update_user_status(&token, user_id, !is_active).await {
            Ok(()) => {
                self.cell.update(|s| {
                    if let Some(user) = s.users.iter_mut().find(|u| u.id == user_id) {
                        user.is_active = !is_active;
                    }
                    if !is_active {
                        s.pending.retain(|u| u.id != user_id);
                    }
                });
                true
            }
            Err(err) => {
                self.fail("Failed to change user status", err);
                false
            }
        }
    }

    /// Set a fresh temporary password and return it for the admin to hand over
    pub async fn reset_password(&self, user_id: Uuid) -> Option<String> {
        let token = self.token()?;
        let password = temporary_password();
        match self.api.set_user_password(&token, user_id, &password).await {
            Ok(()) => Some(password),
            Err(err) => {
                self.fail("Failed to reset password", err);
                None
            }
        }
    }

    pub async fn delete_user(&self, user_id: Uuid) -> bool {
        let Some(token) = self.token() else { return false };
        match self.api.delete_user(&token, user_id).await {
            Ok(()) => {
                self.cell.update(|s| {
                    s.users.retain(|u| u.id != user_id);
                    s.pending.retain(|u| u.id != user_id);
                });
                true
            }
            Err(err) => {
                self.fail("Failed to delete user", err);
                false
            }
        }
    }

    pub async fn create_user(&self, data: &RegistrationRequest) -> Option<Profile> {
        let token = self.token()?;
        match self.api.create_user(&token, data).await {
            Ok(user) => {
                self.cell.update(|s| s.users.push(user.clone()));
                Some(user)
            }
            Err(err) => {
                self.fail("Failed to create user", err);
                None
            }
        }
    }

    pub async fn update_user(&self, user_id: Uuid, data: &UpdateUserRequest) -> Option<Profile> {
        let token = self.token()?;
        match self.api.update_user(&token, user_id, data).await {
            Ok(user) => {
                self.cell.update(|s| {
                    if let Some(existing) = s.users.iter_mut().find(|u| u.id == user_id) {
                        *existing = user.clone();
                    }
                });
                Some(user)
            }
            Err(err) => {
                self.fail("Failed to update user", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoginRequest;
    use crate::testing::{backend_error, setup_client, token_json, user_json, uuid_str, MockTransport};
    use reqwest::Method;
    use serde_json::json;
    use std::rc::Rc;

    async fn signed_in() -> (UserManagementStore, Rc<MockTransport>) {
        let (client, transport, storage) = setup_client();
        let session = SessionStore::new(client.clone(), storage);
        transport.respond(Method::POST, "/auth/login", Ok(token_json("access", "refresh")));
        session
            .login(&LoginRequest { login: "admin".into(), password: "secret1".into() })
            .await
            .unwrap();
        (UserManagementStore::new(client, session), transport)
    }

    fn id(n: u32) -> Uuid {
        uuid_str(n).parse().unwrap()
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (client, transport, storage) = setup_client();
        let store = UserManagementStore::new(client.clone(), SessionStore::new(client, storage));

        assert!(!store.load_users().await);
        assert_eq!(store.state().error.as_deref(), Some(TOKEN_MISSING));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_load_and_toggle() {
        let (store, transport) = signed_in().await;
        transport.respond(
            Method::GET,
            "/users",
            Ok(json!([user_json(2, "anna", true), user_json(3, "boris", false)])),
        );
        transport.respond(Method::PATCH, &format!("/users/{}/activate", id(3)), Ok(json!(null)));

        assert!(store.load_users().await);
        assert_eq!(store.state().stats(), UserStats { total: 2, active: 1, inactive: 1 });

        assert!(store.toggle_user_status(id(3)).await);
        assert_eq!(store.state().stats().active, 2);
    }

    #[tokio::test]
    async fn test_toggle_unknown_user() {
        let (store, transport) = signed_in().await;
        let before = transport.requests().len();

        assert!(!store.toggle_user_status(id(42)).await);
        assert_eq!(store.state().error.as_deref(), Some(USER_NOT_FOUND));
        assert_eq!(transport.requests().len(), before);
    }

    #[tokio::test]
    async fn test_reset_password_returns_temporary() {
        let (store, transport) = signed_in().await;
        let path = format!("/users/{}/password", id(2));
        transport.respond(Method::PATCH, &path, Ok(json!(null)));

        let password = store.reset_password(id(2)).await.unwrap();

        assert_eq!(password.chars().count(), 8);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        let sent = transport.requests_to(&path);
        assert_eq!(sent[0].body, Some(json!({"newPassword": password})));
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_user() {
        let (store, transport) = signed_in().await;
        transport.respond(Method::GET, "/users", Ok(json!([user_json(2, "anna", true)])));
        transport.respond(Method::DELETE, &format!("/users/{}", id(2)), Err(backend_error(403, "Forbidden")));
        store.load_users().await;

        assert!(!store.delete_user(id(2)).await);

        let state = store.state();
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Forbidden"));
    }
}
