//! Auth and user-management models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::{min_chars, Validate, ValidationError};

/// Account as returned by `/auth/profile` and `/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub login: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// "First Last", whichever half exists, then the login
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().filter(|s| !s.is_empty());
        let last = self.last_name.as_deref().filter(|s| !s.is_empty());
        match (first, last) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) if !self.login.is_empty() => self.login.clone(),
            (None, None) => "Неизвестный пользователь".to_string(),
        }
    }

    pub fn initials(&self) -> String {
        let first = self.first_name.as_deref().and_then(|s| s.chars().next());
        let last = self.last_name.as_deref().and_then(|s| s.chars().next());
        let raw: String = match (first, last) {
            (Some(f), Some(l)) => [f, l].iter().collect(),
            (Some(c), None) | (None, Some(c)) => c.to_string(),
            (None, None) if !self.login.is_empty() => self.login.chars().take(2).collect(),
            (None, None) => "NN".to_string(),
        };
        raw.to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        min_chars("login", &self.login, 3, "Логин должен содержать не менее 3 символов")?;
        min_chars("password", &self.password, 6, "Пароль должен содержать не менее 6 символов")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub login: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Validate for RegistrationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        min_chars("login", &self.login, 3, "Логин должен содержать не менее 3 символов")?;
        min_chars("password", &self.password, 6, "Пароль должен содержать не менее 6 символов")
    }
}

/// Token pair issued by login and refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAuth {
    pub access_token: String,
    pub refresh_token: String,
    /// Refresh responses may omit the profile
    #[serde(default)]
    pub user: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl Validate for RefreshRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        min_chars("refreshToken", &self.refresh_token, 20, "Токен обновления обязателен")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(first) = &self.first_name {
            min_chars("firstName", first, 2, "Имя должно содержать минимум 2 символа")?;
        }
        if let Some(last) = &self.last_name {
            min_chars("lastName", last, 2, "Фамилия должна содержать минимум 2 символа")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        min_chars("oldPassword", &self.old_password, 1, "Введите текущий пароль")?;
        min_chars("newPassword", &self.new_password, 6, "Пароль должен содержать не менее 6 символов")
    }
}

/// Admin-side user update; every field optional
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(role) = &self.role {
            min_chars("role", role, 1, "Роль не может быть пустой")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub new_password: String,
}

impl Validate for SetPasswordRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        min_chars("newPassword", &self.new_password, 6, "Пароль должен содержать не менее 6 символов")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_profile(first: Option<&str>, last: Option<&str>, login: &str) -> Profile {
        Profile {
            id: Uuid::nil(),
            login: login.to_string(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            role: "user".to_string(),
            is_active: true,
            last_login_at: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(make_profile(Some("Анна"), Some("Петрова"), "apetrova").display_name(), "Анна Петрова");
        assert_eq!(make_profile(Some("Анна"), None, "apetrova").display_name(), "Анна");
        assert_eq!(make_profile(None, Some("Петрова"), "apetrova").display_name(), "Петрова");
        assert_eq!(make_profile(None, None, "apetrova").display_name(), "apetrova");
        assert_eq!(make_profile(None, None, "").display_name(), "Неизвестный пользователь");
    }

    #[test]
    fn test_initials() {
        assert_eq!(make_profile(Some("анна"), Some("петрова"), "x").initials(), "АП");
        assert_eq!(make_profile(Some("bob"), None, "x").initials(), "B");
        assert_eq!(make_profile(None, None, "jdoe").initials(), "JD");
        assert_eq!(make_profile(None, None, "").initials(), "NN");
    }

    #[test]
    fn test_login_validation() {
        let ok = LoginRequest { login: "admin".into(), password: "secret1".into() };
        assert!(ok.validate().is_ok());

        let short_login = LoginRequest { login: "ad".into(), password: "secret1".into() };
        assert_eq!(short_login.validate().unwrap_err().field, "login");

        let short_password = LoginRequest { login: "admin".into(), password: "123".into() };
        assert_eq!(short_password.validate().unwrap_err().field, "password");
    }

    #[test]
    fn test_update_profile_validation_skips_missing_fields() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
        let bad = UpdateProfileRequest { first_name: Some("A".into()), last_name: None };
        assert_eq!(bad.validate().unwrap_err().field, "firstName");
    }

    #[test]
    fn test_profile_wire_format() {
        let json = serde_json::json!({
            "id": "7f1c2a52-7f1e-4a0c-9a52-000000000001",
            "login": "admin",
            "role": "admin",
            "isActive": true,
            "lastLoginAt": null,
            "createdAt": "2025-01-10T09:00:00Z",
            "updatedAt": "2025-01-11T09:00:00Z"
        });
        let profile: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.login, "admin");
        assert!(profile.first_name.is_none());
        assert!(profile.is_active);
    }
}
