//! API Errors
//!
//! Every failure coming out of the API layer goes through [`normalize`], so
//! callers only ever see an [`ApiError`] carrying a user-facing message.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::validate::ValidationError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Raw failure reported by a [`crate::api::Transport`]
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Non-2xx response, with the parsed error body when there was one
    Status { status: u16, body: Option<ErrorBody> },
    /// Request never completed (DNS, CORS, connection reset...)
    Network(String),
    /// Response body did not match the expected shape
    Decode(String),
}

/// Error body returned by the backend
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ErrorBody {
    /// Either a string or a list of strings (field validation failures)
    #[serde(default)]
    pub message: Option<Value>,
    /// Non-string codes are ignored so the message still gets through
    #[serde(default, deserialize_with = "de_lenient_code")]
    pub code: Option<ErrorCode>,
}

fn de_lenient_code<'de, D>(deserializer: D) -> Result<Option<ErrorCode>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code = match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::String(_)) => serde_json::from_value(value).ok(),
        _ => None,
    };
    Ok(code)
}

impl ErrorBody {
    pub fn message_text(&self) -> Option<String> {
        let text = match self.message.as_ref()? {
            Value::String(s) => s.clone(),
            Value::Array(parts) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
            _ => return None,
        };
        Some(text).filter(|t| !t.trim().is_empty())
    }
}

/// Business error codes understood by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidCredentials,
    UserInactive,
    LoginTaken,
    TokenInvalid,
    InvalidCurrentPassword,
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    /// Fallback classification for backends that only send a message
    pub fn from_message(message: &str) -> Option<Self> {
        const PATTERNS: &[(&str, ErrorCode)] = &[
            ("Invalid credentials", ErrorCode::InvalidCredentials),
            ("User not found or inactive", ErrorCode::UserInactive),
            ("already exists", ErrorCode::LoginTaken),
            ("Token is invalid or expired", ErrorCode::TokenInvalid),
            ("Invalid current password", ErrorCode::InvalidCurrentPassword),
        ];
        PATTERNS
            .iter()
            .find(|(needle, _)| message.contains(needle))
            .map(|(_, code)| *code)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Отсутствует токен авторизации")]
    MissingToken,
    /// Backend explained itself in the error body
    #[error("{message}")]
    Backend {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },
    /// Backend failed without a readable body
    #[error("{}", status_message(*.0))]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Fallback(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } | ApiError::Status(status) => Some(*status),
            _ => None,
        }
    }

    /// Typed code when the backend sent one, otherwise a guess from the message
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Backend { code: Some(code), .. } => Some(*code),
            ApiError::Validation(_) | ApiError::MissingToken => None,
            other => ErrorCode::from_message(&other.to_string()),
        }
    }
}

/// Localized message for a bare HTTP status
pub fn status_message(status: u16) -> String {
    match status {
        401 => "Необходима авторизация".to_string(),
        403 => "Доступ запрещен".to_string(),
        404 => "Ресурс не найден".to_string(),
        400 => "Неверные данные запроса".to_string(),
        500 => "Внутренняя ошибка сервера".to_string(),
        other => format!("Ошибка HTTP {}", other),
    }
}

/// Collapse a transport failure into the message the user will see.
///
/// Order: error body message, status mapping, plain error text, default.
pub fn normalize(raw: TransportError, default_message: &str) -> ApiError {
    log::error!("API error ({}): {:?}", default_message, raw);

    match raw {
        TransportError::Status { status, body } => {
            let body = body.unwrap_or_default();
            match body.message_text() {
                Some(message) => ApiError::Backend {
                    status,
                    code: body.code,
                    message,
                },
                None => ApiError::Status(status),
            }
        }
        TransportError::Network(message) | TransportError::Decode(message)
            if !message.trim().is_empty() =>
        {
            ApiError::Transport(message)
        }
        _ => ApiError::Fallback(default_message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Option<ErrorBody> {
        Some(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_body_message_wins_over_status() {
        let err = normalize(
            TransportError::Status { status: 401, body: body(json!({"message": "Invalid credentials"})) },
            "Ошибка авторизации",
        );
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.code(), Some(ErrorCode::InvalidCredentials));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (401, "Необходима авторизация"),
            (403, "Доступ запрещен"),
            (404, "Ресурс не найден"),
            (400, "Неверные данные запроса"),
            (500, "Внутренняя ошибка сервера"),
            (502, "Ошибка HTTP 502"),
        ];
        for (status, expected) in cases {
            let err = normalize(TransportError::Status { status, body: None }, "default");
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_empty_body_message_falls_back_to_status() {
        let err = normalize(
            TransportError::Status { status: 404, body: body(json!({"message": "  "})) },
            "default",
        );
        assert_eq!(err, ApiError::Status(404));
    }

    #[test]
    fn test_message_list_is_joined() {
        let err = normalize(
            TransportError::Status {
                status: 400,
                body: body(json!({"message": ["login too short", "password too short"]})),
            },
            "default",
        );
        assert_eq!(err.to_string(), "login too short; password too short");
    }

    #[test]
    fn test_plain_and_default_messages() {
        let err = normalize(TransportError::Network("connection refused".into()), "default");
        assert_eq!(err.to_string(), "connection refused");

        let err = normalize(TransportError::Network(String::new()), "Ошибка загрузки");
        assert_eq!(err, ApiError::Fallback("Ошибка загрузки".into()));
    }

    #[test]
    fn test_typed_code_beats_message() {
        let err = normalize(
            TransportError::Status {
                status: 409,
                body: body(json!({"message": "Логин занят", "code": "LOGIN_TAKEN"})),
            },
            "default",
        );
        assert_eq!(err.code(), Some(ErrorCode::LoginTaken));

        let unknown = normalize(
            TransportError::Status {
                status: 409,
                body: body(json!({"message": "Invalid credentials", "code": "SOMETHING_NEW"})),
            },
            "default",
        );
        assert_eq!(unknown.code(), Some(ErrorCode::Unknown));
    }

    #[test]
    fn test_numeric_code_keeps_message() {
        let err = normalize(
            TransportError::Status {
                status: 401,
                body: body(json!({"message": "Invalid credentials", "code": 40101})),
            },
            "default",
        );
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.code(), Some(ErrorCode::InvalidCredentials));
    }

    #[test]
    fn test_message_fallback_classification() {
        assert_eq!(
            ErrorCode::from_message("User with this login already exists"),
            Some(ErrorCode::LoginTaken)
        );
        assert_eq!(ErrorCode::from_message("Something broke"), None);
        assert_eq!(ApiError::MissingToken.code(), None);
    }
}
