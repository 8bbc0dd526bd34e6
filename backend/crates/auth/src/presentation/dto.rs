//! API DTOs (Data Transfer Objects)
//!
//! Request bodies are read as raw JSON and checked field by field so that
//! every failure is reported in `errorsMessages`.

use kernel::extract::JsonBody;
use kernel::pagination::search_term;
use kernel::validation::Validator;
use platform::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use serde::{Deserialize, Serialize};

use crate::application::{LoginInput, NewUserInput};
use crate::domain::entity::{device_session::DeviceSession, user::User};
use crate::domain::repository::UserFilter;
use crate::domain::value_object::email::EMAIL_PATTERN;
use crate::domain::value_object::login::{LOGIN_MAX_LENGTH, LOGIN_MIN_LENGTH, LOGIN_PATTERN};
use crate::error::AuthResult;

// ============================================================================
// Requests
// ============================================================================

/// `{loginOrEmail, password}`
pub fn parse_login(body: &JsonBody) -> AuthResult<LoginInput> {
    let mut v = Validator::new();
    let login_or_email = v
        .field("loginOrEmail", body.get("loginOrEmail"))
        .string()
        .trim()
        .not_empty()
        .done();
    let password = v
        .field("password", body.get("password"))
        .string()
        .length(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)
        .done();
    v.finish()?;

    Ok(LoginInput {
        login_or_email: login_or_email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}

/// `{login, password, email}` for registration and admin user creation
pub fn parse_new_user(body: &JsonBody) -> AuthResult<NewUserInput> {
    let mut v = Validator::new();
    let login = v
        .field("login", body.get("login"))
        .string()
        .trim()
        .length(LOGIN_MIN_LENGTH, LOGIN_MAX_LENGTH)
        .matches(&LOGIN_PATTERN)
        .done();
    let password = v
        .field("password", body.get("password"))
        .string()
        .length(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)
        .done();
    let email = v
        .field("email", body.get("email"))
        .string()
        .trim()
        .matches(&EMAIL_PATTERN)
        .done();
    v.finish()?;

    Ok(NewUserInput {
        login: login.unwrap_or_default(),
        email: email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}

/// `{code}`
pub fn parse_confirmation_code(body: &JsonBody) -> AuthResult<String> {
    let mut v = Validator::new();
    let code = v
        .field("code", body.get("code"))
        .string()
        .trim()
        .not_empty()
        .done();
    v.finish()?;
    Ok(code.unwrap_or_default())
}

/// `{email}`
pub fn parse_email(body: &JsonBody) -> AuthResult<String> {
    let mut v = Validator::new();
    let email = v
        .field("email", body.get("email"))
        .string()
        .trim()
        .matches(&EMAIL_PATTERN)
        .done();
    v.finish()?;
    Ok(email.unwrap_or_default())
}

pub struct NewPasswordRequest {
    pub new_password: String,
    pub recovery_code: String,
}

/// `{newPassword, recoveryCode}`
pub fn parse_new_password(body: &JsonBody) -> AuthResult<NewPasswordRequest> {
    let mut v = Validator::new();
    let new_password = v
        .field("newPassword", body.get("newPassword"))
        .string()
        .length(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)
        .done();
    let recovery_code = v
        .field("recoveryCode", body.get("recoveryCode"))
        .string()
        .trim()
        .not_empty()
        .done();
    v.finish()?;

    Ok(NewPasswordRequest {
        new_password: new_password.unwrap_or_default(),
        recovery_code: recovery_code.unwrap_or_default(),
    })
}

/// `?searchLoginTerm=&searchEmailTerm=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchParams {
    pub search_login_term: Option<String>,
    pub search_email_term: Option<String>,
}

impl From<UserSearchParams> for UserFilter {
    fn from(params: UserSearchParams) -> Self {
        UserFilter {
            search_login_term: search_term(params.search_login_term.as_deref()),
            search_email_term: search_term(params.search_email_term.as_deref()),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub email: String,
    pub login: String,
    pub user_id: String,
}

impl From<&User> for MeResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.to_string(),
            login: user.login.to_string(),
            user_id: user.id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub login: String,
    pub email: String,
    #[serde(with = "kernel::time::iso")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            login: user.login.to_string(),
            email: user.email.to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceView {
    pub ip: String,
    pub title: String,
    #[serde(with = "kernel::time::iso")]
    pub last_active_date: chrono::DateTime<chrono::Utc>,
    pub device_id: String,
}

impl From<DeviceSession> for DeviceView {
    fn from(session: DeviceSession) -> Self {
        Self {
            ip: session.ip,
            title: session.title,
            last_active_date: session.last_active_date,
            device_id: session.device_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> JsonBody {
        JsonBody(value)
    }

    fn fields(err: crate::error::AuthError) -> Vec<String> {
        err.into_app_error()
            .field_errors()
            .iter()
            .map(|e| e.field.clone())
            .collect()
    }

    #[test]
    fn test_parse_new_user_valid() {
        let input = parse_new_user(&body(json!({
            "login": " alice ",
            "password": "qwerty1",
            "email": "alice@example.com"
        })))
        .unwrap();
        assert_eq!(input.login, "alice");
    }

    #[test]
    fn test_parse_new_user_reports_all_fields_in_order() {
        let err = parse_new_user(&body(json!({
            "login": "a b",
            "password": 123,
            "email": "nope"
        })))
        .err()
        .unwrap();
        assert_eq!(fields(err), vec!["login", "password", "email"]);
    }

    #[test]
    fn test_parse_login_requires_fields() {
        let err = parse_login(&body(json!({"loginOrEmail": "   "}))).err().unwrap();
        assert_eq!(fields(err), vec!["loginOrEmail", "password"]);
    }

    #[test]
    fn test_parse_new_password() {
        let err = parse_new_password(&body(json!({"newPassword": "12", "recoveryCode": "x"})))
            .err()
            .unwrap();
        assert_eq!(fields(err), vec!["newPassword"]);
    }

    #[test]
    fn test_blank_search_terms_are_dropped() {
        let filter: UserFilter = UserSearchParams {
            search_login_term: Some("  ".to_string()),
            search_email_term: Some("ex".to_string()),
        }
        .into();
        assert!(filter.search_login_term.is_none());
        assert_eq!(filter.search_email_term.as_deref(), Some("ex"));
    }

    #[test]
    fn test_device_view_shape() {
        let session = DeviceSession::start(
            kernel::id::UserId::new(),
            "1.1.1.1",
            "Firefox",
            chrono::DateTime::parse_from_rfc3339("2026-01-01T10:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
            chrono::Duration::seconds(20),
        );
        let json = serde_json::to_value(DeviceView::from(session)).unwrap();
        assert_eq!(json["lastActiveDate"], "2026-01-01T10:00:00.000Z");
        assert_eq!(json["title"], "Firefox");
        assert_eq!(json["deviceId"].as_str().unwrap().len(), 24);
    }
}
