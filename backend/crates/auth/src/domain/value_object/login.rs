//! Login Value Object
//!
//! 3 to 10 characters from `[a-zA-Z0-9_-]`.

use std::sync::LazyLock;

use kernel::error::app_error::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const LOGIN_MIN_LENGTH: usize = 3;
pub const LOGIN_MAX_LENGTH: usize = 10;

pub static LOGIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").unwrap_or_else(|_| unreachable!()));

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Login(String);

impl Login {
    pub fn new(login: impl Into<String>) -> AppResult<Self> {
        let login = login.into().trim().to_string();
        let len = login.chars().count();

        if !(LOGIN_MIN_LENGTH..=LOGIN_MAX_LENGTH).contains(&len) {
            return Err(AppError::bad_request(format!(
                "Login must be from {} to {} characters",
                LOGIN_MIN_LENGTH, LOGIN_MAX_LENGTH
            )));
        }
        if !LOGIN_PATTERN.is_match(&login) {
            return Err(AppError::bad_request("Login contains invalid characters"));
        }

        Ok(Self(login))
    }

    pub fn from_db(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
