//! This module stores the expected format of the arguments for the auth
//! requests. Some structs are not serializable because they hold secrets that
//! must be exposed explicitly when the request body is built

use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

use crate::{
    const_config::user::{USER_DEFAULT_ROLE, USER_MIN_PASSWORD_LENGTH},
    errors::ValidationError,
};

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub username: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(username: S, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(mut self, username: String) -> Self {
        self.username = username;
        self
    }

    pub fn password(mut self, password: SecretString) -> Self {
        self.password = password;
        self
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("username", &self.username)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

/// Arguments for creating a new account
///
/// `role` defaults to [`USER_DEFAULT_ROLE`] when not set and
/// `password_confirmation` is only checked when provided
#[derive(serde::Deserialize, Clone)]
pub struct RegisterReqArgs {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirmation: Option<SecretString>,
    pub role: Option<String>,
}

impl RegisterReqArgs {
    pub fn new<S: Into<String>, E: Into<String>>(
        username: S,
        email: E,
        password: SecretString,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password,
            password_confirmation: None,
            role: None,
        }
    }

    pub fn role<S: Into<String>>(mut self, role: S) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn password_confirmation(mut self, password_confirmation: SecretString) -> Self {
        self.password_confirmation = Some(password_confirmation);
        self
    }

    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or(USER_DEFAULT_ROLE)
    }

    /// Checks the fields the same way the registration and user creation
    /// forms do
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::UsernameRequired);
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        let password = self.password.expose_secret();
        if password.chars().count() < USER_MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        if let Some(confirmation) = &self.password_confirmation {
            if confirmation.expose_secret() != password {
                return Err(ValidationError::PasswordsDoNotMatch);
            }
        }
        Ok(())
    }

    /// The JSON body expected by the registration endpoint
    pub fn to_request_body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "email": self.email,
            "password": self.password.expose_secret(),
            "role": self.role_or_default(),
        })
    }
}

impl Debug for RegisterReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterReqArgs")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .field("role", &self.role)
            .finish()
    }
}

fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
