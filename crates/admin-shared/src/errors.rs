use reqwest::StatusCode;

use crate::const_config::user::USER_MIN_PASSWORD_LENGTH;

/// Every failure the client can report to the UI layer
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Bad credentials or any other failed login
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Registration(String),
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Session has expired")]
    SessionExpired,
    #[error("No role found for the current session")]
    NoRole,
    #[error("User identity not found for the current session")]
    IdentityNotFound,
    /// The session has been cleared and the user needs to log in again
    #[error("Re-authentication required")]
    ReauthenticationRequired { redirect_to: &'static str },
    #[error("request failed with status code {status}: {message}")]
    Http { status: StatusCode, message: String },
    /// The backend answered successfully but flagged the operation as failed
    #[error("backend reported failure: {0}")]
    Backend(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("failed to send request: {0}")]
    Transport(String),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl AdminError {
    /// Returns the HTTP status this error carries if any
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the status means the session is no longer accepted
    /// by the backend (401 or 403)
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        self.status().is_some_and(is_auth_rejection_status)
    }

    /// Returns where the UI should navigate to if this error requests it
    #[must_use]
    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            Self::ReauthenticationRequired { redirect_to } => Some(*redirect_to),
            _ => None,
        }
    }
}

pub fn is_auth_rejection_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Problems with user supplied input detected before any request is sent
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("Password must be at least {} characters", USER_MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordsDoNotMatch,
}
