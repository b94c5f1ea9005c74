//! Session adapter operations
//!
//! Only `login` and `register` talk to the backend, everything else is
//! answered from the session store

use admin_shared::{
    const_config::{
        client::CLIENT_LOGIN_REDIRECT,
        path::{PATH_AUTH_LOGIN, PATH_AUTH_REGISTER},
    },
    errors::{is_auth_rejection_status, AdminError},
    req_args::{LoginReqArgs, RegisterReqArgs},
    session::{Session, SessionKey},
    uac::{permissions_for_role, AuthResponse, Identity, Permissions, RegisterResponse},
};
use futures::channel::oneshot;
use reqwest::StatusCode;
use secrecy::ExposeSecret as _;
use tracing::{info, warn};

use super::{
    errors::{decode_error_response, registration_outcome, ErrorContext},
    extract_response, ready, send_result, RequestSpec,
};
use crate::{client::UiCallBack, Client};

const INVALID_AUTH_PAYLOAD: &str = "Server returned an invalid authentication payload";

impl Client {
    /// On success the session is replaced with the one returned by the backend
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<AuthResponse, AdminError>> {
        let (tx, rx) = oneshot::channel();
        let spec = RequestSpec::from(PATH_AUTH_LOGIN).json(serde_json::json!({
            "username": args.username,
            "password": args.password.expose_secret(),
        }));
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_login(resp, client).await;
            send_result(tx, msg);
            ui_notify();
        };

        self.initiate_request(spec, on_done);
        rx
    }

    /// Creates an account. The arguments are validated first and nothing is
    /// sent if they are not acceptable
    #[tracing::instrument(skip(ui_notify))]
    pub fn register<F: UiCallBack>(
        &self,
        args: RegisterReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<RegisterResponse, AdminError>> {
        if let Err(e) = args.validate() {
            info!(?e, "registration rejected before sending");
            return ready(Err(e.into()), ui_notify);
        }
        let (tx, rx) = oneshot::channel();
        let spec = RequestSpec::from(PATH_AUTH_REGISTER).json(args.to_request_body());
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_register(resp).await;
            send_result(tx, msg);
            ui_notify();
        };

        self.initiate_request(spec, on_done);
        rx
    }

    /// Clears every session key. Always succeeds
    #[tracing::instrument]
    pub fn logout(&self) {
        self.session.clear();
        info!("session cleared on logout");
    }

    /// Fails if there is no token or if the token says it has expired. Tokens
    /// whose expiry cannot be read are accepted
    #[tracing::instrument(err(Debug))]
    pub fn check_auth(&self) -> Result<(), AdminError> {
        let Some(token) = self.session.token() else {
            return Err(AdminError::AuthenticationRequired);
        };
        if token.is_expired() {
            warn!(expires_at = ?token.expires_at(), "session token expired, clearing session");
            self.session.clear();
            return Err(AdminError::SessionExpired);
        }
        Ok(())
    }

    #[tracing::instrument(ret, err(Debug))]
    pub fn get_permissions(&self) -> Result<Permissions, AdminError> {
        let role = self.session.get(SessionKey::Role).ok_or(AdminError::NoRole)?;
        Ok(permissions_for_role(&role))
    }

    #[tracing::instrument(ret, err(Debug))]
    pub fn get_identity(&self) -> Result<Identity, AdminError> {
        let (Some(id), Some(full_name)) = (
            self.session.get(SessionKey::UserId),
            self.session.get(SessionKey::Username),
        ) else {
            return Err(AdminError::IdentityNotFound);
        };
        Ok(Identity {
            id,
            full_name,
            role: self.session.get(SessionKey::Role),
        })
    }

    /// Decides what a failed operation means for the session
    ///
    /// Errors without a status and statuses other than 401 and 403 leave the
    /// session alone and return `Ok`
    #[tracing::instrument(err(Debug))]
    pub fn check_error(&self, error: &AdminError) -> Result<(), AdminError> {
        match error.status() {
            Some(status) => self.check_status(status),
            None => Ok(()),
        }
    }

    #[tracing::instrument(err(Debug))]
    pub fn check_status(&self, status: StatusCode) -> Result<(), AdminError> {
        if is_auth_rejection_status(status) {
            warn!(%status, "backend rejected session, clearing it");
            self.session.clear();
            Err(AdminError::ReauthenticationRequired {
                redirect_to: CLIENT_LOGIN_REDIRECT,
            })
        } else {
            Ok(())
        }
    }
}

#[tracing::instrument(skip(client), err(Debug))]
async fn process_login(
    response: reqwest::Result<reqwest::Response>,
    client: Client,
) -> Result<AuthResponse, AdminError> {
    let (response, status) = extract_response(response)?;
    if !status.is_success() {
        return Err(decode_error_response(ErrorContext::Login, response).await);
    }
    let auth: AuthResponse = response.json().await.map_err(|e| {
        warn!(?e, "failed to parse login response");
        AdminError::Authentication(INVALID_AUTH_PAYLOAD.to_string())
    })?;
    if auth.token.is_empty() {
        warn!("login response did not include a token");
        return Err(AdminError::Authentication(INVALID_AUTH_PAYLOAD.to_string()));
    }
    client.session.store_session(Session::from(&auth));
    info!(username = %auth.username, role = %auth.role, "logged in");
    Ok(auth)
}

#[tracing::instrument(ret, err(Debug))]
async fn process_register(
    response: reqwest::Result<reqwest::Response>,
) -> Result<RegisterResponse, AdminError> {
    let (response, status) = extract_response(response)?;
    if !status.is_success() {
        return Err(decode_error_response(ErrorContext::Registration, response).await);
    }
    let register: RegisterResponse = response.json().await.map_err(|e| {
        AdminError::Registration(format!("failed to parse registration response: {e}"))
    })?;
    registration_outcome(register)
}
