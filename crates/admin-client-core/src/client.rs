use admin_shared::{
    const_config::client::CLIENT_DEFAULT_API_URL, errors::AdminError, session::SessionStore,
};
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::{configuration::ClientSettings, StrategyTable};

mod auth;
mod errors;
mod request;
pub mod resources;
mod users;

pub use request::{ApiResponse, RequestSpec};

/// Entry point for everything the UI layer needs from the backend
///
/// Cloning is cheap and clones share the same session
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    inner: Arc<Mutex<ClientInner>>,
    session: SessionStore,
    strategies: Arc<StrategyTable>,
}

#[derive(Debug)]
struct ClientInner {
    server_address: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(CLIENT_DEFAULT_API_URL.to_string(), SessionStore::default())
    }
}

impl ClientInner {
    #[tracing::instrument]
    fn new(server_address: String) -> Self {
        Self {
            server_address: server_address.trim_end_matches('/').to_string(),
        }
    }
}

impl Client {
    /// `server_address` is the base url of the api that all paths are
    /// appended to (for example `https://localhost:7078/api`)
    #[tracing::instrument(name = "NEW ADMIN CLIENT-CORE")]
    pub fn new(server_address: String, session: SessionStore) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        Self {
            api_client,
            inner: Arc::new(Mutex::new(ClientInner::new(server_address))),
            session,
            strategies: Arc::new(StrategyTable::default()),
        }
    }

    pub fn from_settings(settings: &ClientSettings, session: SessionStore) -> Self {
        Self::new(settings.api_url.clone(), session)
    }

    /// Replaces the table used to look up how each resource is mapped
    #[must_use]
    pub fn with_strategies(mut self, strategies: StrategyTable) -> Self {
        self.strategies = Arc::new(strategies);
        self
    }

    /// The session shared with every clone of this client
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.token().is_some()
    }

    pub fn server_address(&self) -> String {
        self.lock_inner().server_address.clone()
    }

    #[tracing::instrument]
    pub fn set_server_address(&self, server_address: String) {
        *self.lock_inner() = ClientInner::new(server_address);
    }

    #[tracing::instrument(skip_all, fields(method = %spec.method, path = %spec.path))]
    // WARNING: Must skip the body as it may contain sensitive info
    fn initiate_request<F, O>(&self, spec: RequestSpec, on_done: F)
    where
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let mut request = self
            .api_client
            .request(spec.method, self.path_to_url(&spec.path));
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }
        if spec.authorized {
            // Read at call time so logins and logouts through other clones are seen
            match self.session.token() {
                Some(token) => request = request.bearer_auth(token.as_str()),
                None => info!("no token in session, sending request without authorization"),
            }
        }
        reqwest_cross::fetch(request, on_done)
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!("{}{path}", &self.lock_inner().server_address)
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, ClientInner> {
        self.inner.lock().expect("failed to unlock client mutex")
    }
}

/// Hands the result to the receiver. The caller may have stopped waiting
/// which is not an error
fn send_result<T>(tx: oneshot::Sender<Result<T, AdminError>>, msg: Result<T, AdminError>) {
    if tx.send(msg).is_err() {
        debug!("receiver dropped before the result was ready");
    }
}

/// Returns a receiver that already holds `msg`, used when a request is not
/// sent at all
fn ready<T, F: UiCallBack>(
    msg: Result<T, AdminError>,
    ui_notify: F,
) -> oneshot::Receiver<Result<T, AdminError>> {
    let (tx, rx) = oneshot::channel();
    send_result(tx, msg);
    ui_notify();
    rx
}

/// Provides a way to standardize the error message
#[tracing::instrument(err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> Result<(reqwest::Response, StatusCode), AdminError> {
    let response = response.map_err(|e| {
        warn!(?e, "failed to send request");
        AdminError::Transport(e.to_string())
    })?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
