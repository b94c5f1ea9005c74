#![warn(unused_crate_dependencies)]

use admin_shared::{
    req_args::{LoginReqArgs, RegisterReqArgs},
    telemetry,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::ops::Deref;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

mod backend;

pub use backend::{start_backend, BackendState, RecordedRequest, StoredUser};

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        telemetry::init_tracing(subscriber_name, default_filter_level, file).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        telemetry::init_tracing(subscriber_name, default_filter_level, std::io::sink).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub struct TestApp<C> {
    /// Base url of the api, endpoint paths are appended to this
    pub address: String,
    pub backend: Arc<BackendState>,
    /// Has the `user` role
    pub test_user: TestUser,
    /// Has the `admin` role
    pub admin_user: TestUser,
    pub core_client: C,
}

impl<C> Debug for TestApp<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .field("test_user", &self.test_user)
            .field("admin_user", &self.admin_user)
            .finish()
    }
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

/// Starts a fresh backend seeded with the test users and builds the client
/// against it
pub async fn spawn_app<C, F>(build_client: F) -> TestApp<C>
where
    F: FnOnce(String) -> C,
{
    start_tracing();
    let backend = Arc::new(BackendState::default());
    let mut test_user = TestUser::generate("normal", "User");
    let mut admin_user = TestUser::generate("admin", "Admin");
    test_user.store(&backend);
    admin_user.store(&backend);

    let port = start_backend(Arc::clone(&backend)).expect("failed to start mock backend");
    let address = port_to_test_address(port);
    let core_client = build_client(address.clone());

    TestApp {
        address,
        backend,
        test_user,
        admin_user,
        core_client,
    }
}

pub fn port_to_test_address(port: u16) -> String {
    format!("http://127.0.0.1:{port}/api")
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

/// Builds a token in the `header.payload.signature` form with an `exp` claim.
/// The signature is not a real one
pub fn fake_signed_token(expires_at: DateTime<Utc>) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::json!({
        "sub": Uuid::new_v4().to_string(),
        "exp": expires_at.timestamp(),
    });
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{payload}.not-a-real-signature")
}

/// A token that expired an hour ago
pub fn fake_expired_token() -> String {
    fake_signed_token(Utc::now() - chrono::Duration::hours(1))
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub email: String,
    pub password: String,
    /// As the backend reports it (for example `Admin`)
    pub backend_role: String,
    /// Set once stored in a backend
    pub id: Option<u64>,
}

impl TestUser {
    pub fn generate(username_prefix: &str, backend_role: &str) -> Self {
        let username = format!("{username_prefix}-{}", &Uuid::new_v4().to_string()[..8]);
        Self {
            email: format!("{username}@example.com"),
            username,
            password: Uuid::new_v4().to_string(),
            backend_role: backend_role.to_string(),
            id: None,
        }
    }

    /// The role as the client reports it after normalization
    pub fn role(&self) -> String {
        self.backend_role.to_lowercase()
    }

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(self.username.clone(), self.password.clone().into())
    }

    pub fn register_args(&self) -> RegisterReqArgs {
        RegisterReqArgs::new(
            self.username.clone(),
            self.email.clone(),
            self.password.clone().into(),
        )
        .role(self.role())
    }

    pub fn store(&mut self, backend: &BackendState) {
        let id = backend.add_user(
            &self.username,
            &self.email,
            &self.password,
            &self.backend_role,
        );
        self.id = Some(id);
    }

    /// The id assigned by the backend as text
    pub fn id_text(&self) -> String {
        self.id.expect("test user not stored").to_string()
    }
}
