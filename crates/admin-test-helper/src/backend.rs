//! In memory stand in for the users REST API
//!
//! Serves the auth endpoints plus a generic `/{resource}[/{id}]` collection
//! store, and records every request it receives so tests can assert on what
//! was actually sent

use std::{
    collections::{BTreeMap, HashSet},
    net::TcpListener,
    sync::{Arc, Mutex, MutexGuard},
};

use actix_web::{web, App, HttpServer};
use admin_shared::const_config::path::{
    PATH_AUTH_LOGIN, PATH_AUTH_REGISTER, PATH_AUTH_USER, PATH_AUTH_USERS,
};
use anyhow::Context;
use serde_json::Value;
use tracing::info;

mod routes;

/// A user as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password: String,
    /// Stored the way the backend reports them, e.g. `Admin`
    pub roles: Vec<String>,
}

/// A request as received by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct BackendState {
    inner: Mutex<BackendInner>,
}

#[derive(Debug, Default)]
struct BackendInner {
    last_id: u64,
    users: Vec<StoredUser>,
    issued_tokens: HashSet<String>,
    records: BTreeMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
}

impl BackendInner {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

impl BackendState {
    /// Adds a user that can log in, returns the id assigned
    pub fn add_user(&self, username: &str, email: &str, password: &str, role: &str) -> u64 {
        let mut guard = self.lock();
        let id = guard.next_id();
        guard.users.push(StoredUser {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            roles: vec![role.to_string()],
        });
        id
    }

    pub fn user(&self, id: u64) -> Option<StoredUser> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn user_by_name(&self, username: &str) -> Option<StoredUser> {
        self.lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Adds records to `resource` assigning each an `id`, returns the stored
    /// records
    pub fn seed_records(&self, resource: &str, records: Vec<Value>) -> Vec<Value> {
        let mut guard = self.lock();
        let mut result = Vec::with_capacity(records.len());
        for mut record in records {
            let id = guard.next_id();
            if let Value::Object(map) = &mut record {
                map.insert("id".to_string(), id.into());
            }
            result.push(record.clone());
            guard
                .records
                .entry(resource.to_string())
                .or_default()
                .push(record);
        }
        result
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        self.lock()
            .records
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    /// Every request received so far in the order received
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BackendInner> {
        self.inner.lock().expect("backend mutex poisoned")
    }
}

/// Starts the backend on a random port on the current tokio runtime and
/// returns the port
pub fn start_backend(state: Arc<BackendState>) -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("failed to bind to random port")?;
    let port = listener
        .local_addr()
        .context("failed to get local address of listener")?
        .port();
    info!(?port, "Port assigned to the mock backend is {port}");

    let state = web::Data::from(state);
    let server = HttpServer::new(move || {
        App::new()
            .service(
                web::scope("/api")
                    .route(PATH_AUTH_LOGIN.path, web::post().to(routes::login))
                    .route(PATH_AUTH_REGISTER.path, web::post().to(routes::register))
                    .route(PATH_AUTH_USERS.path, web::get().to(routes::list_users))
                    .service(
                        web::resource(PATH_AUTH_USER.path_with("{id}"))
                            .route(web::get().to(routes::get_user))
                            .route(web::put().to(routes::update_user))
                            .route(web::delete().to(routes::delete_user)),
                    )
                    .service(
                        web::resource("/{resource}")
                            .route(web::get().to(routes::list_records))
                            .route(web::post().to(routes::create_record))
                            .route(web::put().to(routes::update_records))
                            .route(web::delete().to(routes::delete_records)),
                    )
                    .service(
                        web::resource("/{resource}/{id}")
                            .route(web::get().to(routes::get_record))
                            .route(web::put().to(routes::update_record))
                            .route(web::delete().to(routes::delete_record)),
                    ),
            )
            .app_data(state.clone())
    })
    .workers(1)
    .listen(listener)
    .context("Failed to bind HTTP Server to listener")?
    .run();
    tokio::spawn(server);
    Ok(port)
}
