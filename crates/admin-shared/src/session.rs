//! The locally persisted proof of authentication
//!
//! A [`SessionStore`] is created once by the host process, optionally filled
//! from disk with [`SessionStore::load`], and handed to everything that needs
//! to read or change the session. Values are read at the time they are needed
//! and never cached so a login or logout through any clone is observed by all
//! the others.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    path::Path,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use strum::IntoEnumIterator;
use tracing::info;

use crate::{token::AuthToken, uac::AuthResponse};

/// The keys stored for a session, serialized using their storage names
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum SessionKey {
    #[serde(rename = "token")]
    #[strum(serialize = "token")]
    Token,
    #[serde(rename = "userId")]
    #[strum(serialize = "userId")]
    UserId,
    #[serde(rename = "username")]
    #[strum(serialize = "username")]
    Username,
    #[serde(rename = "role")]
    #[strum(serialize = "role")]
    Role,
}

impl SessionKey {
    pub fn storage_name(self) -> &'static str {
        self.into()
    }
}

/// A complete session as created by a successful login
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub role: String,
}

impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &!self.token.is_empty())
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

impl From<&AuthResponse> for Session {
    fn from(value: &AuthResponse) -> Self {
        Self {
            token: value.token.clone(),
            user_id: value.id.to_string(),
            username: value.username.clone(),
            role: value.role.clone(),
        }
    }
}

type SessionMap = BTreeMap<SessionKey, String>;

/// Shared handle to the session values
///
/// Empty values are treated the same as missing ones
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionMap>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SessionKey) -> Option<String> {
        self.lock()
            .get(&key)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    pub fn set(&self, key: SessionKey, value: impl Into<String>) {
        self.lock().insert(key, value.into());
    }

    pub fn remove(&self, key: SessionKey) {
        self.lock().remove(&key);
    }

    /// Removes all the session keys
    pub fn clear(&self) {
        let mut guard = self.lock();
        for key in SessionKey::iter() {
            guard.remove(&key);
        }
    }

    /// Replaces all the session values, any prior session is overwritten
    pub fn store_session(&self, session: Session) {
        let mut guard = self.lock();
        guard.insert(SessionKey::Token, session.token);
        guard.insert(SessionKey::UserId, session.user_id);
        guard.insert(SessionKey::Username, session.username);
        guard.insert(SessionKey::Role, session.role);
    }

    /// Returns the session if all its values are present
    pub fn session(&self) -> Option<Session> {
        Some(Session {
            token: self.get(SessionKey::Token)?,
            user_id: self.get(SessionKey::UserId)?,
            username: self.get(SessionKey::Username)?,
            role: self.get(SessionKey::Role)?,
        })
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.get(SessionKey::Token).map(AuthToken::from)
    }

    /// Returns `true` if none of the keys are set
    pub fn is_empty(&self) -> bool {
        SessionKey::iter().all(|key| self.get(key).is_none())
    }

    /// Loads the session values from a RON file. A missing file results in an
    /// empty store
    #[tracing::instrument(err(Debug))]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("no session file found, starting with an empty session");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session file: {path:?}"))?;
        let map: SessionMap =
            ron::from_str(&contents).context("failed to deserialize session from ron")?;
        Ok(Self {
            inner: Arc::new(Mutex::new(map)),
        })
    }

    /// Writes the current session values to a RON file
    #[tracing::instrument(err(Debug))]
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = {
            let guard = self.lock();
            ron::ser::to_string_pretty(&*guard, ron::ser::PrettyConfig::default())
                .context("failed to serialize session to ron")?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create folder for session: {parent:?}"))?;
        }
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write session file: {path:?}"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionMap> {
        self.inner.lock().expect("session mutex poisoned")
    }
}

impl Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.lock();
        f.debug_struct("SessionStore")
            .field("has_token", &guard.contains_key(&SessionKey::Token))
            .field("user_id", &guard.get(&SessionKey::UserId))
            .field("username", &guard.get(&SessionKey::Username))
            .field("role", &guard.get(&SessionKey::Role))
            .finish()
    }
}
