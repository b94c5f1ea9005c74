use base64::{
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, Utc};

/// The bearer token handed out by the backend on login
///
/// The token is opaque to the client except that a signed token in the usual
/// `header.payload.signature` form may carry an `exp` claim (seconds since
/// the epoch) in its payload, which is used to detect stale sessions locally.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

#[derive(serde::Deserialize)]
struct ExpiryClaim {
    exp: Option<f64>,
}

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the expiry embedded in the token
    ///
    /// Returns `None` if the token does not have the expected shape, cannot be
    /// decoded or does not carry a numeric `exp` claim
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.0.split('.').nth(1)?;
        let payload = payload.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .ok()?;
        let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
        let exp = claim.exp?;
        if !exp.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis((exp * 1000.0) as i64)
    }

    /// Returns `true` only if an expiry could be read and it is before `now`.
    /// Tokens that cannot be inspected are never considered expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("len", &self.0.len())
            .field("expires_at", &self.expires_at())
            .finish()
    }
}
