use serde::{Deserialize, Deserializer, Serialize};

use crate::{const_config::user::USER_DEFAULT_ROLE, id::RecordId};

use super::RoleName;

/// A user as presented to the UI layer
///
/// This is the only shape of a user that leaves the client, see
/// [`BackendUser`] for what the backend sends
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub role: RoleName,
}

/// A user as returned by the backend's user endpoints
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: RecordId,
    #[serde(default, alias = "username", deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

/// The backend sends `null` for empty strings and collections
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Body sent to the backend when updating a user, only the fields set are
/// changed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct UserUpdatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleName>,
}

/// Who is logged in, built from the session without any network call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub full_name: String,
    pub role: Option<String>,
}

impl From<BackendUser> for UserRecord {
    /// Only the first role is kept (lower cased) and users without roles are
    /// treated as the default role
    fn from(value: BackendUser) -> Self {
        let role = value
            .roles
            .first()
            .map(|role| role.to_lowercase())
            .unwrap_or_else(|| USER_DEFAULT_ROLE.to_string());
        Self {
            id: value.id,
            username: value.user_name,
            email: value.email,
            role: role.into(),
        }
    }
}

impl From<&UserRecord> for UserUpdatePayload {
    fn from(value: &UserRecord) -> Self {
        Self {
            user_name: Some(value.username.clone()),
            email: Some(value.email.clone()),
            role: Some(value.role.clone()),
        }
    }
}
