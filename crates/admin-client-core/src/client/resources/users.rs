//! The users resource is served by the auth endpoints which use their own
//! shapes and require the session token

use admin_shared::{
    const_config::{
        path::{PATH_AUTH_REGISTER, PATH_AUTH_USER, PATH_AUTH_USERS},
        user::USER_DEFAULT_ROLE,
    },
    errors::AdminError,
    id::RecordId,
    resource::ListResponse,
    uac::{BackendUser, Envelope, RegisterResponse, RoleName, UserRecord, UserUpdatePayload},
};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{ResourceOperation, ResourceOutput, ResourceStrategy, RestStrategy};
use crate::client::{errors::registration_outcome, ApiResponse, RequestSpec};

/// Operations without a dedicated endpoint use `fallback`
#[derive(Debug, Clone, Default)]
pub struct UsersStrategy {
    fallback: RestStrategy,
}

impl ResourceStrategy for UsersStrategy {
    fn build_request(&self, resource: &str, op: &ResourceOperation) -> RequestSpec {
        use ResourceOperation as Op;
        let spec = match op {
            Op::GetList(params) => RequestSpec::from(PATH_AUTH_USERS)
                .query_pair("pageNumber", params.pagination.page.to_string())
                .query_pair("pageSize", params.pagination.per_page.to_string()),
            Op::GetOne { id } => RequestSpec::get(PATH_AUTH_USER.path_with(id)),
            Op::Create { data } => RequestSpec::from(PATH_AUTH_REGISTER).json(create_body(data)),
            Op::Update { id, data, .. } => {
                RequestSpec::put(PATH_AUTH_USER.path_with(id)).json(update_body(data))
            }
            Op::Delete { id, .. } => RequestSpec::delete(PATH_AUTH_USER.path_with(id)),
            Op::GetMany { .. }
            | Op::GetManyReference(_)
            | Op::UpdateMany { .. }
            | Op::DeleteMany { .. } => return self.fallback.build_request(resource, op),
        };
        spec.with_bearer()
    }

    fn map_response(
        &self,
        op: &ResourceOperation,
        response: ApiResponse,
    ) -> Result<ResourceOutput, AdminError> {
        use ResourceOperation as Op;
        match op {
            Op::GetList(_) => map_list(response.body),
            Op::GetOne { id } => map_one(id, response.body),
            Op::Create { data } => map_created(data, response.body),
            // The backend's answer is not merged back, the caller's data is trusted
            Op::Update { data, .. } => Ok(ResourceOutput::Record(data.clone())),
            Op::Delete { previous_data, .. } => Ok(ResourceOutput::Record(previous_data.clone())),
            Op::GetMany { .. }
            | Op::GetManyReference(_)
            | Op::UpdateMany { .. }
            | Op::DeleteMany { .. } => self.fallback.map_response(op, response),
        }
    }
}

fn text_field<'a>(data: &'a Value, field: &str) -> Option<&'a str> {
    data.get(field).and_then(Value::as_str)
}

/// Same role rule as registration, an absent or empty role is the default role
fn role_or_default(data: &Value) -> &str {
    text_field(data, "role")
        .filter(|role| !role.is_empty())
        .unwrap_or(USER_DEFAULT_ROLE)
}

fn create_body(data: &Value) -> Value {
    let mut body = data.clone();
    if let Some(fields) = body.as_object_mut() {
        fields.insert("role".to_string(), json!(role_or_default(data)));
    }
    body
}

/// Only the fields present in `data` are sent
fn update_body(data: &Value) -> Value {
    let payload = UserUpdatePayload {
        user_name: text_field(data, "username").map(str::to_string),
        email: text_field(data, "email").map(str::to_string),
        role: text_field(data, "role").map(RoleName::from),
    };
    json!(payload)
}

fn parse<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, AdminError> {
    serde_json::from_value(body).map_err(|e| AdminError::InvalidResponse(e.to_string()))
}

fn to_value(user: UserRecord) -> Result<Value, AdminError> {
    serde_json::to_value(user).map_err(|e| AdminError::InvalidResponse(e.to_string()))
}

/// NB: The backend does not report how many users exist so the total is the
/// number of users on this page. Pagination controls will think this is the
/// last page whenever a page is full.
fn map_list(body: Value) -> Result<ResourceOutput, AdminError> {
    let envelope: Envelope<Vec<BackendUser>> = parse(body)?;
    let Some(users) = envelope.into_result() else {
        info!("users list not successful, returning an empty list");
        return Ok(ResourceOutput::List(ListResponse::empty()));
    };
    let data = users
        .into_iter()
        .map(|user| to_value(user.into()))
        .collect::<Result<Vec<_>, _>>()?;
    let total = data.len() as u64;
    Ok(ResourceOutput::List(ListResponse { data, total }))
}

fn map_one(id: &RecordId, body: Value) -> Result<ResourceOutput, AdminError> {
    let envelope: Envelope<BackendUser> = parse(body)?;
    let message = envelope.message.clone();
    match envelope.into_result() {
        Some(user) => Ok(ResourceOutput::Record(to_value(user.into())?)),
        None => {
            warn!(%id, ?message, "backend did not return the user");
            Err(AdminError::Backend(
                message.unwrap_or_else(|| format!("user {id} not found")),
            ))
        }
    }
}

/// The password is never echoed back
fn map_created(data: &Value, body: Value) -> Result<ResourceOutput, AdminError> {
    let response = registration_outcome(parse::<RegisterResponse>(body)?)?;
    let id = response.id.unwrap_or_else(|| {
        warn!("registration response did not include an id");
        RecordId::default()
    });
    let text = |field: &str| text_field(data, field).unwrap_or_default().to_string();
    let user = UserRecord {
        id,
        username: text("username"),
        email: text("email"),
        role: role_or_default(data).into(),
    };
    Ok(ResourceOutput::Record(to_value(user)?))
}
