//! The conventional REST mapping used for every resource without a dedicated
//! strategy

use admin_shared::{
    errors::AdminError,
    id::RecordId,
    resource::{Filter, ListResponse, Sort},
};
use serde_json::{json, Value};
use tracing::warn;

use super::{ResourceOperation, ResourceOutput, ResourceStrategy};
use crate::client::{ApiResponse, RequestSpec};

#[derive(Debug, Clone, Default)]
pub struct RestStrategy {
    authorized: bool,
}

impl RestStrategy {
    /// Same mapping but the session token is attached to every request
    pub fn with_bearer() -> Self {
        Self { authorized: true }
    }

    fn collection_path(resource: &str) -> String {
        format!("/{resource}")
    }

    fn record_path(resource: &str, id: &RecordId) -> String {
        format!("/{resource}/{id}")
    }
}

impl ResourceStrategy for RestStrategy {
    fn build_request(&self, resource: &str, op: &ResourceOperation) -> RequestSpec {
        use ResourceOperation as Op;
        let collection = Self::collection_path(resource);
        let spec = match op {
            Op::GetList(params) => {
                let spec = RequestSpec::get(collection)
                    .query_pair("pageNumber", params.pagination.page.to_string())
                    .query_pair("pageSize", params.pagination.per_page.to_string());
                add_filter(add_sort(spec, params.sort.as_ref()), &params.filter)
            }
            Op::GetOne { id } => RequestSpec::get(Self::record_path(resource, id)),
            Op::GetMany { ids } => ids.iter().fold(RequestSpec::get(collection), |spec, id| {
                spec.query_pair("id", id.as_str())
            }),
            Op::GetManyReference(params) => add_sort(RequestSpec::get(collection), params.sort.as_ref())
                .query_pair("page", params.pagination.page.to_string())
                .query_pair("perPage", params.pagination.per_page.to_string())
                .query_pair(params.target.as_str(), params.id.as_str()),
            Op::Create { data } => RequestSpec::post(collection).json(data.clone()),
            Op::Update { id, data, .. } => {
                RequestSpec::put(Self::record_path(resource, id)).json(data.clone())
            }
            Op::UpdateMany { ids, data } => RequestSpec::put(collection)
                .query_pair("filter", ids_filter(ids))
                .json(data.clone()),
            Op::Delete { id, .. } => RequestSpec::delete(Self::record_path(resource, id)),
            Op::DeleteMany { ids } => {
                RequestSpec::delete(collection).query_pair("filter", ids_filter(ids))
            }
        };
        if self.authorized {
            spec.with_bearer()
        } else {
            spec
        }
    }

    fn map_response(
        &self,
        op: &ResourceOperation,
        response: ApiResponse,
    ) -> Result<ResourceOutput, AdminError> {
        use ResourceOperation as Op;
        Ok(match op {
            Op::GetList(_) => {
                let total = total_of(&response);
                let data = match response.body {
                    Value::Object(mut map) => map.remove("data"),
                    _ => None,
                };
                let Some(Value::Array(data)) = data else {
                    return Err(AdminError::InvalidResponse(
                        "list response does not contain a data array".to_string(),
                    ));
                };
                ResourceOutput::List(ListResponse { data, total })
            }
            Op::GetManyReference(_) => {
                let total = total_of(&response);
                ResourceOutput::List(ListResponse {
                    data: records_of(response.body)?,
                    total,
                })
            }
            Op::Create { data } => ResourceOutput::Record(merge_id(data, &response.body)),
            Op::GetOne { .. } | Op::Update { .. } | Op::Delete { .. } => {
                ResourceOutput::Record(response.body)
            }
            Op::GetMany { .. } | Op::UpdateMany { .. } | Op::DeleteMany { .. } => {
                ResourceOutput::Many(records_of(response.body)?)
            }
        })
    }
}

fn add_sort(spec: RequestSpec, sort: Option<&Sort>) -> RequestSpec {
    match sort {
        Some(sort) => spec
            .query_pair("sort", sort.field.as_str())
            .query_pair("order", sort.order.to_string()),
        None => spec,
    }
}

/// Arrays are sent as repeated keys and nulls are left out
fn add_filter(spec: RequestSpec, filter: &Filter) -> RequestSpec {
    filter.iter().fold(spec, |spec, (key, value)| match value {
        Value::Null => spec,
        Value::Array(values) => values
            .iter()
            .filter(|v| !v.is_null())
            .fold(spec, |spec, v| spec.query_pair(key.as_str(), query_text(v))),
        other => spec.query_pair(key.as_str(), query_text(other)),
    })
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ids_filter(ids: &[RecordId]) -> String {
    json!({ "id": ids }).to_string()
}

/// Header first, then a `total` field in the body (number or numeric text)
fn total_of(response: &ApiResponse) -> u64 {
    if let Some(total) = response.total_count {
        return total;
    }
    match response.body.get("total") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Accepts a bare array, an object with a `data` array or an empty body
fn records_of(body: Value) -> Result<Vec<Value>, AdminError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(AdminError::InvalidResponse(
                "expected an array of records".to_string(),
            )),
        },
        _ => Err(AdminError::InvalidResponse(
            "expected an array of records".to_string(),
        )),
    }
}

/// The submitted record with the id assigned by the backend
pub(super) fn merge_id(data: &Value, body: &Value) -> Value {
    let mut record = match data {
        Value::Object(map) => map.clone(),
        _ => {
            warn!("created record is not an object, only the id is returned");
            Default::default()
        }
    };
    match body.get("id") {
        Some(id) if !id.is_null() => {
            record.insert("id".to_string(), id.clone());
        }
        _ => warn!("create response did not include an id"),
    }
    Value::Object(record)
}
