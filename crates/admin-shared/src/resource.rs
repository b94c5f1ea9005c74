//! Parameters and results of the generic resource operations

use serde_json::{Map, Value};

use crate::{errors::AdminError, id::RecordId};

/// Arbitrary filter key/values sent as query parameters
pub type Filter = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new<S: Into<String>>(field: S, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub pagination: Pagination,
    pub sort: Option<Sort>,
    pub filter: Filter,
}

impl ListParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            pagination: Pagination { page, per_page },
            ..Default::default()
        }
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn filter<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }
}

/// Lists the records of a resource that point at another record
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceParams {
    /// Field of the listed resource holding the referenced id
    pub target: String,
    pub id: RecordId,
    pub pagination: Pagination,
    pub sort: Option<Sort>,
}

impl ReferenceParams {
    pub fn new<S: Into<String>, I: Into<RecordId>>(target: S, id: I) -> Self {
        Self {
            target: target.into(),
            id: id.into(),
            pagination: Default::default(),
            sort: None,
        }
    }

    pub fn pagination(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = Pagination { page, per_page };
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// A page of records plus the number of records available
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListResponse {
    pub data: Vec<Value>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecordResponse {
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ManyResponse {
    pub data: Vec<Value>,
}

impl ListResponse {
    pub fn empty() -> Self {
        Self {
            data: vec![],
            total: 0,
        }
    }

    /// Deserializes each record into `T`
    pub fn records<T: serde::de::DeserializeOwned>(&self) -> Result<Vec<T>, AdminError> {
        decode_all(&self.data)
    }
}

impl RecordResponse {
    pub fn record<T: serde::de::DeserializeOwned>(&self) -> Result<T, AdminError> {
        decode(&self.data)
    }
}

impl ManyResponse {
    pub fn records<T: serde::de::DeserializeOwned>(&self) -> Result<Vec<T>, AdminError> {
        decode_all(&self.data)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, AdminError> {
    T::deserialize(value).map_err(|e| AdminError::InvalidResponse(e.to_string()))
}

fn decode_all<T: serde::de::DeserializeOwned>(values: &[Value]) -> Result<Vec<T>, AdminError> {
    values.iter().map(decode).collect()
}
