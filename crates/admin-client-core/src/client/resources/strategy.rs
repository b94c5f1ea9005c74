use std::{collections::HashMap, fmt::Debug, sync::Arc};

use admin_shared::{
    const_config::resource::RESOURCE_USERS,
    errors::AdminError,
    id::RecordId,
    resource::{ListParams, ListResponse, ManyResponse, RecordResponse, ReferenceParams},
    uac::UserRecord,
};
use serde_json::Value;

use super::{RestStrategy, UsersStrategy};
use crate::client::{ApiResponse, RequestSpec};

/// The generic operations the UI layer performs on any resource
#[derive(Clone, PartialEq)]
pub enum ResourceOperation {
    GetList(ListParams),
    GetOne {
        id: RecordId,
    },
    GetMany {
        ids: Vec<RecordId>,
    },
    GetManyReference(ReferenceParams),
    Create {
        data: Value,
    },
    Update {
        id: RecordId,
        data: Value,
        previous_data: Value,
    },
    UpdateMany {
        ids: Vec<RecordId>,
        data: Value,
    },
    /// `previous_data` is the record as last known by the caller
    Delete {
        id: RecordId,
        previous_data: Value,
    },
    DeleteMany {
        ids: Vec<RecordId>,
    },
}

impl ResourceOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetList(_) => "get_list",
            Self::GetOne { .. } => "get_one",
            Self::GetMany { .. } => "get_many",
            Self::GetManyReference(_) => "get_many_reference",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::UpdateMany { .. } => "update_many",
            Self::Delete { .. } => "delete",
            Self::DeleteMany { .. } => "delete_many",
        }
    }
}

impl Debug for ResourceOperation {
    /// Record contents are left out as they may hold anything (passwords included)
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct(self.name());
        match self {
            Self::GetList(params) => s.field("params", params),
            Self::GetManyReference(params) => s.field("params", params),
            Self::GetOne { id } | Self::Update { id, .. } | Self::Delete { id, .. } => {
                s.field("id", id)
            }
            Self::GetMany { ids } | Self::UpdateMany { ids, .. } | Self::DeleteMany { ids } => {
                s.field("ids", ids)
            }
            Self::Create { .. } => &mut s,
        };
        s.finish()
    }
}

/// What a strategy hands back to the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceOutput {
    List(ListResponse),
    Record(Value),
    Many(Vec<Value>),
}

impl ResourceOutput {
    fn kind(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Many(_) => "many",
        }
    }

    fn mismatch(&self, expected: &str) -> AdminError {
        AdminError::InvalidResponse(format!(
            "expected {expected} output but strategy produced {}",
            self.kind()
        ))
    }
}

impl TryFrom<ResourceOutput> for ListResponse {
    type Error = AdminError;

    fn try_from(value: ResourceOutput) -> Result<Self, Self::Error> {
        match value {
            ResourceOutput::List(list) => Ok(list),
            other => Err(other.mismatch("list")),
        }
    }
}

impl TryFrom<ResourceOutput> for RecordResponse {
    type Error = AdminError;

    fn try_from(value: ResourceOutput) -> Result<Self, Self::Error> {
        match value {
            ResourceOutput::Record(data) => Ok(Self { data }),
            other => Err(other.mismatch("record")),
        }
    }
}

impl TryFrom<ResourceOutput> for ManyResponse {
    type Error = AdminError;

    fn try_from(value: ResourceOutput) -> Result<Self, Self::Error> {
        match value {
            ResourceOutput::Many(data) => Ok(Self { data }),
            other => Err(other.mismatch("many")),
        }
    }
}

impl TryFrom<ResourceOutput> for UserRecord {
    type Error = AdminError;

    fn try_from(value: ResourceOutput) -> Result<Self, Self::Error> {
        RecordResponse::try_from(value)?.record()
    }
}

/// How the operations on one resource are turned into requests and how the
/// responses are turned back into [`ResourceOutput`]s
///
/// `map_response` is only called for successful (2xx) responses
pub trait ResourceStrategy: Debug + Send + Sync {
    fn build_request(&self, resource: &str, op: &ResourceOperation) -> RequestSpec;

    fn map_response(
        &self,
        op: &ResourceOperation,
        response: ApiResponse,
    ) -> Result<ResourceOutput, AdminError>;
}

/// Looks up the strategy for a resource by name, falling back to the default
#[derive(Debug, Clone)]
pub struct StrategyTable {
    default: Arc<dyn ResourceStrategy>,
    by_resource: HashMap<String, Arc<dyn ResourceStrategy>>,
}

impl StrategyTable {
    /// A table without any resource specific entries
    pub fn new(default: impl ResourceStrategy + 'static) -> Self {
        Self {
            default: Arc::new(default),
            by_resource: HashMap::new(),
        }
    }

    /// Replaces any strategy already registered for `resource`
    #[must_use]
    pub fn register(
        mut self,
        resource: impl Into<String>,
        strategy: impl ResourceStrategy + 'static,
    ) -> Self {
        self.by_resource.insert(resource.into(), Arc::new(strategy));
        self
    }

    pub fn get(&self, resource: &str) -> Arc<dyn ResourceStrategy> {
        self.by_resource
            .get(resource)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default))
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::new(RestStrategy::default()).register(RESOURCE_USERS, UsersStrategy::default())
    }
}
