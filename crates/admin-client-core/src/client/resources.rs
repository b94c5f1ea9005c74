//! Resource adapter operations
//!
//! Every operation is dispatched through the [`StrategyTable`] so resources
//! that do not follow the usual REST conventions only differ in their
//! strategy

use admin_shared::{
    errors::AdminError,
    id::RecordId,
    resource::{ListParams, ListResponse, ManyResponse, RecordResponse, ReferenceParams},
};
use futures::channel::oneshot;
use serde_json::Value;
use std::sync::Arc;

use super::{
    errors::{decode_error_response, ErrorContext},
    extract_response, send_result, ApiResponse,
};
use crate::{client::UiCallBack, Client};

mod rest;
mod strategy;
mod users;

pub use rest::RestStrategy;
pub use strategy::{ResourceOperation, ResourceOutput, ResourceStrategy, StrategyTable};
pub use users::UsersStrategy;

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn get_list<F: UiCallBack>(
        &self,
        resource: &str,
        params: ListParams,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<ListResponse, AdminError>> {
        self.send_resource_request(resource, ResourceOperation::GetList(params), ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_one<F: UiCallBack>(
        &self,
        resource: &str,
        id: RecordId,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<RecordResponse, AdminError>> {
        self.send_resource_request(resource, ResourceOperation::GetOne { id }, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_many<F: UiCallBack>(
        &self,
        resource: &str,
        ids: Vec<RecordId>,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<ManyResponse, AdminError>> {
        self.send_resource_request(resource, ResourceOperation::GetMany { ids }, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn get_many_reference<F: UiCallBack>(
        &self,
        resource: &str,
        params: ReferenceParams,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<ListResponse, AdminError>> {
        self.send_resource_request(
            resource,
            ResourceOperation::GetManyReference(params),
            ui_notify,
        )
    }

    #[tracing::instrument(skip(data, ui_notify))]
    pub fn create<F: UiCallBack>(
        &self,
        resource: &str,
        data: Value,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<RecordResponse, AdminError>> {
        self.send_resource_request(resource, ResourceOperation::Create { data }, ui_notify)
    }

    /// `previous_data` is the record as the caller last saw it
    #[tracing::instrument(skip(data, previous_data, ui_notify))]
    pub fn update<F: UiCallBack>(
        &self,
        resource: &str,
        id: RecordId,
        data: Value,
        previous_data: Value,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<RecordResponse, AdminError>> {
        self.send_resource_request(
            resource,
            ResourceOperation::Update {
                id,
                data,
                previous_data,
            },
            ui_notify,
        )
    }

    #[tracing::instrument(skip(data, ui_notify))]
    pub fn update_many<F: UiCallBack>(
        &self,
        resource: &str,
        ids: Vec<RecordId>,
        data: Value,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<ManyResponse, AdminError>> {
        self.send_resource_request(resource, ResourceOperation::UpdateMany { ids, data }, ui_notify)
    }

    #[tracing::instrument(skip(previous_data, ui_notify))]
    pub fn delete<F: UiCallBack>(
        &self,
        resource: &str,
        id: RecordId,
        previous_data: Value,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<RecordResponse, AdminError>> {
        self.send_resource_request(
            resource,
            ResourceOperation::Delete { id, previous_data },
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_many<F: UiCallBack>(
        &self,
        resource: &str,
        ids: Vec<RecordId>,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<ManyResponse, AdminError>> {
        self.send_resource_request(resource, ResourceOperation::DeleteMany { ids }, ui_notify)
    }

    /// Sends `op` using the strategy registered for `resource` and converts
    /// the output into what the caller expects
    #[tracing::instrument(skip(self, ui_notify))]
    pub(crate) fn send_resource_request<T, F>(
        &self,
        resource: &str,
        op: ResourceOperation,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<T, AdminError>>
    where
        T: TryFrom<ResourceOutput, Error = AdminError> + Send + 'static,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let strategy = self.strategies.get(resource);
        let spec = strategy.build_request(resource, &op);
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_resource(resp, strategy, op)
                .await
                .and_then(T::try_from);
            send_result(tx, msg);
            ui_notify();
        };

        self.initiate_request(spec, on_done);
        rx
    }
}

#[tracing::instrument(skip(strategy), err(Debug))]
async fn process_resource(
    response: reqwest::Result<reqwest::Response>,
    strategy: Arc<dyn ResourceStrategy>,
    op: ResourceOperation,
) -> Result<ResourceOutput, AdminError> {
    let (response, status) = extract_response(response)?;
    if !status.is_success() {
        return Err(decode_error_response(ErrorContext::Resource, response).await);
    }
    let response = ApiResponse::read(response).await?;
    strategy.map_response(&op, response)
}
