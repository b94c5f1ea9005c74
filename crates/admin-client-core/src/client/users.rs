//! Typed wrappers around the resource operations on users

use admin_shared::{
    const_config::resource::RESOURCE_USERS, errors::AdminError, id::RecordId,
    req_args::RegisterReqArgs, uac::UserRecord,
};
use futures::channel::oneshot;
use secrecy::ExposeSecret as _;
use serde_json::Value;

use super::{ready, resources::ResourceOperation};
use crate::{client::UiCallBack, Client};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn get_user<F: UiCallBack>(
        &self,
        id: RecordId,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<UserRecord, AdminError>> {
        self.send_resource_request(RESOURCE_USERS, ResourceOperation::GetOne { id }, ui_notify)
    }

    /// Validates the arguments the same way [`Client::register`] does before
    /// creating the user with the current session's authorization
    #[tracing::instrument(skip(ui_notify))]
    pub fn create_user<F: UiCallBack>(
        &self,
        args: RegisterReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<UserRecord, AdminError>> {
        if let Err(e) = args.validate() {
            return ready(Err(e.into()), ui_notify);
        }
        let data = serde_json::json!({
            "username": args.username,
            "email": args.email,
            "password": args.password.expose_secret(),
            "role": args.role_or_default(),
        });
        self.send_resource_request(RESOURCE_USERS, ResourceOperation::Create { data }, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn update_user<F: UiCallBack>(
        &self,
        user: &UserRecord,
        previous: &UserRecord,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<UserRecord, AdminError>> {
        let op = ResourceOperation::Update {
            id: user.id.clone(),
            data: user_value(user),
            previous_data: user_value(previous),
        };
        self.send_resource_request(RESOURCE_USERS, op, ui_notify)
    }

    /// Resolves to `user` once the backend has removed it
    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_user<F: UiCallBack>(
        &self,
        user: &UserRecord,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<UserRecord, AdminError>> {
        let op = ResourceOperation::Delete {
            id: user.id.clone(),
            previous_data: user_value(user),
        };
        self.send_resource_request(RESOURCE_USERS, op, ui_notify)
    }
}

fn user_value(user: &UserRecord) -> Value {
    serde_json::json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "role": user.role,
    })
}
