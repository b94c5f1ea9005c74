//! Translates the generic operations of an admin UI into calls against the
//! users REST API.
//!
//! The [`Client`] plays two roles:
//! - the session adapter (login, registration, permission and identity
//!   lookups, handling of rejected sessions)
//! - the resource adapter (list/get/create/update/delete of any resource, with
//!   resource specific mapping looked up in a [`StrategyTable`])
//!
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]

mod client;
mod configuration;

pub use client::{
    resources::{
        ResourceOperation, ResourceOutput, ResourceStrategy, RestStrategy, StrategyTable,
        UsersStrategy,
    },
    ApiResponse, Client, RequestSpec, UiCallBack,
};
pub use configuration::{get_configuration, get_configuration_from, ClientSettings, Environment};
