//! Code shared by the admin client and its consumers

#![warn(unused_crate_dependencies)]

pub mod const_config;
pub mod errors;
pub mod id;
pub mod req_args;
pub mod resource;
pub mod session;
pub mod token;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
