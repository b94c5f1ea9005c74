//! Shared items related to user account control

mod permissions;
mod responses;
mod role;
mod user;

pub use permissions::{permissions_for_role, role_permissions_table, Permission, Permissions};
pub use responses::{AuthResponse, Envelope, RegisterResponse};
pub use role::{RoleChoice, RoleName};
pub use user::{BackendUser, Identity, UserRecord, UserUpdatePayload};
