//! Directory entities and invariants.

#![forbid(unsafe_code)]

mod entity;
mod permission;
mod role;
mod user;

pub use entity::DirectoryEntity;
pub use permission::{Permission, PermissionDraft};
pub use role::{NO_PERMISSIONS_SUMMARY, Role, RoleDraft};
pub use user::{User, UserDraft, UserStatus, is_plausible_email};
