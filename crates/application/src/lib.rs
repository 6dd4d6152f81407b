//! Application services and ports.

#![forbid(unsafe_code)]

mod collection_view;
mod directory_pages;
mod directory_ports;
mod mutation_orchestrator;
mod permission_catalog;
mod role_assignment;
mod user_validation;

#[cfg(test)]
mod test_support;

pub use collection_view::{
    CollectionView, PageRequest, PaginationOptions, VisibleSlice, apply, page_count,
};
pub use directory_pages::{
    EntityPage, PermissionRename, PermissionsPage, RolesPage, SubmitOutcome, UserEditSession,
    UsersPage, fault_message,
};
pub use directory_ports::{EntityDirectory, Mutation, MutationReceipt};
pub use mutation_orchestrator::{MutationOrchestrator, MutationPhase, SettledMutation};
pub use permission_catalog::{
    PermissionCatalog, PermissionNameViolation, check_new_permission_name,
};
pub use role_assignment::{Reconciliation, RoleEditor, reconcile_permissions};
pub use user_validation::{
    UserField, UserViolation, ValidationReport, check_role_option, normalized_user_draft,
    validate_user,
};
