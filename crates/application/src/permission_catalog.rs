use std::sync::Arc;

use tracing::debug;

use rbac_admin_core::AppResult;
use rbac_admin_domain::{Permission, PermissionDraft};

use crate::EntityDirectory;

/// Client-side rejection of a new permission name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionNameViolation {
    /// The trimmed name is empty.
    PermissionNameRequired,
    /// A loaded permission already uses this name.
    PermissionNameTaken,
}

impl PermissionNameViolation {
    /// Returns the operator-facing message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionNameRequired => "Permission name is required",
            Self::PermissionNameTaken => "Permission name is already in use",
        }
    }
}

/// Checks a new permission name against the loaded permissions.
///
/// Returns the trimmed draft to submit. Comparison is exact and case-sensitive.
pub fn check_new_permission_name(
    existing: &[Permission],
    candidate: &str,
) -> Result<PermissionDraft, PermissionNameViolation> {
    let name = candidate.trim();
    if name.is_empty() {
        return Err(PermissionNameViolation::PermissionNameRequired);
    }

    if existing.iter().any(|permission| permission.name == name) {
        return Err(PermissionNameViolation::PermissionNameTaken);
    }

    Ok(PermissionDraft {
        name: name.to_owned(),
    })
}

/// The full set of permissions known to the role editor.
///
/// Ordering is whatever the backend returned; no dedup or sort is applied.
#[derive(Clone)]
pub struct PermissionCatalog {
    directory: Arc<dyn EntityDirectory<Permission>>,
    permissions: Vec<Permission>,
}

impl PermissionCatalog {
    /// Creates an empty catalog backed by the permission directory.
    #[must_use]
    pub fn new(directory: Arc<dyn EntityDirectory<Permission>>) -> Self {
        Self {
            directory,
            permissions: Vec::new(),
        }
    }

    /// Replaces the catalog with the backend's current permissions.
    ///
    /// On failure the previously loaded catalog is kept.
    pub async fn load_all(&mut self) -> AppResult<&[Permission]> {
        let permissions = self.directory.list().await?;
        debug!(count = permissions.len(), "permission catalog loaded");
        self.permissions = permissions;
        Ok(self.permissions.as_slice())
    }

    /// Returns the loaded permissions.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        self.permissions.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use rbac_admin_domain::Permission;

    use super::{PermissionNameViolation, check_new_permission_name};

    fn catalog() -> Vec<Permission> {
        vec![Permission::new(1, "read"), Permission::new(2, "write")]
    }

    #[test]
    fn new_name_is_trimmed() {
        let draft = check_new_permission_name(&catalog(), "  delete ");
        assert_eq!(draft.map(|draft| draft.name), Ok("delete".to_owned()));
    }

    #[test]
    fn blank_name_is_required() {
        assert_eq!(
            check_new_permission_name(&catalog(), "   "),
            Err(PermissionNameViolation::PermissionNameRequired)
        );
    }

    #[test]
    fn existing_name_is_taken_after_trimming() {
        assert_eq!(
            check_new_permission_name(&catalog(), " read "),
            Err(PermissionNameViolation::PermissionNameTaken)
        );
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        assert!(check_new_permission_name(&catalog(), "Read").is_ok());
    }
}
