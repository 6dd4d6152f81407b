use std::collections::BTreeSet;

use rbac_admin_core::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

use crate::{DirectoryEntity, Permission};

/// Summary shown for a role without any attached permissions.
pub const NO_PERMISSIONS_SUMMARY: &str = "No permissions assigned";

/// A role with its permission snapshots, as stored in the directory.
///
/// Permissions are denormalized copies taken at save time, not live
/// references into the permission catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Backend-assigned identifier.
    pub id: EntityId,
    /// Role name.
    pub name: String,
    /// Attached permission snapshots.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    /// Returns the identifiers of the attached permissions.
    #[must_use]
    pub fn permission_ids(&self) -> BTreeSet<EntityId> {
        self.permissions
            .iter()
            .map(|permission| permission.id.clone())
            .collect()
    }

    /// Returns the attached permission names joined for table display.
    #[must_use]
    pub fn permission_summary(&self) -> String {
        if self.permissions.is_empty() {
            return NO_PERMISSIONS_SUMMARY.to_owned();
        }

        self.permissions
            .iter()
            .map(|permission| permission.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Role payload submitted on create and full replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    /// Role name.
    pub name: String,
    /// Fully resolved permission records.
    pub permissions: Vec<Permission>,
}

impl DirectoryEntity for Role {
    type Draft = RoleDraft;

    const KIND: EntityKind = EntityKind::Role;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn to_draft(&self) -> RoleDraft {
        RoleDraft {
            name: self.name.clone(),
            permissions: self.permissions.clone(),
        }
    }

    fn from_draft(id: EntityId, draft: RoleDraft) -> Self {
        Self {
            id,
            name: draft.name,
            permissions: draft.permissions,
        }
    }
}
