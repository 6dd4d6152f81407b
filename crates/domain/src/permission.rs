use rbac_admin_core::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

use crate::DirectoryEntity;

/// A grantable permission as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Backend-assigned identifier.
    pub id: EntityId,
    /// Permission name.
    pub name: String,
}

impl Permission {
    /// Creates a permission record with a numeric identifier.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::Number(id),
            name: name.into(),
        }
    }
}

/// Permission payload submitted on create and rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDraft {
    /// Permission name.
    pub name: String,
}

impl DirectoryEntity for Permission {
    type Draft = PermissionDraft;

    const KIND: EntityKind = EntityKind::Permission;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn to_draft(&self) -> PermissionDraft {
        PermissionDraft {
            name: self.name.clone(),
        }
    }

    fn from_draft(id: EntityId, draft: PermissionDraft) -> Self {
        Self {
            id,
            name: draft.name,
        }
    }
}
