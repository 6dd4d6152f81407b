//! Role editing: permission checkbox selection and its resolution into the
//! persisted `permissions` field.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use rbac_admin_core::EntityId;
use rbac_admin_domain::{Permission, Role, RoleDraft};

use crate::Mutation;

/// Selected permissions resolved against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Full records for every selected identifier found in the catalog.
    pub permissions: Vec<Permission>,
    /// Selected identifiers with no catalog entry. These are not persisted.
    pub dropped: Vec<EntityId>,
}

/// Resolves a selection of permission identifiers into full catalog records.
///
/// Output follows catalog order and lists each identifier at most once.
/// Identifiers missing from the catalog land in `dropped`.
#[must_use]
pub fn reconcile_permissions(
    selection: &BTreeSet<EntityId>,
    catalog: &[Permission],
) -> Reconciliation {
    let mut emitted: HashSet<&EntityId> = HashSet::with_capacity(selection.len());
    let permissions: Vec<Permission> = catalog
        .iter()
        .filter(|permission| selection.contains(&permission.id) && emitted.insert(&permission.id))
        .cloned()
        .collect();

    let dropped = selection
        .iter()
        .filter(|id| !emitted.contains(id))
        .cloned()
        .collect();

    Reconciliation {
        permissions,
        dropped,
    }
}

/// Transient edit state for creating or updating one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEditor {
    target: Option<EntityId>,
    name: String,
    selection: BTreeSet<EntityId>,
}

impl RoleEditor {
    /// Starts a new role with no name and an empty selection.
    #[must_use]
    pub fn for_new() -> Self {
        Self {
            target: None,
            name: String::new(),
            selection: BTreeSet::new(),
        }
    }

    /// Starts editing an existing role, selecting its current permissions.
    #[must_use]
    pub fn for_existing(role: &Role) -> Self {
        Self {
            target: Some(role.id.clone()),
            name: role.name.clone(),
            selection: role.permission_ids(),
        }
    }

    /// Returns the identifier of the role being edited, if any.
    #[must_use]
    pub fn target(&self) -> Option<&EntityId> {
        self.target.as_ref()
    }

    /// Returns the edited role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Replaces the edited role name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the selected permission identifiers.
    #[must_use]
    pub fn selection(&self) -> &BTreeSet<EntityId> {
        &self.selection
    }

    /// Flips membership of a permission. Returns `true` when it is now selected.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.selection.remove(&id) {
            false
        } else {
            self.selection.insert(id);
            true
        }
    }

    /// Resolves the selection against the catalog into a role draft.
    ///
    /// The draft's permissions replace the stored set wholesale.
    #[must_use]
    pub fn to_draft(&self, catalog: &[Permission]) -> RoleDraft {
        let reconciliation = reconcile_permissions(&self.selection, catalog);
        if !reconciliation.dropped.is_empty() {
            debug!(
                role = %self.name,
                dropped = reconciliation.dropped.len(),
                "dropping selected permissions missing from catalog"
            );
        }

        RoleDraft {
            name: self.name.clone(),
            permissions: reconciliation.permissions,
        }
    }

    /// Builds the create or update mutation for this edit.
    #[must_use]
    pub fn to_mutation(&self, catalog: &[Permission]) -> Mutation<Role> {
        let draft = self.to_draft(catalog);
        match &self.target {
            Some(id) => Mutation::Update {
                id: id.clone(),
                draft,
            },
            None => Mutation::Create(draft),
        }
    }
}
