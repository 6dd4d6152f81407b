use std::sync::Arc;

use rbac_admin_core::{AppError, AppResult, EntityId};
use rbac_admin_domain::{Permission, PermissionDraft};

use super::{EntityPage, SubmitOutcome};
use crate::{
    EntityDirectory, Mutation, PaginationOptions, PermissionNameViolation, VisibleSlice,
    check_new_permission_name,
};

/// In-place rename of one permission row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRename {
    /// Identifier of the renamed permission.
    pub id: EntityId,
    /// Edited name.
    pub name: String,
}

/// Permissions screen: name search, add form, and inline rename.
pub struct PermissionsPage {
    page: EntityPage<Permission>,
    adding: Option<String>,
    renaming: Option<PermissionRename>,
}

impl PermissionsPage {
    /// Creates the page. Call [`PermissionsPage::mount`] to load permissions.
    #[must_use]
    pub fn new(permissions: Arc<dyn EntityDirectory<Permission>>, options: PaginationOptions) -> Self {
        Self {
            page: EntityPage::new(permissions, options),
            adding: None,
            renaming: None,
        }
    }

    /// Fetches permissions.
    pub async fn mount(&mut self) -> AppResult<()> {
        self.page.refresh().await
    }

    /// Returns the shared page state.
    #[must_use]
    pub fn page(&self) -> &EntityPage<Permission> {
        &self.page
    }

    /// Replaces the name search text.
    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.page.set_search_text(search_text);
    }

    /// Selects a page size from the configured options.
    pub fn set_page_size(&mut self, page_size: usize) -> AppResult<()> {
        self.page.set_page_size(page_size)
    }

    /// Derives the visible permissions for the current search and page.
    #[must_use]
    pub fn visible(&self) -> VisibleSlice<'_, Permission> {
        self.page.visible_with(None)
    }

    /// Moves to a page of the searched permissions.
    pub fn set_page(&mut self, page: usize) {
        self.page.set_page_with(page, None);
    }

    /// Opens the add form with an empty name.
    pub fn begin_add(&mut self) {
        self.adding = Some(String::new());
    }

    /// Returns the pending new name, if the add form is open.
    #[must_use]
    pub fn new_name(&self) -> Option<&str> {
        self.adding.as_deref()
    }

    /// Returns the pending new name for editing.
    pub fn new_name_mut(&mut self) -> Option<&mut String> {
        self.adding.as_mut()
    }

    /// Closes the add form.
    pub fn cancel_add(&mut self) {
        self.adding = None;
    }

    /// Checks the new name locally, then creates the permission and refetches.
    pub async fn submit_add(
        &mut self,
    ) -> AppResult<SubmitOutcome<Permission, PermissionNameViolation>> {
        let candidate = self
            .adding
            .as_deref()
            .ok_or_else(|| AppError::Validation("no permission form is open".to_owned()))?;

        let draft = match check_new_permission_name(self.page.snapshot(), candidate) {
            Ok(draft) => draft,
            Err(violation) => return Ok(SubmitOutcome::Rejected(violation)),
        };

        self.page
            .submit(Mutation::Create(draft), &mut self.adding)
            .await
            .map(SubmitOutcome::Saved)
    }

    /// Starts renaming a loaded permission.
    pub fn begin_rename(&mut self, id: &EntityId) -> AppResult<()> {
        let permission = self
            .page
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("permission '{id}' is not loaded")))?;

        self.renaming = Some(PermissionRename {
            id: permission.id.clone(),
            name: permission.name.clone(),
        });
        Ok(())
    }

    /// Returns the rename in progress, if any.
    #[must_use]
    pub fn renaming(&self) -> Option<&PermissionRename> {
        self.renaming.as_ref()
    }

    /// Returns the edited name of the rename in progress.
    pub fn rename_name_mut(&mut self) -> Option<&mut String> {
        self.renaming.as_mut().map(|rename| &mut rename.name)
    }

    /// Sends the rename as a full replacement and refetches.
    ///
    /// Renamed names are not checked for uniqueness.
    pub async fn submit_rename(&mut self) -> AppResult<()> {
        let rename = self
            .renaming
            .as_ref()
            .ok_or_else(|| AppError::Validation("no permission rename is open".to_owned()))?;

        let mutation = Mutation::Update {
            id: rename.id.clone(),
            draft: PermissionDraft {
                name: rename.name.clone(),
            },
        };

        self.page
            .submit(mutation, &mut self.renaming)
            .await
            .map(|_| ())
    }

    /// Abandons the rename in progress.
    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    /// Deletes a permission and refetches. Roles embedding it keep their copy.
    pub async fn delete(&mut self, id: EntityId) -> AppResult<()> {
        self.page.delete(id).await
    }
}
