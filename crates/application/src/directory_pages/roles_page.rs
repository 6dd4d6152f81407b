use std::sync::Arc;

use rbac_admin_core::{AppError, AppResult, EntityId};
use rbac_admin_domain::{Permission, Role};

use super::EntityPage;
use crate::{
    EntityDirectory, MutationReceipt, PaginationOptions, PermissionCatalog, RoleEditor,
    VisibleSlice,
};

/// Roles screen: name search and the role editor with permission checkboxes.
pub struct RolesPage {
    page: EntityPage<Role>,
    catalog: PermissionCatalog,
    editor: Option<RoleEditor>,
}

impl RolesPage {
    /// Creates the page. Call [`RolesPage::mount`] to load roles.
    #[must_use]
    pub fn new(
        roles: Arc<dyn EntityDirectory<Role>>,
        permissions: Arc<dyn EntityDirectory<Permission>>,
        options: PaginationOptions,
    ) -> Self {
        Self {
            page: EntityPage::new(roles, options),
            catalog: PermissionCatalog::new(permissions),
            editor: None,
        }
    }

    /// Fetches roles.
    pub async fn mount(&mut self) -> AppResult<()> {
        self.page.refresh().await
    }

    /// Returns the shared page state.
    #[must_use]
    pub fn page(&self) -> &EntityPage<Role> {
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

    /// Derives the visible roles for the current search and page.
    #[must_use]
    pub fn visible(&self) -> VisibleSlice<'_, Role> {
        self.page.visible_with(None)
    }

    /// Moves to a page of the searched roles.
    pub fn set_page(&mut self, page: usize) {
        self.page.set_page_with(page, None);
    }

    /// Returns the permissions offered as checkboxes.
    #[must_use]
    pub fn catalog(&self) -> &[Permission] {
        self.catalog.permissions()
    }

    /// Opens an empty editor and loads the permission catalog.
    pub async fn begin_create(&mut self) -> AppResult<()> {
        self.editor = Some(RoleEditor::for_new());
        self.load_catalog().await
    }

    /// Opens the editor on a loaded role with its permissions pre-checked.
    pub async fn begin_edit(&mut self, id: &EntityId) -> AppResult<()> {
        let role = self
            .page
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("role '{id}' is not loaded")))?;

        self.editor = Some(RoleEditor::for_existing(role));
        self.load_catalog().await
    }

    /// Returns the open editor, if any.
    #[must_use]
    pub fn editor(&self) -> Option<&RoleEditor> {
        self.editor.as_ref()
    }

    /// Returns the open editor for changes.
    pub fn editor_mut(&mut self) -> Option<&mut RoleEditor> {
        self.editor.as_mut()
    }

    /// Flips one permission checkbox. Returns whether it is now checked.
    pub fn toggle_permission(&mut self, id: EntityId) -> AppResult<bool> {
        self.editor
            .as_mut()
            .map(|editor| editor.toggle(id))
            .ok_or_else(no_open_editor)
    }

    /// Closes the editor without saving.
    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    /// Saves the open editor and refetches roles.
    ///
    /// The catalog is reloaded first so that permissions deleted while the
    /// editor was open are dropped rather than persisted.
    pub async fn save(&mut self) -> AppResult<MutationReceipt<Role>> {
        if self.editor.is_none() {
            return Err(no_open_editor());
        }

        self.load_catalog().await?;

        let mutation = match self.editor.as_ref() {
            Some(editor) => editor.to_mutation(self.catalog.permissions()),
            None => return Err(no_open_editor()),
        };

        self.page.submit(mutation, &mut self.editor).await
    }

    /// Deletes a role and refetches. Users holding the role keep its name.
    pub async fn delete(&mut self, id: EntityId) -> AppResult<()> {
        self.page.delete(id).await
    }

    async fn load_catalog(&mut self) -> AppResult<()> {
        match self.catalog.load_all().await {
            Ok(_) => Ok(()),
            Err(error) => Err(self.page.record_fault(error)),
        }
    }
}

fn no_open_editor() -> AppError {
    AppError::Validation("no role editor is open".to_owned())
}
