use std::sync::Arc;

use rbac_admin_core::{AppError, AppResult, EntityId};
use rbac_admin_domain::{DirectoryEntity, Role, User, UserDraft};

use super::{EntityPage, SubmitOutcome};
use crate::{
    EntityDirectory, Mutation, PaginationOptions, ValidationReport, VisibleSlice,
    check_role_option, normalized_user_draft, validate_user,
};

/// Open create or edit form for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEditSession {
    target: Option<EntityId>,
    draft: UserDraft,
    report: ValidationReport,
}

impl UserEditSession {
    /// Returns the identifier of the user being edited, if any.
    #[must_use]
    pub fn target(&self) -> Option<&EntityId> {
        self.target.as_ref()
    }

    /// Returns the form values.
    #[must_use]
    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    /// Returns the violations from the last rejected submission.
    #[must_use]
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }
}

/// Users screen: name search, role filter, and the user form.
pub struct UsersPage {
    page: EntityPage<User>,
    roles: Arc<dyn EntityDirectory<Role>>,
    role_options: Vec<String>,
    role_filter: Option<String>,
    session: Option<UserEditSession>,
}

impl UsersPage {
    /// Creates the page. Call [`UsersPage::mount`] to load users.
    #[must_use]
    pub fn new(
        users: Arc<dyn EntityDirectory<User>>,
        roles: Arc<dyn EntityDirectory<Role>>,
        options: PaginationOptions,
    ) -> Self {
        Self {
            page: EntityPage::new(users, options),
            roles,
            role_options: Vec::new(),
            role_filter: None,
            session: None,
        }
    }

    /// Fetches users.
    pub async fn mount(&mut self) -> AppResult<()> {
        self.page.refresh().await
    }

    /// Returns the shared page state.
    #[must_use]
    pub fn page(&self) -> &EntityPage<User> {
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

    /// Restricts the list to one role name. Blank clears the filter.
    pub fn set_role_filter(&mut self, role: Option<String>) {
        let role = role.filter(|value| !value.is_empty());
        if role != self.role_filter {
            self.role_filter = role;
            self.page.reset_page();
        }
    }

    /// Returns the active role filter.
    #[must_use]
    pub fn role_filter(&self) -> Option<&str> {
        self.role_filter.as_deref()
    }

    /// Distinct role names held by loaded users, in first-seen order.
    #[must_use]
    pub fn role_filter_options(&self) -> Vec<&str> {
        let mut options: Vec<&str> = Vec::new();
        for user in self.page.snapshot() {
            if !options.contains(&user.role.as_str()) {
                options.push(user.role.as_str());
            }
        }
        options
    }

    /// Derives the visible users for the current search, filter, and page.
    #[must_use]
    pub fn visible(&self) -> VisibleSlice<'_, User> {
        match self.role_filter.as_deref() {
            Some(role) => {
                let matches_role = |user: &User| user.role == role;
                self.page.visible_with(Some(&matches_role))
            }
            None => self.page.visible_with(None),
        }
    }

    /// Moves to a page of the filtered users.
    pub fn set_page(&mut self, page: usize) {
        match self.role_filter.clone() {
            Some(role) => {
                let matches_role = move |user: &User| user.role == role;
                self.page.set_page_with(page, Some(&matches_role));
            }
            None => self.page.set_page_with(page, None),
        }
    }

    /// Role names offered by the user form.
    #[must_use]
    pub fn role_options(&self) -> &[String] {
        self.role_options.as_slice()
    }

    /// Opens an empty user form and loads its role options.
    pub async fn begin_create(&mut self) -> AppResult<()> {
        self.session = Some(UserEditSession {
            target: None,
            draft: UserDraft::default(),
            report: ValidationReport::default(),
        });
        self.load_role_options().await
    }

    /// Opens the form pre-filled from a loaded user and loads role options.
    pub async fn begin_edit(&mut self, id: &EntityId) -> AppResult<()> {
        let user = self
            .page
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("user '{id}' is not loaded")))?;

        self.session = Some(UserEditSession {
            target: Some(user.id().clone()),
            draft: user.to_draft(),
            report: ValidationReport::default(),
        });
        self.load_role_options().await
    }

    /// Returns the open form, if any.
    #[must_use]
    pub fn session(&self) -> Option<&UserEditSession> {
        self.session.as_ref()
    }

    /// Returns the open form values for editing.
    pub fn draft_mut(&mut self) -> Option<&mut UserDraft> {
        self.session.as_mut().map(|session| &mut session.draft)
    }

    /// Closes the form without submitting.
    pub fn cancel_edit(&mut self) {
        self.session = None;
    }

    /// Validates the open form and, when valid, saves it and refetches.
    ///
    /// Uniqueness is checked against this page's last fetched users, and the
    /// role must be one of the names loaded when the form opened.
    pub async fn submit(&mut self) -> AppResult<SubmitOutcome<User, ValidationReport>> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| AppError::Validation("no user form is open".to_owned()))?;

        let mut report = validate_user(
            &session.draft,
            session.target.as_ref(),
            self.page.snapshot(),
        );
        check_role_option(&mut report, &session.draft.role, &self.role_options);
        if !report.is_valid() {
            session.report = report.clone();
            return Ok(SubmitOutcome::Rejected(report));
        }

        let draft = normalized_user_draft(&session.draft);
        let mutation = match &session.target {
            Some(id) => Mutation::Update {
                id: id.clone(),
                draft,
            },
            None => Mutation::Create(draft),
        };

        self.page
            .submit(mutation, &mut self.session)
            .await
            .map(SubmitOutcome::Saved)
    }

    /// Deletes a user and refetches.
    pub async fn delete(&mut self, id: EntityId) -> AppResult<()> {
        self.page.delete(id).await
    }

    async fn load_role_options(&mut self) -> AppResult<()> {
        match self.roles.list().await {
            Ok(roles) => {
                self.role_options = roles.into_iter().map(|role| role.name).collect();
                Ok(())
            }
            Err(error) => Err(self.page.record_fault(error)),
        }
    }
}
