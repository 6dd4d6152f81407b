//! Page view-models for the users, roles, and permissions screens.
//!
//! Each page privately holds the snapshot from its own last fetch. There is no
//! cross-page cache, so two pages showing the same kind may disagree until
//! each refetches.

mod permissions_page;
mod roles_page;
mod users_page;

use std::sync::Arc;

use tracing::warn;

use rbac_admin_core::{AppError, AppResult, DirectoryOperation, EntityId};
use rbac_admin_domain::DirectoryEntity;

use crate::{
    CollectionView, EntityDirectory, Mutation, MutationOrchestrator, MutationPhase,
    MutationReceipt, PaginationOptions, VisibleSlice,
};

pub use permissions_page::{PermissionRename, PermissionsPage};
pub use roles_page::RolesPage;
pub use users_page::{UserEditSession, UsersPage};

/// Outcome of submitting an edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<E, V> {
    /// The mutation was applied. The page fault is set if the refetch failed.
    Saved(MutationReceipt<E>),
    /// Local checks blocked the submission. No request was issued.
    Rejected(V),
}

/// Returns the single operator-facing message for a failed page action.
#[must_use]
pub fn fault_message(error: &AppError) -> String {
    match error {
        AppError::Directory(fault) => match fault.operation {
            DirectoryOperation::List => format!(
                "Failed to load {}. Please refresh.",
                fault.entity_kind.plural()
            ),
            DirectoryOperation::Create | DirectoryOperation::Update => format!(
                "Failed to save {}. Please try again.",
                fault.entity_kind.as_str()
            ),
            DirectoryOperation::Delete => format!(
                "Failed to delete {}. Please try again.",
                fault.entity_kind.as_str()
            ),
        },
        other => other.to_string(),
    }
}

/// Snapshot, view state, and mutation flow shared by every page.
pub struct EntityPage<E: DirectoryEntity> {
    directory: Arc<dyn EntityDirectory<E>>,
    orchestrator: MutationOrchestrator<E>,
    snapshot: Vec<E>,
    view: CollectionView,
    fault: Option<String>,
}

impl<E: DirectoryEntity> EntityPage<E> {
    /// Creates an empty page. Call [`EntityPage::refresh`] to load it.
    #[must_use]
    pub fn new(directory: Arc<dyn EntityDirectory<E>>, options: PaginationOptions) -> Self {
        Self {
            orchestrator: MutationOrchestrator::new(directory.clone()),
            directory,
            snapshot: Vec::new(),
            view: CollectionView::new(options),
            fault: None,
        }
    }

    /// Fetches the collection and returns to the first page.
    ///
    /// On failure the previous snapshot stays in place and the fault message
    /// is recorded.
    pub async fn refresh(&mut self) -> AppResult<()> {
        match self.directory.list().await {
            Ok(records) => {
                self.snapshot = records;
                self.view.reset_page();
                self.fault = None;
                Ok(())
            }
            Err(error) => Err(self.record_fault(error)),
        }
    }

    /// Returns the records from the last successful fetch.
    #[must_use]
    pub fn snapshot(&self) -> &[E] {
        self.snapshot.as_slice()
    }

    /// Finds a record in the snapshot.
    #[must_use]
    pub fn find(&self, id: &EntityId) -> Option<&E> {
        self.snapshot.iter().find(|record| record.id() == id)
    }

    /// Returns the search and paging state.
    #[must_use]
    pub fn view(&self) -> &CollectionView {
        &self.view
    }

    /// Returns the mutation phase for this kind.
    #[must_use]
    pub fn phase(&self) -> MutationPhase {
        self.orchestrator.phase()
    }

    /// Returns the message of the last failed action, if any.
    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Replaces the name search text.
    pub fn set_search_text(&mut self, search_text: impl Into<String>) {
        self.view.set_search_text(search_text);
    }

    /// Selects a page size from the configured options.
    pub fn set_page_size(&mut self, page_size: usize) -> AppResult<()> {
        self.view.set_page_size(page_size)
    }

    /// Returns to the first page after a filter changed.
    pub fn reset_page(&mut self) {
        self.view.reset_page();
    }

    /// Derives the visible slice, searching by name.
    #[must_use]
    pub fn visible_with(&self, extra_predicate: Option<&dyn Fn(&E) -> bool>) -> VisibleSlice<'_, E> {
        self.view.apply(
            self.snapshot.as_slice(),
            |record: &E| record.name(),
            extra_predicate,
        )
    }

    /// Moves to a page, clamped to the filtered collection.
    pub fn set_page_with(&mut self, page: usize, extra_predicate: Option<&dyn Fn(&E) -> bool>) {
        let total = self.visible_with(extra_predicate).total;
        self.view.set_page(page, total);
    }

    /// Submits a mutation and adopts the refetched collection.
    ///
    /// `edit_state` is cleared only when the mutation succeeds. A failed
    /// refetch after a successful mutation keeps the previous snapshot and
    /// records the list fault, but still returns the receipt.
    pub async fn submit<S>(
        &mut self,
        mutation: Mutation<E>,
        edit_state: &mut Option<S>,
    ) -> AppResult<MutationReceipt<E>> {
        self.fault = None;

        match self.orchestrator.submit(mutation, edit_state).await {
            Ok(settled) => {
                match settled.refreshed {
                    Ok(records) => {
                        self.snapshot = records;
                        self.view.reset_page();
                    }
                    Err(error) => {
                        self.record_fault(error);
                    }
                }
                Ok(settled.receipt)
            }
            Err(error) => Err(self.record_fault(error)),
        }
    }

    /// Deletes a record by identifier and refetches.
    pub async fn delete(&mut self, id: EntityId) -> AppResult<()> {
        let mut no_edit_state: Option<()> = None;
        self.submit(Mutation::Delete(id), &mut no_edit_state)
            .await
            .map(|_| ())
    }

    pub(crate) fn record_fault(&mut self, error: AppError) -> AppError {
        let message = fault_message(&error);
        warn!(kind = %E::KIND, error = %error, "{message}");
        self.fault = Some(message);
        error
    }
}
