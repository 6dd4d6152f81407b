use std::sync::Arc;

use tracing::{debug, warn};

use rbac_admin_core::AppResult;
use rbac_admin_domain::DirectoryEntity;

use crate::{EntityDirectory, Mutation, MutationReceipt};

/// Submission phase for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// No mutation in flight.
    Idle,
    /// A mutation was issued and its response is pending.
    Submitting,
}

/// Result of a settled mutation followed by a refetch.
///
/// The receipt stands even when the refetch fails.
#[derive(Debug)]
pub struct SettledMutation<E> {
    /// Backend acknowledgement of the mutation.
    pub receipt: MutationReceipt<E>,
    /// The owning collection as fetched after the mutation succeeded.
    pub refreshed: AppResult<Vec<E>>,
}

/// Sequences submit, await, refetch, and edit-state reset for one entity kind.
///
/// Concurrent submissions are neither queued nor coalesced; callers disable
/// the triggering control while [`MutationPhase::Submitting`].
pub struct MutationOrchestrator<E: DirectoryEntity> {
    directory: Arc<dyn EntityDirectory<E>>,
    phase: MutationPhase,
}

impl<E: DirectoryEntity> MutationOrchestrator<E> {
    /// Creates an idle orchestrator for the given directory.
    #[must_use]
    pub fn new(directory: Arc<dyn EntityDirectory<E>>) -> Self {
        Self {
            directory,
            phase: MutationPhase::Idle,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Issues a mutation, then refetches the owning collection.
    ///
    /// On success `edit_state` is cleared before the refetch is issued, and the
    /// refetch starts only after the mutation response arrived. On failure
    /// `edit_state` is left untouched so the operator can retry. The phase is
    /// `Idle` again when this returns, either way. Only a failed mutation is an
    /// `Err`; a failed refetch is carried in [`SettledMutation::refreshed`].
    pub async fn submit<S>(
        &mut self,
        mutation: Mutation<E>,
        edit_state: &mut Option<S>,
    ) -> AppResult<SettledMutation<E>> {
        let operation = mutation.operation();
        self.phase = MutationPhase::Submitting;
        debug!(kind = %E::KIND, operation = %operation, "mutation submitting");

        let outcome = self.dispatch(mutation).await;
        self.phase = MutationPhase::Idle;

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(error) => {
                warn!(
                    kind = %E::KIND,
                    operation = %operation,
                    error = %error,
                    "mutation failed"
                );
                return Err(error);
            }
        };

        edit_state.take();
        debug!(kind = %E::KIND, operation = %operation, "mutation applied, refetching");

        let refreshed = self.directory.list().await;
        if let Err(error) = &refreshed {
            warn!(
                kind = %E::KIND,
                operation = %operation,
                error = %error,
                "mutation applied but refetch failed"
            );
        }

        Ok(SettledMutation { receipt, refreshed })
    }

    async fn dispatch(&self, mutation: Mutation<E>) -> AppResult<MutationReceipt<E>> {
        match mutation {
            Mutation::Create(draft) => self
                .directory
                .create(draft)
                .await
                .map(MutationReceipt::Created),
            Mutation::Update { id, draft } => self
                .directory
                .update(&id, draft)
                .await
                .map(MutationReceipt::Updated),
            Mutation::Delete(id) => {
                self.directory.delete(&id).await?;
                Ok(MutationReceipt::Deleted(id))
            }
        }
    }
}
