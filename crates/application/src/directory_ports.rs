use async_trait::async_trait;

use rbac_admin_core::{AppResult, DirectoryOperation, EntityId};
use rbac_admin_domain::DirectoryEntity;

/// Port for the remote directory holding one entity kind.
///
/// Every call reflects backend state at call time. Implementations never
/// retry, never cache, and never touch caller-held collections. Failures
/// surface as `AppError::Directory`.
#[async_trait]
pub trait EntityDirectory<E: DirectoryEntity>: Send + Sync {
    /// Fetches the full collection in backend order.
    async fn list(&self) -> AppResult<Vec<E>>;

    /// Submits a draft and returns the stored record with its assigned identifier.
    async fn create(&self, draft: E::Draft) -> AppResult<E>;

    /// Replaces the record with the given identifier.
    async fn update(&self, id: &EntityId, draft: E::Draft) -> AppResult<E>;

    /// Removes the record with the given identifier.
    async fn delete(&self, id: &EntityId) -> AppResult<()>;
}

/// A write submitted through the mutation orchestrator.
#[derive(Debug, Clone)]
pub enum Mutation<E: DirectoryEntity> {
    /// Create a new record from a draft.
    Create(E::Draft),
    /// Replace an existing record.
    Update {
        /// Identifier of the record being replaced.
        id: EntityId,
        /// Replacement payload.
        draft: E::Draft,
    },
    /// Remove an existing record.
    Delete(EntityId),
}

impl<E: DirectoryEntity> Mutation<E> {
    /// Returns the directory operation this mutation issues.
    #[must_use]
    pub fn operation(&self) -> DirectoryOperation {
        match self {
            Self::Create(_) => DirectoryOperation::Create,
            Self::Update { .. } => DirectoryOperation::Update,
            Self::Delete(_) => DirectoryOperation::Delete,
        }
    }
}

/// Backend acknowledgement of a completed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationReceipt<E> {
    /// The created record, carrying its backend-assigned identifier.
    Created(E),
    /// The stored replacement record.
    Updated(E),
    /// Identifier of the removed record.
    Deleted(EntityId),
}
