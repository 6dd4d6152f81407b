use rbac_admin_core::{EntityId, EntityKind};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record type stored in the remote directory.
///
/// Each kind has a persisted shape carrying a backend-assigned identifier and a
/// draft shape submitted on create and full replacement.
pub trait DirectoryEntity:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Submission payload without an identifier.
    type Draft: Clone + std::fmt::Debug + Serialize + Send + Sync + 'static;

    /// Entity kind addressed by this record type.
    const KIND: EntityKind;

    /// Returns the backend-assigned identifier.
    fn id(&self) -> &EntityId;

    /// Returns the display name used for search and summaries.
    fn name(&self) -> &str;

    /// Builds a replacement draft pre-populated from this record.
    fn to_draft(&self) -> Self::Draft;

    /// Materializes a stored record from an identifier and a submitted draft.
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;
}
