use async_trait::async_trait;
use rbac_admin_application::EntityDirectory;
use rbac_admin_core::{AppResult, DirectoryFault, DirectoryOperation, EntityId};
use rbac_admin_domain::DirectoryEntity;
use tokio::sync::RwLock;

/// In-memory directory for one entity kind.
///
/// Assigns increasing numeric identifiers and answers in insertion order.
#[derive(Debug)]
pub struct InMemoryDirectory<E> {
    records: RwLock<Vec<E>>,
    next_id: RwLock<i64>,
}

impl<E: DirectoryEntity> InMemoryDirectory<E> {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Creates a directory holding the given records.
    #[must_use]
    pub fn seeded(records: Vec<E>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|record| match record.id() {
                EntityId::Number(value) => Some(*value),
                EntityId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        Self {
            records: RwLock::new(records),
            next_id: RwLock::new(next_id),
        }
    }

    fn missing(operation: DirectoryOperation, id: &EntityId) -> DirectoryFault {
        DirectoryFault::new(operation, E::KIND, format!("no {} with id '{id}'", E::KIND))
    }
}

impl<E: DirectoryEntity> Default for InMemoryDirectory<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: DirectoryEntity> EntityDirectory<E> for InMemoryDirectory<E> {
    async fn list(&self) -> AppResult<Vec<E>> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, draft: E::Draft) -> AppResult<E> {
        let mut next_id = self.next_id.write().await;
        let record = E::from_draft(EntityId::Number(*next_id), draft);
        *next_id = next_id.saturating_add(1);

        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &EntityId, draft: E::Draft) -> AppResult<E> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| Self::missing(DirectoryOperation::Update, id))?;

        *slot = E::from_draft(id.clone(), draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &EntityId) -> AppResult<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| Self::missing(DirectoryOperation::Delete, id))?;

        records.remove(position);
        Ok(())
    }
}
