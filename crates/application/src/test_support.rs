use async_trait::async_trait;
use tokio::sync::Mutex;

use rbac_admin_core::{AppResult, DirectoryFault, DirectoryOperation, EntityId};
use rbac_admin_domain::DirectoryEntity;

use crate::EntityDirectory;

/// Directory fake recording every call and failing on request.
pub(crate) struct FakeDirectory<E> {
    records: Mutex<Vec<E>>,
    next_id: Mutex<i64>,
    calls: Mutex<Vec<DirectoryOperation>>,
    failures: Mutex<Vec<DirectoryOperation>>,
}

impl<E: DirectoryEntity> FakeDirectory<E> {
    pub(crate) fn seeded(records: Vec<E>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|record| match record.id() {
                EntityId::Number(value) => Some(*value),
                EntityId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            records: Mutex::new(records),
            next_id: Mutex::new(next_id),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::seeded(Vec::new())
    }

    /// Makes the next call of `operation` fail with a directory fault.
    pub(crate) async fn fail_next(&self, operation: DirectoryOperation) {
        self.failures.lock().await.push(operation);
    }

    pub(crate) async fn calls(&self) -> Vec<DirectoryOperation> {
        self.calls.lock().await.clone()
    }

    /// Removes a record without recording a call, as another operator would.
    pub(crate) async fn remove_behind_the_scenes(&self, id: &EntityId) {
        self.records.lock().await.retain(|record| record.id() != id);
    }

    async fn enter(&self, operation: DirectoryOperation) -> AppResult<()> {
        self.calls.lock().await.push(operation);

        let mut failures = self.failures.lock().await;
        if let Some(position) = failures.iter().position(|failure| *failure == operation) {
            failures.remove(position);
            return Err(DirectoryFault::new(operation, E::KIND, "status 500").into());
        }

        Ok(())
    }

    fn missing(operation: DirectoryOperation, id: &EntityId) -> DirectoryFault {
        DirectoryFault::new(operation, E::KIND, format!("status 404: no record {id}"))
    }
}

#[async_trait]
impl<E: DirectoryEntity> EntityDirectory<E> for FakeDirectory<E> {
    async fn list(&self) -> AppResult<Vec<E>> {
        self.enter(DirectoryOperation::List).await?;
        Ok(self.records.lock().await.clone())
    }

    async fn create(&self, draft: E::Draft) -> AppResult<E> {
        self.enter(DirectoryOperation::Create).await?;

        let mut next_id = self.next_id.lock().await;
        let record = E::from_draft(EntityId::Number(*next_id), draft);
        *next_id += 1;
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &EntityId, draft: E::Draft) -> AppResult<E> {
        self.enter(DirectoryOperation::Update).await?;

        let mut records = self.records.lock().await;
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| Self::missing(DirectoryOperation::Update, id))?;
        *slot = E::from_draft(id.clone(), draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &EntityId) -> AppResult<()> {
        self.enter(DirectoryOperation::Delete).await?;

        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(Self::missing(DirectoryOperation::Delete, id).into());
        }

        Ok(())
    }
}
