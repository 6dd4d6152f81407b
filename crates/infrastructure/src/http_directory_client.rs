use async_trait::async_trait;
use rbac_admin_application::EntityDirectory;
use rbac_admin_core::{
    AppError, AppResult, DirectoryFault, DirectoryOperation, EntityId, EntityKind,
};
use rbac_admin_domain::DirectoryEntity;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// REST directory client for the `/users`, `/roles`, and `/permissions` collections.
///
/// One client serves every entity kind. Requests are issued once; timeouts and
/// other transport settings come from the supplied `reqwest::Client`.
#[derive(Clone)]
pub struct HttpDirectoryClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpDirectoryClient {
    /// Creates a client rooted at `base_url`.
    pub fn new(http_client: reqwest::Client, base_url: Url) -> AppResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "directory base url '{base_url}' cannot carry resource paths"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Returns the configured base url.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(
        &self,
        operation: DirectoryOperation,
        kind: EntityKind,
        id: Option<&EntityId>,
    ) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                DirectoryFault::new(operation, kind, "base url cannot carry resource paths")
            })?;
            segments.pop_if_empty().push(kind.path_segment());
            if let Some(id) = id {
                segments.push(&id.to_path_segment());
            }
        }

        Ok(url)
    }

    async fn send(
        &self,
        operation: DirectoryOperation,
        kind: EntityKind,
        request: reqwest::RequestBuilder,
    ) -> AppResult<reqwest::Response> {
        let response = request.send().await.map_err(|error| {
            DirectoryFault::new(operation, kind, format!("transport error: {error}"))
        })?;

        let status = response.status();
        debug!(operation = %operation, kind = %kind, status = %status, "directory response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        Err(DirectoryFault::new(operation, kind, format!("status {status}: {body}")).into())
    }

    async fn decode<T: DeserializeOwned>(
        operation: DirectoryOperation,
        kind: EntityKind,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let body = response.bytes().await.map_err(|error| {
            DirectoryFault::new(operation, kind, format!("response body unavailable: {error}"))
        })?;

        serde_json::from_slice(&body).map_err(|error| {
            DirectoryFault::new(operation, kind, format!("invalid response body: {error}")).into()
        })
    }
}

#[async_trait]
impl<E: DirectoryEntity> EntityDirectory<E> for HttpDirectoryClient {
    async fn list(&self) -> AppResult<Vec<E>> {
        let operation = DirectoryOperation::List;
        let url = self.endpoint(operation, E::KIND, None)?;
        debug!(kind = %E::KIND, url = %url, "listing directory collection");

        let response = self
            .send(operation, E::KIND, self.http_client.get(url))
            .await?;
        Self::decode(operation, E::KIND, response).await
    }

    async fn create(&self, draft: E::Draft) -> AppResult<E> {
        let operation = DirectoryOperation::Create;
        let url = self.endpoint(operation, E::KIND, None)?;

        let response = self
            .send(operation, E::KIND, self.http_client.post(url).json(&draft))
            .await?;
        Self::decode(operation, E::KIND, response).await
    }

    async fn update(&self, id: &EntityId, draft: E::Draft) -> AppResult<E> {
        let operation = DirectoryOperation::Update;
        let url = self.endpoint(operation, E::KIND, Some(id))?;

        let response = self
            .send(operation, E::KIND, self.http_client.put(url).json(&draft))
            .await?;
        Self::decode(operation, E::KIND, response).await
    }

    async fn delete(&self, id: &EntityId) -> AppResult<()> {
        let operation = DirectoryOperation::Delete;
        let url = self.endpoint(operation, E::KIND, Some(id))?;

        self.send(operation, E::KIND, self.http_client.delete(url))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests;
