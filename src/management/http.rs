use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ManagementApi, ManagementApiFactory};
use crate::domain::{Identity, ProcessModel, ProcessModelList, UpdateProcessDefinitionsRequest};
use crate::error::{RepositoryError, Result};

/// Binds a shared [`reqwest::Client`] to base routes.
///
/// Timeouts and TLS settings belong to the injected client.
#[derive(Clone, Default)]
pub struct HttpManagementApiFactory {
    client: Client,
}

impl HttpManagementApiFactory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ManagementApiFactory for HttpManagementApiFactory {
    type Client = HttpManagementApi;

    fn bind(&self, base_route: &str) -> HttpManagementApi {
        HttpManagementApi {
            client: self.client.clone(),
            base_route: base_route.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct HttpManagementApi {
    client: Client,
    base_route: String,
}

impl HttpManagementApi {
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_route).map_err(|e| self.unreachable(e))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| self.unreachable("base route cannot carry a path"))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn unreachable(&self, reason: impl ToString) -> RepositoryError {
        RepositoryError::Unreachable {
            location: self.base_route.clone(),
            reason: reason.to_string(),
        }
    }

    async fn send(
        &self,
        operation: &str,
        process_model_id: Option<&str>,
        request: RequestBuilder,
        identity: &Identity,
    ) -> Result<Response> {
        let request = match identity.access_token() {
            "" => request,
            token => request.bearer_auth(token),
        };
        let response = request
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), base_route = %self.base_route, "management api responded");

        if status == StatusCode::NOT_FOUND {
            return Err(match process_model_id {
                Some(id) => RepositoryError::NotFound(id.to_string()),
                None => self.unreachable("no management api at this location (404)"),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Rejected {
                operation: operation.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| RepositoryError::InvalidResponse {
                location: self.base_route.clone(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl ManagementApi for HttpManagementApi {
    fn base_route(&self) -> &str {
        &self.base_route
    }

    async fn get_process_models(&self, identity: &Identity) -> Result<ProcessModelList> {
        let url = self.endpoint(&["process_models"])?;
        debug!(%url, "listing process models");
        let response = self
            .send("list process models", None, self.client.get(url), identity)
            .await?;
        self.decode(response).await
    }

    async fn get_process_model_by_id(
        &self,
        process_model_id: &str,
        identity: &Identity,
    ) -> Result<ProcessModel> {
        let url = self.endpoint(&["process_models", process_model_id])?;
        debug!(%url, "fetching process model");
        let response = self
            .send(
                "get process model",
                Some(process_model_id),
                self.client.get(url),
                identity,
            )
            .await?;
        self.decode(response).await
    }

    async fn update_process_definitions(
        &self,
        process_model_id: &str,
        payload: &UpdateProcessDefinitionsRequest,
        identity: &Identity,
    ) -> Result<()> {
        let url = self.endpoint(&["process_models", process_model_id, "update"])?;
        debug!(%url, overwrite = payload.overwrite_existing, "updating process definitions");
        // a 404 here means the update route is missing, not the model
        self.send(
            "update process definitions",
            None,
            self.client.post(url).json(payload),
            identity,
        )
        .await?;
        Ok(())
    }

    async fn delete_process_definitions(
        &self,
        process_model_id: &str,
        identity: &Identity,
    ) -> Result<()> {
        let url = self.endpoint(&["process_models", process_model_id, "delete"])?;
        debug!(%url, "deleting process definitions");
        self.send(
            "delete process definitions",
            Some(process_model_id),
            self.client.delete(url),
            identity,
        )
        .await?;
        Ok(())
    }
}
