use async_trait::async_trait;

use crate::domain::{Identity, ProcessModel, ProcessModelList, UpdateProcessDefinitionsRequest};
use crate::error::Result;

pub mod http;

/// Route segment the management API serves under, relative to an engine location.
pub const DEFAULT_ROUTE: &str = "api/management/v1";

/// Base route of the management API for an already normalized location.
pub fn join_base_route(location: &str) -> String {
    format!("{}/{}", location, DEFAULT_ROUTE)
}

/// A management API client bound to one base route.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    fn base_route(&self) -> &str;

    async fn get_process_models(&self, identity: &Identity) -> Result<ProcessModelList>;

    async fn get_process_model_by_id(
        &self,
        process_model_id: &str,
        identity: &Identity,
    ) -> Result<ProcessModel>;

    /// Upsert a process definition. With `overwrite_existing` set the engine
    /// replaces an existing definition instead of reporting a conflict.
    async fn update_process_definitions(
        &self,
        process_model_id: &str,
        payload: &UpdateProcessDefinitionsRequest,
        identity: &Identity,
    ) -> Result<()>;

    async fn delete_process_definitions(
        &self,
        process_model_id: &str,
        identity: &Identity,
    ) -> Result<()>;
}

/// Produces bound clients that share one transport.
pub trait ManagementApiFactory: Send + Sync {
    type Client: ManagementApi;

    fn bind(&self, base_route: &str) -> Self::Client;
}
