use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::{SolutionRepository, WatchCallback};
use crate::domain::{
    construct_diagram_uri, map_process_model_to_diagram, normalize_pathspec, parse_diagram_uri,
    validate_process_model_id, Diagram, Identity, Solution, UpdateProcessDefinitionsRequest,
};
use crate::error::{RepositoryError, Result};
use crate::management::{join_base_route, ManagementApi, ManagementApiFactory};

struct Session<C> {
    location: String,
    client: C,
    identity: Identity,
}

/// Presents the process models of a remote engine as a solution of diagrams.
///
/// Nothing is cached: every read maps the engine's current process models
/// again, and every write goes straight to the engine.
pub struct ManagementApiRepository<F: ManagementApiFactory> {
    factory: F,
    session: Option<Session<F::Client>>,
}

impl<F: ManagementApiFactory> ManagementApiRepository<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            session: None,
        }
    }

    /// Location opened by the last successful `open_path`.
    pub fn location(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.location.as_str())
    }

    /// The opened location together with its current diagrams.
    pub async fn get_solution(&self) -> Result<Solution> {
        let session = self.session()?;
        let diagrams = self.get_diagrams().await?;
        Ok(Solution {
            uri: session.location.clone(),
            diagrams,
        })
    }

    /// Fetch one diagram by its full uri, without touching the opened session.
    pub async fn open_single_diagram(&self, uri: &str, identity: &Identity) -> Result<Diagram> {
        let (location, process_model_id) = parse_diagram_uri(uri);
        validate_process_model_id(process_model_id)?;
        let client = self.bind(location);
        let process_model = client
            .get_process_model_by_id(process_model_id, identity)
            .await?;
        map_process_model_to_diagram(&process_model, location)
    }

    fn session(&self) -> Result<&Session<F::Client>> {
        self.session.as_ref().ok_or(RepositoryError::NotOpened)
    }

    fn bind(&self, location: &str) -> F::Client {
        self.factory.bind(&join_base_route(location))
    }

    async fn upsert(
        client: &F::Client,
        process_model_id: &str,
        xml: &str,
        identity: &Identity,
    ) -> Result<()> {
        validate_process_model_id(process_model_id)?;
        let payload = UpdateProcessDefinitionsRequest::overwrite(xml);
        client
            .update_process_definitions(process_model_id, &payload, identity)
            .await
            .map_err(|e| match e {
                RepositoryError::Unreachable { location, .. } => RepositoryError::Unreachable {
                    location,
                    reason: "datastore is not reachable".to_string(),
                },
                other => other,
            })?;
        info!(process_model_id, base_route = client.base_route(), "saved diagram");
        Ok(())
    }
}

#[async_trait]
impl<F: ManagementApiFactory> SolutionRepository for ManagementApiRepository<F> {
    async fn open_path(&mut self, pathspec: &str, identity: Identity) -> Result<()> {
        let location = normalize_pathspec(pathspec);
        let client = self.bind(location);

        // connectivity probe; failures go straight back to the caller
        client.get_process_models(&identity).await?;

        info!(location, base_route = client.base_route(), "opened remote solution");
        self.session = Some(Session {
            location: location.to_string(),
            client,
            identity,
        });
        Ok(())
    }

    async fn get_diagrams(&self) -> Result<Vec<Diagram>> {
        let session = self.session()?;
        let list = session.client.get_process_models(&session.identity).await?;
        debug!(count = list.process_models.len(), "listed process models");

        list.process_models
            .iter()
            .map(|pm| map_process_model_to_diagram(pm, &session.location))
            .collect()
    }

    async fn get_diagram_by_name(&self, name: &str) -> Result<Diagram> {
        let session = self.session()?;
        validate_process_model_id(name)?;
        let process_model = session
            .client
            .get_process_model_by_id(name, &session.identity)
            .await?;
        map_process_model_to_diagram(&process_model, &session.location)
    }

    async fn save_diagram(&self, diagram: &Diagram, pathspec: Option<&str>) -> Result<()> {
        let session = self.session()?;

        match pathspec {
            Some(pathspec) => {
                let client = self.bind(normalize_pathspec(pathspec));
                Self::upsert(&client, &diagram.id, &diagram.xml, &session.identity).await
            }
            None => {
                let (location, process_model_id) = parse_diagram_uri(&diagram.uri);
                if location != session.location {
                    warn!(
                        uri = %diagram.uri,
                        opened = %session.location,
                        "diagram uri points outside the opened location, saving to the opened one"
                    );
                }
                Self::upsert(
                    &session.client,
                    process_model_id,
                    &diagram.xml,
                    &session.identity,
                )
                .await
            }
        }
    }

    async fn save_solution(&self, solution: &mut Solution, pathspec: Option<&str>) -> Result<()> {
        let Some(pathspec) = pathspec else {
            try_join_all(solution.diagrams.iter().map(|d| self.save_diagram(d, None))).await?;
            return Ok(());
        };

        let session = self.session()?;
        let location = normalize_pathspec(pathspec);
        for diagram in &solution.diagrams {
            validate_process_model_id(&diagram.id)?;
        }

        solution.uri = location.to_string();
        for diagram in &mut solution.diagrams {
            diagram.uri = construct_diagram_uri(location, &diagram.id)?;
        }

        let client = self.bind(location);
        debug!(location, count = solution.diagrams.len(), "saving solution");
        try_join_all(
            solution
                .diagrams
                .iter()
                .map(|d| Self::upsert(&client, &d.id, &d.xml, &session.identity)),
        )
        .await?;
        Ok(())
    }

    async fn delete_diagram(&self, diagram: &Diagram) -> Result<()> {
        let session = self.session()?;
        validate_process_model_id(&diagram.id)?;
        session
            .client
            .delete_process_definitions(&diagram.id, &session.identity)
            .await?;
        info!(process_model_id = %diagram.id, "deleted diagram");
        Ok(())
    }

    async fn rename_diagram(&self, _diagram: &Diagram, _new_name: &str) -> Result<Diagram> {
        Err(RepositoryError::Unsupported {
            operation: "rename_diagram",
        })
    }

    fn watch_file(&self, _path: &str, _callback: WatchCallback) -> Result<()> {
        Err(RepositoryError::Unsupported {
            operation: "watch_file",
        })
    }

    fn unwatch_file(&self, _path: &str) -> Result<()> {
        Err(RepositoryError::Unsupported {
            operation: "unwatch_file",
        })
    }
}
