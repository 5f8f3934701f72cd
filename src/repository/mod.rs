use async_trait::async_trait;

use crate::domain::{Diagram, Identity, Solution};
use crate::error::Result;

pub mod management_api;

/// Invoked when a watched diagram file changes.
pub type WatchCallback = Box<dyn Fn() + Send + Sync>;

/// Solution/diagram shaped access to a diagram store.
///
/// `open_path` takes `&mut self`: a repository instance is owned by one
/// caller, and every other operation runs against the path it opened.
#[async_trait]
pub trait SolutionRepository: Send + Sync {
    async fn open_path(&mut self, pathspec: &str, identity: Identity) -> Result<()>;

    /// Fails with `InvalidIdentifier` if any stored id cannot round-trip through a uri.
    async fn get_diagrams(&self) -> Result<Vec<Diagram>>;

    async fn get_diagram_by_name(&self, name: &str) -> Result<Diagram>;

    async fn save_diagram(&self, diagram: &Diagram, pathspec: Option<&str>) -> Result<()>;

    async fn save_solution(&self, solution: &mut Solution, pathspec: Option<&str>) -> Result<()>;

    async fn delete_diagram(&self, diagram: &Diagram) -> Result<()>;

    async fn rename_diagram(&self, diagram: &Diagram, new_name: &str) -> Result<Diagram>;

    fn watch_file(&self, path: &str, callback: WatchCallback) -> Result<()>;

    fn unwatch_file(&self, path: &str) -> Result<()>;
}
