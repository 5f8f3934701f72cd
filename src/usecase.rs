use anyhow::{anyhow, Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::domain::{construct_diagram_uri, Diagram, Solution};
use crate::repository::SolutionRepository;

/// Build a solution from local diagram files; each file stem becomes a process model id.
pub fn load_solution_from_files(files: &[PathBuf]) -> Result<Solution> {
    let mut diagrams = Vec::with_capacity(files.len());
    for path in files {
        let id = path
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| anyhow!("Cannot derive a diagram id from {}", path.display()))?;
        let location = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let uri = construct_diagram_uri(&location, id)?;
        let xml = std::fs::read_to_string(path)
            .with_context(|| format!("Reading diagram at {}", path.display()))?;
        diagrams.push(Diagram {
            id: id.to_string(),
            name: id.to_string(),
            xml,
            uri,
        });
    }
    Ok(Solution {
        uri: String::new(),
        diagrams,
    })
}

/// Upload local diagram files to `target`, overwriting remote definitions.
pub async fn push_files<R: SolutionRepository>(
    repo: &R,
    files: &[PathBuf],
    target: &str,
) -> Result<Solution> {
    let mut solution = load_solution_from_files(files)?;
    repo.save_solution(&mut solution, Some(target))
        .await
        .with_context(|| format!("Saving {} diagram(s) to {}", solution.diagrams.len(), target))?;
    Ok(solution)
}

/// Write every remote diagram to `<dir>/<id>.<extension>`.
pub async fn pull_diagrams<R: SolutionRepository>(
    repo: &R,
    dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let diagrams = repo.get_diagrams().await?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Creating directory at {}", dir.display()))?;

    let mut written = Vec::with_capacity(diagrams.len());
    for d in diagrams {
        let path = dir.join(format!("{}.{}", d.id, extension));
        std::fs::write(&path, d.xml.as_bytes())
            .with_context(|| format!("Writing diagram at {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Delete a diagram by name, failing when it does not exist remotely.
pub async fn remove_diagram<R: SolutionRepository>(repo: &R, name: &str) -> Result<Diagram> {
    let diagram = repo.get_diagram_by_name(name).await?;
    repo.delete_diagram(&diagram).await?;
    Ok(diagram)
}
