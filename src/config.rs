use std::{
    env,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Config {
    pub engine_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub diagram_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_url: None,
            access_token: None,
            timeout_secs: 30,
            diagram_extension: "bpmn".to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct FileConfig {
    engine_url: Option<String>,
    access_token: Option<String>,
    timeout_secs: Option<u64>,
    diagram_extension: Option<String>,
}

const CANDIDATES: [&str; 8] = [
    "solex.toml",
    "solex.yaml",
    "solex.yml",
    "solex.json",
    ".solexrc.toml",
    ".solexrc.yaml",
    ".solexrc.yml",
    ".solexrc.json",
];

pub fn load_config(cli_path: Option<&PathBuf>) -> Result<Config> {
    resolve_config(cli_path, |key| env::var(key).ok(), Path::new("."))
}

/// Layers defaults, the config file, then `SOLEX_*` environment overrides.
///
/// The file comes from `cli_path`, else `SOLEX_CONFIG`, else the first
/// candidate found in `cwd`.
pub fn resolve_config<E>(cli_path: Option<&PathBuf>, env_var: E, cwd: &Path) -> Result<Config>
where
    E: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();

    let path = if let Some(p) = cli_path {
        Some(p.clone())
    } else if let Some(env_p) = env_var("SOLEX_CONFIG") {
        Some(PathBuf::from(env_p))
    } else {
        CANDIDATES.iter().map(|c| cwd.join(c)).find(|p| p.exists())
    };

    if let Some(p) = path {
        let ext = p.extension().and_then(OsStr::to_str).unwrap_or("");
        let contents =
            fs::read_to_string(&p).with_context(|| format!("Reading config at {}", p.display()))?;
        let fc: FileConfig = match ext.to_ascii_lowercase().as_str() {
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Parsing JSON config at {}", p.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Parsing YAML config at {}", p.display()))?,
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Parsing TOML config at {}", p.display()))?,
            other => return Err(anyhow!("Unsupported config extension: {}", other)),
        };

        if let Some(u) = fc.engine_url {
            cfg.engine_url = Some(u);
        }
        if let Some(t) = fc.access_token {
            cfg.access_token = Some(t);
        }
        if let Some(s) = fc.timeout_secs {
            cfg.timeout_secs = s;
        }
        if let Some(e) = fc.diagram_extension {
            cfg.diagram_extension = e;
        }
    }

    if let Some(u) = env_var("SOLEX_ENGINE_URL") {
        cfg.engine_url = Some(u);
    }
    if let Some(t) = env_var("SOLEX_ACCESS_TOKEN") {
        cfg.access_token = Some(t);
    }

    Ok(cfg)
}
