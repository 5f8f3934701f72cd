use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solex::config::load_config;
use solex::usecase::{pull_diagrams, push_files, remove_diagram};
use solex::{Config, HttpManagementApiFactory, Identity, ManagementApiRepository, SolutionRepository};

#[derive(Parser, Debug)]
#[command(name = "solex", about = "Browse and sync diagrams on a remote process engine")]
struct Cli {
    /// Optional path to a config file (JSON, YAML, or TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine location, e.g. http://localhost:8000
    #[arg(long)]
    engine: Option<String>,

    /// Access token sent with every request
    #[arg(long)]
    token: Option<String>,

    /// Log remote calls to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List diagrams on the engine
    List,
    /// Print the xml of one diagram
    Show {
        /// Process model id
        name: String,
    },
    /// Upload local diagram files, overwriting existing definitions
    Push {
        /// Diagram files; the file stem is used as the process model id
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Save to this location instead of the opened engine
        #[arg(long)]
        to: Option<String>,
    },
    /// Download every diagram into a directory
    Pull {
        dir: PathBuf,
    },
    /// Delete a diagram on the engine
    Delete {
        /// Process model id
        name: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "solex=debug,warn" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg: Config = load_config(cli.config.as_ref())?;
    if cli.engine.is_some() {
        cfg.engine_url = cli.engine;
    }
    if cli.token.is_some() {
        cfg.access_token = cli.token;
    }

    let engine = cfg
        .engine_url
        .clone()
        .ok_or_else(|| anyhow!("No engine configured; pass --engine or set engine_url"))?;
    let identity = Identity::new(cfg.access_token.clone().unwrap_or_default());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .context("Building HTTP client")?;
    let mut repo = ManagementApiRepository::new(HttpManagementApiFactory::new(client));
    repo.open_path(&engine, identity)
        .await
        .with_context(|| format!("Opening {}", engine))?;

    match cli.command {
        Commands::List => {
            for d in repo.get_diagrams().await? {
                println!("{} | {}", d.id, d.uri);
            }
        }
        Commands::Show { name } => {
            let d = repo.get_diagram_by_name(&name).await?;
            println!("{}", d.xml);
        }
        Commands::Push { files, to } => {
            let target = to.as_deref().unwrap_or(&engine);
            let solution = push_files(&repo, &files, target).await?;
            for d in &solution.diagrams {
                println!("Saved {}", d.uri);
            }
        }
        Commands::Pull { dir } => {
            let written = pull_diagrams(&repo, &dir, &cfg.diagram_extension).await?;
            for p in &written {
                println!("Wrote {}", p.display());
            }
        }
        Commands::Delete { name } => {
            let d = remove_diagram(&repo, &name).await?;
            println!("Deleted {}", d.id);
        }
    }

    Ok(())
}
