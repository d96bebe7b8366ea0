//! Command-line interface for the story runner.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use todomanager_client::lifecycle::wait_until_ready;
use todomanager_client::{ClientConfig, ResourceKind, TodoManagerClient};

use crate::error::{Result, StoryError};
use crate::features::{default_features_dir, discover_features};
use crate::harness::{FeatureExecutor, RandomOrderRunner, DEFAULT_RUNS};
use crate::load::{print_summary, LoadRunner, DEFAULT_LEVELS};
use crate::suite::CucumberExecutor;

/// Todo Manager story runner - Gherkin stories against the Todo Manager REST API.
#[derive(Parser)]
#[command(name = "todomanager-stories")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every feature file several times, each time in a shuffled order.
    RandomOrder {
        /// Number of shuffled passes
        #[arg(short, long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        /// Directory holding the .feature files (default: features/)
        #[arg(short, long)]
        features: Option<PathBuf>,

        /// Seed for the shuffle; printed on every session so orders can be replayed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run every feature file once, in file name order.
    Run {
        /// Directory holding the .feature files (default: features/)
        #[arg(short, long)]
        features: Option<PathBuf>,
    },

    /// Time create/update/delete/get cycles at increasing object counts.
    Load {
        /// Object counts, comma separated
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_LEVELS)]
        levels: Vec<usize>,

        /// Resource collection to exercise
        #[arg(short, long, value_enum, default_value_t = LoadTarget::All)]
        resource: LoadTarget,

        /// Seed for the random payloads, so a run can be repeated
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoadTarget {
    Todos,
    Projects,
    Categories,
    /// Todos, then projects
    All,
}

impl LoadTarget {
    pub fn kinds(self) -> Vec<ResourceKind> {
        match self {
            LoadTarget::Todos => vec![ResourceKind::Todo],
            LoadTarget::Projects => vec![ResourceKind::Project],
            LoadTarget::Categories => vec![ResourceKind::Category],
            LoadTarget::All => vec![ResourceKind::Todo, ResourceKind::Project],
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::RandomOrder {
                runs,
                features,
                seed,
            } => random_order_command(runs, features.as_deref(), seed).await,
            Commands::Run { features } => run_command(features.as_deref()).await,
            Commands::Load {
                levels,
                resource,
                seed,
            } => load_command(&levels, resource, seed).await,
        }
    })
}

/// Poll the service once before a session so a missing server fails fast.
async fn ensure_ready(config: &ClientConfig) -> Result<TodoManagerClient> {
    let client = TodoManagerClient::from_config(config)?;
    wait_until_ready(&client, config.ready_attempts, config.ready_interval).await?;
    Ok(client)
}

async fn random_order_command(
    runs: usize,
    features: Option<&Path>,
    seed: Option<u64>,
) -> Result<()> {
    let dir = features.map(Path::to_path_buf).unwrap_or_else(default_features_dir);
    let feature_files = discover_features(&dir)?;

    let config = ClientConfig::from_env();
    ensure_ready(&config).await?;

    let mut runner = RandomOrderRunner::new(CucumberExecutor::new(&config)).with_runs(runs);
    if let Some(seed) = seed {
        runner = runner.with_seed(seed);
    }

    let report = runner.run(&feature_files).await?;
    report.print_summary();
    report.ensure_passed()
}

async fn run_command(features: Option<&Path>) -> Result<()> {
    let dir = features.map(Path::to_path_buf).unwrap_or_else(default_features_dir);
    // Fail early on a missing or empty directory.
    let count = discover_features(&dir)?.len();

    let config = ClientConfig::from_env();
    ensure_ready(&config).await?;

    println!(
        "{} {} feature files from {}",
        style("Running").bold(),
        style(count).green(),
        style(dir.display()).cyan()
    );

    let executor = CucumberExecutor::new(&config);
    if executor.execute(std::slice::from_ref(&dir)).await? {
        Ok(())
    } else {
        Err(StoryError::FeaturesFailed(dir.display().to_string()))
    }
}

async fn load_command(levels: &[usize], resource: LoadTarget, seed: Option<u64>) -> Result<()> {
    if levels.is_empty() || levels.contains(&0) {
        return Err(StoryError::InvalidInput(
            "load levels must be positive object counts".to_string(),
        ));
    }

    let config = ClientConfig::from_env();
    let client = ensure_ready(&config).await?;

    let mut runner = LoadRunner::new(client);
    if let Some(seed) = seed {
        println!("{} {}", style("Payload seed:").bold(), style(seed).cyan());
        runner = runner.with_seed(seed);
    }
    let results = runner.run(&resource.kinds(), levels).await;
    print_summary(&results);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_random_order_defaults() {
        let cli = Cli::try_parse_from(["todomanager-stories", "random-order"]).unwrap();
        match cli.command {
            Commands::RandomOrder {
                runs,
                features,
                seed,
            } => {
                assert_eq!(runs, DEFAULT_RUNS);
                assert!(features.is_none());
                assert!(seed.is_none());
            }
            _ => panic!("expected random-order"),
        }
    }

    #[test]
    fn test_random_order_with_seed() {
        let cli = Cli::try_parse_from([
            "todomanager-stories",
            "random-order",
            "--runs",
            "3",
            "--seed",
            "99",
            "--features",
            "stories",
        ])
        .unwrap();
        match cli.command {
            Commands::RandomOrder {
                runs,
                features,
                seed,
            } => {
                assert_eq!(runs, 3);
                assert_eq!(features, Some(PathBuf::from("stories")));
                assert_eq!(seed, Some(99));
            }
            _ => panic!("expected random-order"),
        }
    }

    #[test]
    fn test_load_levels_and_resource() {
        let cli = Cli::try_parse_from([
            "todomanager-stories",
            "load",
            "--levels",
            "10,100",
            "--resource",
            "projects",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Load {
                levels,
                resource,
                seed,
            } => {
                assert_eq!(levels, vec![10, 100]);
                assert_eq!(resource, LoadTarget::Projects);
                assert_eq!(resource.kinds(), vec![ResourceKind::Project]);
                assert_eq!(seed, Some(7));
            }
            _ => panic!("expected load"),
        }
    }

    #[test]
    fn test_load_defaults() {
        let cli = Cli::try_parse_from(["todomanager-stories", "load"]).unwrap();
        match cli.command {
            Commands::Load {
                levels,
                resource,
                seed,
            } => {
                assert_eq!(levels, DEFAULT_LEVELS.to_vec());
                assert_eq!(resource, LoadTarget::All);
                assert!(seed.is_none());
            }
            _ => panic!("expected load"),
        }
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let result = Cli::try_parse_from(["todomanager-stories", "load", "--resource", "users"]);
        assert!(result.is_err());
    }
}
