//! Cucumber wiring: hooks, tag filtering and the production feature executor.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cucumber::gherkin::{Feature, Scenario};
use cucumber::writer::Stats as _;
use cucumber::{cli, World as _};
use todomanager_client::ClientConfig;

use crate::error::Result;
use crate::harness::FeatureExecutor;
use crate::steps::lifecycle::LIFECYCLE_TAG;
use crate::world::TodoWorld;

fn has_tag(tags: &[String], tag: &str) -> bool {
    tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Whether a scenario takes part in this session.
///
/// `@lifecycle` scenarios stop the service, so they only run when the suite
/// can start it again.
pub fn scenario_enabled(feature: &Feature, scenario: &Scenario, lifecycle_enabled: bool) -> bool {
    if lifecycle_enabled {
        return true;
    }
    !has_tag(&feature.tags, LIFECYCLE_TAG) && !has_tag(&scenario.tags, LIFECYCLE_TAG)
}

/// Whether `@lifecycle` scenarios can run: only when the suite can start the
/// service again after stopping it.
pub fn lifecycle_enabled(config: &ClientConfig) -> bool {
    config.server_jar.is_some()
}

/// Run one feature file (or directory) with one scenario at a time.
///
/// Every scenario gets a context built from `config`. Steps without a matching
/// definition fail the run. Returns `true` when nothing failed.
pub async fn run_features(input: &Path, config: &ClientConfig) -> bool {
    let lifecycle = lifecycle_enabled(config);
    let scenario_config = config.clone();

    let writer = TodoWorld::cucumber()
        .fail_on_skipped()
        .max_concurrent_scenarios(1)
        .with_cli(cli::Opts::<_, _, _, cli::Empty>::default())
        .before(move |_feature, _rule, scenario, world| {
            let config = scenario_config.clone();
            Box::pin(async move {
                tracing::debug!(scenario = %scenario.name, "Starting scenario");
                if let Err(e) = world.ctx.reset_with(config) {
                    tracing::warn!(error = %e, "Failed to reset scenario context");
                }
            })
        })
        .after(|_feature, _rule, scenario, _ev, world| {
            Box::pin(async move {
                tracing::debug!(scenario = %scenario.name, "Finished scenario");
                if let Some(world) = world {
                    if world.ctx.config().cleanup_created {
                        let deleted = world.ctx.delete_created().await;
                        tracing::debug!(deleted, "Removed scenario resources");
                    }
                    world.ctx.cleanup();
                }
            })
        })
        .filter_run(input.to_path_buf(), move |feature, _rule, scenario| {
            scenario_enabled(feature, scenario, lifecycle)
        })
        .await;

    !writer.execution_has_failed()
}

/// Runs each feature file through cucumber, strictly in the order given.
#[derive(Debug, Clone)]
pub struct CucumberExecutor {
    config: ClientConfig,
}

impl CucumberExecutor {
    pub fn new(config: &ClientConfig) -> Self {
        if !lifecycle_enabled(config) {
            tracing::info!("TODO_MANAGER_JAR not set; skipping @{LIFECYCLE_TAG} scenarios");
        }
        Self {
            config: config.clone(),
        }
    }

    pub fn lifecycle_enabled(&self) -> bool {
        lifecycle_enabled(&self.config)
    }
}

#[async_trait(?Send)]
impl FeatureExecutor for CucumberExecutor {
    async fn execute(&self, features: &[PathBuf]) -> Result<bool> {
        let mut passed = true;
        for feature in features {
            if !run_features(feature, &self.config).await {
                tracing::warn!(feature = %feature.display(), "Feature had failures");
                passed = false;
            }
        }
        Ok(passed)
    }
}
