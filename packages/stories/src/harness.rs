//! Random-order runner.
//!
//! Replays the whole feature set several times, each time in a freshly
//! shuffled order, to surface scenarios that only pass (or only fail) after
//! some other feature has run. The shuffle is seeded and the seed is printed,
//! so a suspicious order can be replayed with `--seed`.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use console::style;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, StoryError};
use crate::features::feature_name;

/// Number of shuffled passes when none is given.
pub const DEFAULT_RUNS: usize = 5;

/// Runs a list of feature files in exactly the given order.
#[async_trait(?Send)]
pub trait FeatureExecutor {
    /// Returns `true` when every scenario passed.
    async fn execute(&self, features: &[PathBuf]) -> Result<bool>;
}

/// One shuffled pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// 1-based run number.
    pub run: usize,
    pub order: Vec<String>,
    pub passed: bool,
}

/// Everything observed across all passes.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seed: u64,
    pub feature_count: usize,
    pub outcomes: Vec<RunOutcome>,
    unique_orders: HashSet<String>,
}

impl RunReport {
    fn new(seed: u64, feature_count: usize) -> Self {
        Self {
            seed,
            feature_count,
            outcomes: Vec::new(),
            unique_orders: HashSet::new(),
        }
    }

    fn record(&mut self, outcome: RunOutcome) {
        self.unique_orders.insert(outcome.order.join(","));
        self.outcomes.push(outcome);
    }

    pub fn total_runs(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful_runs(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Run numbers that had failing scenarios.
    pub fn failed_runs(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| o.run)
            .collect()
    }

    pub fn unique_order_count(&self) -> usize {
        self.unique_orders.len()
    }

    /// Distinct orders a fair shuffle should reach: `min(runs, features!)`.
    pub fn expected_unique_orders(&self) -> u64 {
        let runs = self.total_runs() as u64;
        runs.min(saturating_factorial(self.feature_count))
    }

    pub fn has_repeated_orders(&self) -> bool {
        (self.unique_order_count() as u64) < self.expected_unique_orders()
    }

    /// `Err(RunsFailed)` listing the failed run numbers, if any.
    pub fn ensure_passed(&self) -> Result<()> {
        let runs = self.failed_runs();
        if runs.is_empty() {
            Ok(())
        } else {
            Err(StoryError::RunsFailed { runs })
        }
    }

    /// Print the end-of-session summary.
    pub fn print_summary(&self) {
        let failed = self.failed_runs();

        println!();
        println!("{}", style("=== Test Summary ===").bold());
        println!("Total Runs: {}", self.total_runs());
        println!("Successful Runs: {}", style(self.successful_runs()).green());
        println!("Failed Runs: {}", style(failed.len()).red());
        println!(
            "Unique Execution Orders: {} out of {}",
            self.unique_order_count(),
            self.total_runs()
        );
        println!("Seed: {}", self.seed);

        println!();
        println!("Order Summary:");
        for outcome in &self.outcomes {
            println!("Run {}: {}", outcome.run, outcome.order.join(" → "));
        }

        if self.has_repeated_orders() {
            println!();
            println!(
                "{} Some execution orders were repeated!",
                style("Warning:").yellow().bold()
            );
        }

        if !failed.is_empty() {
            println!();
            println!("Failed Run Numbers: {failed:?}");
        }
    }
}

/// `n!`, pinned at `u64::MAX` once it overflows.
pub fn saturating_factorial(n: usize) -> u64 {
    (1..=n as u64)
        .try_fold(1u64, |acc, k| acc.checked_mul(k))
        .unwrap_or(u64::MAX)
}

/// Shuffles the feature list per run and hands it to an executor.
pub struct RandomOrderRunner<E> {
    executor: E,
    runs: usize,
    seed: u64,
}

impl<E: FeatureExecutor> RandomOrderRunner<E> {
    /// Runner with [`DEFAULT_RUNS`] passes and a random seed.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            runs: DEFAULT_RUNS,
            seed: rand::random(),
        }
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Execute `runs` shuffled passes over `features`.
    ///
    /// Failing scenarios are tallied in the report rather than returned; call
    /// [`RunReport::ensure_passed`] to turn them into an error.
    pub async fn run(&self, features: &[PathBuf]) -> Result<RunReport> {
        if self.runs == 0 {
            return Err(StoryError::InvalidInput(
                "number of runs must be at least 1".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut report = RunReport::new(self.seed, features.len());

        println!("{}", style("=== Random Order Test Runner ===").bold());
        println!(
            "Running all feature files {} times in random order (seed {})",
            self.runs,
            style(self.seed).cyan()
        );

        for run in 1..=self.runs {
            println!();
            println!(
                "{}",
                style(format!("=== Starting Test Run {run} of {} ===", self.runs)).bold()
            );

            let mut shuffled = features.to_vec();
            shuffled.shuffle(&mut rng);

            let order: Vec<String> = shuffled.iter().map(|p| feature_name(p)).collect();
            println!("Execution order for run {run}:");
            for (i, name) in order.iter().enumerate() {
                println!("{}. {}", i + 1, name);
            }
            println!();

            tracing::info!(run, order = %order.join(","), "Starting run");
            let passed = self.executor.execute(&shuffled).await?;

            if passed {
                println!("{} Run {run} PASSED", style("✓").green());
            } else {
                println!("{} Run {run} FAILED", style("✗").red());
            }

            report.record(RunOutcome { run, order, passed });
        }

        Ok(report)
    }
}
