//! CRUD timing runner.
//!
//! For each load level: create N objects with random payloads, update each with
//! PUT, delete each, then GET the collection once. Each phase is timed as a
//! whole, and host CPU and memory are sampled for the whole experiment. Failed
//! requests are counted, never raised.

use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use todomanager_client::resource::{entity_id, entity_view};
use todomanager_client::{ApiResponse, ResourceKind, TodoManagerClient};

use crate::monitor::{ResourceMonitor, ResourceUsage};

/// Object counts per experiment when none are given.
pub const DEFAULT_LEVELS: [usize; 4] = [10, 100, 500, 1000];

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Wall-clock time of each phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
    pub get: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub kind: ResourceKind,
    /// Requested number of objects.
    pub objects: usize,
    /// Objects the service confirmed with an id.
    pub created: usize,
    /// Requests that errored or came back with a non-2xx status.
    pub failures: usize,
    pub timings: PhaseTimings,
    pub resources: ResourceUsage,
}

fn random_letters(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(LETTERS[rng.random_range(0..LETTERS.len())]))
        .collect()
}

/// Random create/update body for `kind`.
pub fn random_payload(kind: ResourceKind, rng: &mut impl Rng) -> Value {
    match kind {
        ResourceKind::Todo => json!({
            "title": random_letters(rng, 10),
            "description": random_letters(rng, 20).to_lowercase(),
            "doneStatus": rng.random_bool(0.5),
        }),
        ResourceKind::Project => json!({
            "title": format!("Proj-{}", random_letters(rng, 8)),
            "completed": rng.random_bool(0.5),
            "active": true,
            "description": "Project test description",
        }),
        ResourceKind::Category => json!({
            "title": format!("Cat-{}", random_letters(rng, 8)),
            "description": random_letters(rng, 20).to_lowercase(),
        }),
    }
}

pub struct LoadRunner {
    client: TodoManagerClient,
    rng: StdRng,
    monitor: ResourceMonitor,
    show_progress: bool,
}

impl LoadRunner {
    pub fn new(client: TodoManagerClient) -> Self {
        Self {
            client,
            rng: StdRng::from_os_rng(),
            monitor: ResourceMonitor::default(),
            show_progress: true,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_monitor(mut self, monitor: ResourceMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress(&self, len: usize, message: String) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg:<24} [{bar:30.cyan/blue}] {pos}/{len}")
                .expect("valid template"),
        );
        pb.set_message(message);
        pb
    }

    /// Run one create/update/delete/get cycle with `objects` objects.
    pub async fn run_level(&mut self, kind: ResourceKind, objects: usize) -> LoadResult {
        let collection = kind.collection_path();
        let mut failures = 0;
        let mut ids = Vec::with_capacity(objects);

        tracing::info!(%kind, objects, "Starting load experiment");
        let sampling = self.monitor.start().await;

        let pb = self.progress(objects, format!("Creating {}", kind.collection()));
        let started = Instant::now();
        for _ in 0..objects {
            let body = random_payload(kind, &mut self.rng);
            match self.client.post(&collection, Some(&body)).await {
                Ok(response) if response.is_success() => {
                    let id = response
                        .json()
                        .ok()
                        .and_then(|v| entity_view(&v, kind).and_then(entity_id));
                    match id {
                        Some(id) => ids.push(id),
                        None => failures += 1,
                    }
                }
                Ok(response) => {
                    tracing::debug!(%kind, status = response.status, "Create rejected");
                    failures += 1;
                }
                Err(e) => {
                    tracing::debug!(%kind, error = %e, "Create failed");
                    failures += 1;
                }
            }
            pb.inc(1);
        }
        let create = started.elapsed();
        pb.finish_and_clear();

        let pb = self.progress(ids.len(), format!("Updating {}", kind.collection()));
        let started = Instant::now();
        for id in &ids {
            let body = random_payload(kind, &mut self.rng);
            if !succeeded(self.client.put(&kind.instance_path(id), Some(&body)).await) {
                failures += 1;
            }
            pb.inc(1);
        }
        let update = started.elapsed();
        pb.finish_and_clear();

        let pb = self.progress(ids.len(), format!("Deleting {}", kind.collection()));
        let started = Instant::now();
        for id in &ids {
            if !succeeded(self.client.delete(&kind.instance_path(id)).await) {
                failures += 1;
            }
            pb.inc(1);
        }
        let delete = started.elapsed();
        pb.finish_and_clear();

        let started = Instant::now();
        if !succeeded(self.client.get(&collection).await) {
            failures += 1;
        }
        let get = started.elapsed();
        let resources = sampling.stop().await;

        LoadResult {
            kind,
            objects,
            created: ids.len(),
            failures,
            timings: PhaseTimings {
                create,
                update,
                delete,
                get,
            },
            resources,
        }
    }

    /// Every level for every kind, printing each result as it completes.
    pub async fn run(&mut self, kinds: &[ResourceKind], levels: &[usize]) -> Vec<LoadResult> {
        let mut results = Vec::with_capacity(kinds.len() * levels.len());
        for &kind in kinds {
            for &objects in levels {
                println!(
                    "\n{} {} with {} objects",
                    style("Experiment").bold(),
                    style(kind.collection()).cyan(),
                    style(objects).green()
                );
                let result = self.run_level(kind, objects).await;
                print_result(&result);
                results.push(result);
            }
        }
        results
    }
}

fn succeeded(result: todomanager_client::Result<ApiResponse>) -> bool {
    match result {
        Ok(response) => response.is_success(),
        Err(e) => {
            tracing::debug!(error = %e, "Request failed");
            false
        }
    }
}

fn secs(d: Duration) -> String {
    format!("{:.4}s", d.as_secs_f64())
}

pub fn print_result(result: &LoadResult) {
    let t = &result.timings;
    println!("  > Create Time: {}", secs(t.create));
    println!("  > Update Time: {}", secs(t.update));
    println!("  > Delete Time: {}", secs(t.delete));
    println!("  > Get Time: {}", secs(t.get));
    let r = &result.resources;
    println!("  > Avg CPU Use: {:.2}%", r.avg_cpu_percent);
    println!("  > Avg Free RAM: {:.2} MB", r.avg_free_memory_mb);
    println!("  > CPU Increase: {:.2}%", r.cpu_increase);
    println!("  > Memory Consumed: {:.2} MB", r.memory_consumed_mb);
    if result.failures > 0 {
        println!(
            "  > Failed Requests: {}",
            style(result.failures).yellow().bold()
        );
    }
}

/// Summary table over all experiments.
pub fn print_summary(results: &[LoadResult]) {
    println!("\n{}", style("=== Load Summary ===").bold());
    println!(
        "{:<12} {:>8} {:>8} {:>12} {:>12} {:>12} {:>12} {:>8} {:>12} {:>9}",
        "resource",
        "objects",
        "created",
        "create",
        "update",
        "delete",
        "get",
        "cpu%",
        "free RAM",
        "failures"
    );
    for r in results {
        let t = &r.timings;
        println!(
            "{:<12} {:>8} {:>8} {:>12} {:>12} {:>12} {:>12} {:>8.2} {:>12} {:>9}",
            r.kind.collection(),
            r.objects,
            r.created,
            secs(t.create),
            secs(t.update),
            secs(t.delete),
            secs(t.get),
            r.resources.avg_cpu_percent,
            format!("{:.2} MB", r.resources.avg_free_memory_mb),
            r.failures
        );
    }
}
