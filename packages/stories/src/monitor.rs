//! Host CPU and memory sampling while a load experiment runs.
//!
//! A baseline is taken before the experiment starts. A background task then
//! samples global CPU usage and available memory on a fixed interval until the
//! handle is stopped, and the samples are reduced to averages and the change
//! against the baseline.

use std::time::Duration;

use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Time between samples when none is given.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One reading of the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub cpu_percent: f32,
    pub free_memory_mb: f64,
}

/// Resource figures for one experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceUsage {
    pub avg_cpu_percent: f32,
    pub avg_free_memory_mb: f64,
    /// Average CPU above the baseline, floored at zero.
    pub cpu_increase: f32,
    /// Baseline free memory minus the average free memory during the run.
    pub memory_consumed_mb: f64,
}

impl ResourceUsage {
    /// Reduce `samples` against `baseline`. No samples gives all zeros.
    pub fn from_samples(baseline: Sample, samples: &[Sample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len();
        let avg_cpu_percent = samples.iter().map(|s| s.cpu_percent).sum::<f32>() / n as f32;
        let avg_free_memory_mb = samples.iter().map(|s| s.free_memory_mb).sum::<f64>() / n as f64;

        Self {
            avg_cpu_percent,
            avg_free_memory_mb,
            cpu_increase: (avg_cpu_percent - baseline.cpu_percent).max(0.0),
            memory_consumed_mb: baseline.free_memory_mb - avg_free_memory_mb,
        }
    }
}

struct Sampler {
    system: System,
}

impl Sampler {
    fn new() -> Self {
        let mut system = System::new();
        // CPU usage is a delta between refreshes; the first one only primes it.
        system.refresh_cpu_usage();
        Self { system }
    }

    fn sample(&mut self) -> Sample {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
        Sample {
            cpu_percent: self.system.global_cpu_usage(),
            free_memory_mb: self.system.available_memory() as f64 / BYTES_PER_MB,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceMonitor {
    interval: Duration,
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}

impl ResourceMonitor {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Take the baseline, then sample in the background until [`MonitorHandle::stop`].
    pub async fn start(&self) -> MonitorHandle {
        let mut sampler = Sampler::new();
        tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
        let baseline = sampler.sample();
        tracing::debug!(
            cpu = baseline.cpu_percent,
            free_mb = baseline.free_memory_mb,
            "Resource baseline"
        );

        let (stop, mut stopped) = oneshot::channel::<()>();
        let period = self.interval;
        let task = tokio::spawn(async move {
            let mut samples = Vec::new();
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => samples.push(sampler.sample()),
                }
            }
            samples
        });

        MonitorHandle {
            baseline,
            stop,
            task,
        }
    }
}

/// A running sampler.
#[derive(Debug)]
pub struct MonitorHandle {
    baseline: Sample,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Vec<Sample>>,
}

impl MonitorHandle {
    pub fn baseline(&self) -> Sample {
        self.baseline
    }

    /// Stop sampling and reduce what was collected.
    pub async fn stop(self) -> ResourceUsage {
        // The receiver only disappears when the task is already gone.
        let _ = self.stop.send(());
        let samples = match self.task.await {
            Ok(samples) => samples,
            Err(e) => {
                tracing::warn!(error = %e, "Resource sampler stopped abnormally");
                Vec::new()
            }
        };
        tracing::debug!(samples = samples.len(), "Resource sampling finished");
        ResourceUsage::from_samples(self.baseline, &samples)
    }
}
