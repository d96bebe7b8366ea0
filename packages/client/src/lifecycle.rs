//! Service lifecycle: shutdown endpoint, process launch and readiness polling.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::config::{ClientConfig, READINESS_ENDPOINT, SHUTDOWN_ENDPOINT};
use crate::error::{ClientError, Result};
use crate::http::TodoManagerClient;

/// Ask the service to exit.
///
/// The service drops the connection while exiting, so transport errors count as success.
pub async fn shutdown(client: &TodoManagerClient) -> Result<()> {
    match client.get(SHUTDOWN_ENDPOINT).await {
        Ok(response) => {
            tracing::debug!(status = response.status, "Shutdown acknowledged");
            Ok(())
        }
        Err(ClientError::Http(e)) => {
            tracing::debug!(error = %e, "Connection dropped during shutdown");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// True when the readiness endpoint answers 200.
pub async fn is_ready(client: &TodoManagerClient) -> bool {
    matches!(client.get(READINESS_ENDPOINT).await, Ok(r) if r.status == 200)
}

/// Poll the readiness endpoint until it answers 200.
///
/// Returns the 1-based attempt on which the service became ready.
pub async fn wait_until_ready(
    client: &TodoManagerClient,
    attempts: u32,
    interval: Duration,
) -> Result<u32> {
    for attempt in 1..=attempts {
        match client.get(READINESS_ENDPOINT).await {
            Ok(response) if response.status == 200 => {
                tracing::info!(attempt, base_url = %client.base_url(), "Service ready");
                return Ok(attempt);
            }
            Ok(response) => {
                tracing::debug!(attempt, status = response.status, "Service not ready yet");
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "Service not reachable yet");
            }
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(ClientError::NotReady {
        base_url: client.base_url().to_string(),
        attempts,
        interval,
    })
}

/// Poll until the service stops answering (connection refused or timeout).
pub async fn wait_until_stopped(
    client: &TodoManagerClient,
    attempts: u32,
    interval: Duration,
) -> Result<()> {
    for attempt in 1..=attempts {
        match client.get(READINESS_ENDPOINT).await {
            Err(e) => {
                tracing::debug!(attempt, error = %e, "Service stopped");
                return Ok(());
            }
            Ok(response) => {
                tracing::debug!(attempt, status = response.status, "Service still answering");
            }
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(ClientError::StillRunning {
        base_url: client.base_url().to_string(),
        attempts,
    })
}

/// A Todo Manager launched from its jar.
///
/// Dropping the handle leaves the process running; stop it through
/// [`shutdown`] or [`ServerProcess::kill`].
#[derive(Debug)]
pub struct ServerProcess {
    child: Child,
    jar: PathBuf,
}

impl ServerProcess {
    /// Launch `java -jar <jar>` with output discarded.
    pub fn spawn(jar: &Path) -> Result<Self> {
        let child = Command::new("java")
            .arg("-jar")
            .arg(jar)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tracing::info!(pid = ?child.id(), jar = %jar.display(), "Started Todo Manager");
        Ok(Self {
            child,
            jar: jar.to_path_buf(),
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn jar(&self) -> &Path {
        &self.jar
    }

    /// Force-kill the process and reap it.
    pub async fn kill(mut self) -> Result<()> {
        self.child.kill().await?;
        Ok(())
    }
}

/// Shut the service down and start a fresh instance from the configured jar.
///
/// A fresh instance holds only the service's built-in seed data.
pub async fn restart(client: &TodoManagerClient, config: &ClientConfig) -> Result<ServerProcess> {
    let jar = config
        .server_jar
        .as_deref()
        .ok_or(ClientError::JarNotConfigured)?;

    shutdown(client).await?;
    wait_until_stopped(client, config.ready_attempts, config.ready_interval).await?;

    let process = ServerProcess::spawn(jar)?;
    wait_until_ready(client, config.ready_attempts, config.ready_interval).await?;
    Ok(process)
}
