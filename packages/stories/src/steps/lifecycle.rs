//! Lifecycle steps
//!
//! Only meaningful when the suite may launch the service itself, so the runner
//! skips `@lifecycle` scenarios unless `TODO_MANAGER_JAR` is set.

use cucumber::{then, when};
use todomanager_client::lifecycle::{restart, shutdown, wait_until_ready, wait_until_stopped};

use crate::world::TodoWorld;

/// Tag marking scenarios that stop and start the service.
pub const LIFECYCLE_TAG: &str = "lifecycle";

#[when("I shut down the service")]
async fn shut_down(world: &mut TodoWorld) {
    if let Err(e) = shutdown(world.ctx.client()).await {
        panic!("Shutdown request failed: {e}");
    }
}

#[then("the service should stop responding")]
async fn service_stopped(world: &mut TodoWorld) {
    let config = world.ctx.config();
    let stopped =
        wait_until_stopped(world.ctx.client(), config.ready_attempts, config.ready_interval).await;
    if let Err(e) = stopped {
        panic!("{e}");
    }
}

#[when("I restart the service")]
async fn restart_service(world: &mut TodoWorld) {
    let restarted = restart(world.ctx.client(), world.ctx.config()).await;
    match restarted {
        Ok(process) => {
            tracing::info!(pid = ?process.pid(), "Service restarted");
            world.server = Some(process);
        }
        Err(e) => panic!("Restart failed: {e}"),
    }
}

#[then("the service should be ready")]
async fn service_ready(world: &mut TodoWorld) {
    let config = world.ctx.config();
    let ready =
        wait_until_ready(world.ctx.client(), config.ready_attempts, config.ready_interval).await;
    if let Err(e) = ready {
        panic!("{e}");
    }
}
