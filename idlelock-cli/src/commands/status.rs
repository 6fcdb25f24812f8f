//! `idlelock status`

use std::io::Write;

use anyhow::Result;
use idlelock_guard::{GuardStatus, ProcessControl, ProcessGuard};
use tracing::{debug, info};

use crate::config::ConfigLoader;

/// Report ACTIVE (pid) or INACTIVE
pub fn run() -> Result<()> {
    let config = ConfigLoader::load_guard()?;
    status_to(&super::os_guard(&config), &mut std::io::stdout())
}

pub fn status_to<P: ProcessControl>(guard: &ProcessGuard<P>, out: &mut impl Write) -> Result<()> {
    let status = guard.status();
    match status.pid() {
        Some(pid) => debug!(pid = %pid, "Launcher is running"),
        None if matches!(status, GuardStatus::StaleRecord { .. }) => {
            info!(path = %guard.record().path().display(), "Removed stale pid record")
        }
        None => {}
    }
    writeln!(out, "{}", status)?;
    Ok(())
}
