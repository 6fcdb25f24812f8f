//! `idlelock stop`

use std::io::Write;

use anyhow::Result;
use idlelock_guard::{ProcessControl, ProcessGuard, StopOutcome};
use tracing::warn;

use crate::config::ConfigLoader;

/// Terminate the launcher and clear its record
pub fn run() -> Result<()> {
    let config = ConfigLoader::load_guard()?;
    stop_to(&super::os_guard(&config), &mut std::io::stdout())
}

pub fn stop_to<P: ProcessControl>(guard: &ProcessGuard<P>, out: &mut impl Write) -> Result<()> {
    match guard.stop() {
        StopOutcome::NothingToStop => writeln!(out, "nothing to stop")?,
        StopOutcome::Stopped { pid, exited } => {
            if !exited {
                warn!(pid = %pid, "Launcher did not exit within the stop grace");
            }
            writeln!(out, "idlelock stopped (pid {})", pid)?
        }
        StopOutcome::StaleCleared { .. } => {
            writeln!(out, "idlelock was not running (stale record cleared)")?
        }
    }
    Ok(())
}
