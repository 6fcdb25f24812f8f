//! `idlelock start`

use std::io::Write;

use anyhow::{Context, Result};
use idlelock_guard::{LaunchSpec, ProcessControl, ProcessGuard};
use tracing::debug;

use crate::config::ConfigLoader;

/// (Re)launch the idle-detection launcher
pub fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    let spec = config.launcher.launch_spec()?;
    let guard = super::os_guard(&config.guard);
    start_to(&guard, &spec, &mut std::io::stdout())
}

pub fn start_to<P: ProcessControl>(
    guard: &ProcessGuard<P>,
    spec: &LaunchSpec,
    out: &mut impl Write,
) -> Result<()> {
    debug!(command = %spec, pid_file = %guard.record().path().display(), "Starting launcher");
    let pid = guard
        .start(spec)
        .context("Could not start the idle-detection launcher")?;
    writeln!(out, "idlelock started (pid {})", pid)?;
    Ok(())
}
