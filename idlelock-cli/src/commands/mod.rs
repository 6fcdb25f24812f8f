//! Subcommand implementations.
//!
//! Each command loads configuration, builds an OS-backed guard, and writes
//! its result to stdout. The `*_to` variants take the guard and writer
//! explicitly so tests can drive them with an in-memory process table.

pub mod config;
pub mod start;
pub mod status;
pub mod stop;

use idlelock_guard::{OsProcessControl, ProcessGuard};

use crate::config::GuardConfig;

/// Guard over the configured pid file using real processes
pub fn os_guard(config: &GuardConfig) -> ProcessGuard<OsProcessControl> {
    ProcessGuard::new(&config.pid_file, OsProcessControl::new())
        .with_stop_grace(config.stop_grace())
}
