//! Start/stop/status for one background process guarded by a pid record.
//!
//! Every operation reconciles the record against the live process table
//! first, so each is safe to repeat from unrelated invocations:
//!
//! ```text
//! INACTIVE --start--> ACTIVE --stop--> INACTIVE
//! ACTIVE --(process exits)--> STALE --status|start|stop--> INACTIVE
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{GuardError, Result};
use crate::pid::Pid;
use crate::process::{LaunchSpec, ProcessControl, Termination};
use crate::record::{PidFile, RecordState};

/// How long stop and restart wait for a signalled process to exit.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_millis(500);

/// Interval between liveness checks while waiting for exit.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Reconciled state of the guarded process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    /// No record exists.
    NoRecord,
    /// The record names a live process.
    ActiveVerified { pid: Pid },
    /// The record named a dead pid (or was corrupt) and has been deleted.
    StaleRecord { pid: Option<Pid> },
}

impl GuardStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::ActiveVerified { .. })
    }

    /// Pid of the live process, if any.
    pub fn pid(&self) -> Option<Pid> {
        match self {
            Self::ActiveVerified { pid } => Some(*pid),
            _ => None,
        }
    }
}

impl fmt::Display for GuardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActiveVerified { pid } => write!(f, "ACTIVE (pid {})", pid),
            Self::NoRecord | Self::StaleRecord { .. } => write!(f, "INACTIVE"),
        }
    }
}

/// What [`ProcessGuard::stop`] found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No record existed.
    NothingToStop,
    /// A live process was signalled. `exited` is false if it was still
    /// alive when the stop grace ran out.
    Stopped { pid: Pid, exited: bool },
    /// The record named a dead pid (or was corrupt); it was only deleted.
    StaleCleared { pid: Option<Pid> },
}

/// Owns the lifecycle of one detached process through a [`PidFile`].
#[derive(Debug)]
pub struct ProcessGuard<P> {
    record: PidFile,
    control: P,
    stop_grace: Duration,
}

impl<P: ProcessControl> ProcessGuard<P> {
    /// Create a guard storing its record at `pid_file`.
    pub fn new(pid_file: impl Into<PathBuf>, control: P) -> Self {
        Self {
            record: PidFile::new(pid_file),
            control,
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    /// Set how long to wait for a signalled process to exit.
    #[must_use]
    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    pub fn record(&self) -> &PidFile {
        &self.record
    }

    pub fn control(&self) -> &P {
        &self.control
    }

    pub fn stop_grace(&self) -> Duration {
        self.stop_grace
    }

    /// Launch `spec`, replacing any instance the record points at.
    ///
    /// Always overrides the previous instance, even when it was started
    /// from the same `spec`.
    pub fn start(&self, spec: &LaunchSpec) -> Result<Pid> {
        match self.record.read() {
            RecordState::Missing => {}
            RecordState::Present(pid) => {
                if self.control.is_alive(pid) {
                    info!(pid = %pid, "Replacing running instance");
                    self.terminate_and_wait(pid);
                } else {
                    debug!(pid = %pid, "Previous instance already exited");
                }
                self.record.clear();
            }
            RecordState::Corrupt(reason) => {
                warn!(
                    path = %self.record.path().display(),
                    reason = %reason,
                    "Discarding corrupt pid record"
                );
                self.record.clear();
            }
        }

        let pid = self
            .control
            .spawn_detached(spec)
            .map_err(|source| GuardError::Launch {
                program: spec.program().to_string_lossy().into_owned(),
                source,
            })?;

        if let Err(source) = self.record.write(pid) {
            // No untracked instance may outlive a failed start
            warn!(
                pid = %pid,
                error = %source,
                "Failed to record pid, terminating new instance"
            );
            self.control.terminate(pid);
            return Err(GuardError::Record {
                path: self.record.path().to_path_buf(),
                source,
            });
        }

        info!(pid = %pid, command = %spec, "Started guarded process");
        Ok(pid)
    }

    /// Terminate the recorded process and delete the record.
    ///
    /// The record is gone afterwards whatever the signal did.
    pub fn stop(&self) -> StopOutcome {
        let outcome = match self.record.read() {
            RecordState::Missing => return StopOutcome::NothingToStop,
            RecordState::Present(pid) => {
                if self.control.is_alive(pid) {
                    let exited = self.terminate_and_wait(pid);
                    info!(pid = %pid, exited, "Stopped guarded process");
                    StopOutcome::Stopped { pid, exited }
                } else {
                    debug!(pid = %pid, "Recorded process already exited");
                    StopOutcome::StaleCleared { pid: Some(pid) }
                }
            }
            RecordState::Corrupt(reason) => {
                warn!(
                    path = %self.record.path().display(),
                    reason = %reason,
                    "Discarding corrupt pid record"
                );
                StopOutcome::StaleCleared { pid: None }
            }
        };

        self.record.clear();
        outcome
    }

    /// Report whether the recorded process is alive.
    ///
    /// A record naming a dead pid is deleted here, so a later start never
    /// signals a pid the OS has since handed to something else.
    pub fn status(&self) -> GuardStatus {
        match self.record.read() {
            RecordState::Missing => GuardStatus::NoRecord,
            RecordState::Present(pid) if self.control.is_alive(pid) => {
                GuardStatus::ActiveVerified { pid }
            }
            RecordState::Present(pid) => {
                debug!(pid = %pid, "Clearing stale pid record");
                self.record.clear();
                GuardStatus::StaleRecord { pid: Some(pid) }
            }
            RecordState::Corrupt(reason) => {
                warn!(
                    path = %self.record.path().display(),
                    reason = %reason,
                    "Discarding corrupt pid record"
                );
                self.record.clear();
                GuardStatus::StaleRecord { pid: None }
            }
        }
    }

    /// Signal `pid` and wait up to the stop grace for it to go away.
    ///
    /// Returns whether the process is gone.
    fn terminate_and_wait(&self, pid: Pid) -> bool {
        match self.control.terminate(pid) {
            Termination::Signalled => {}
            Termination::NotFound => return true,
            Termination::Denied => {
                warn!(pid = %pid, "Not permitted to signal recorded process");
                return false;
            }
        }

        let deadline = Instant::now() + self.stop_grace;
        loop {
            if !self.control.is_alive(pid) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    pid = %pid,
                    grace = ?self.stop_grace,
                    "Process still alive after SIGTERM"
                );
                return false;
            }
            std::thread::sleep(EXIT_POLL_INTERVAL.min(deadline - now));
        }
    }
}
