//! PID-file guarded lifecycle for a single background process.
//!
//! A [`ProcessGuard`] starts, stops, and reports on exactly one detached
//! process. The only shared state between invocations is a [`PidFile`]
//! holding the pid as text; the record is advisory and is reconciled
//! against the live process table on every operation.
//!
//! # Key Types
//!
//! - [`ProcessGuard`] - start/stop/status over a pid record
//! - [`PidFile`] - the persisted pid record
//! - [`ProcessControl`] - spawn/probe/terminate capability
//! - [`OsProcessControl`] - real processes via `setsid` and signals
//! - [`InMemoryProcessControl`] - process table fake for tests

pub mod error;
pub mod guard;
pub mod memory;
pub mod os;
pub mod pid;
pub mod process;
pub mod record;

// Re-exports
pub use error::{GuardError, Result};
pub use guard::{DEFAULT_STOP_GRACE, GuardStatus, ProcessGuard, StopOutcome};
pub use memory::InMemoryProcessControl;
pub use os::OsProcessControl;
pub use pid::{InvalidPid, Pid};
pub use process::{LaunchSpec, ProcessControl, Termination};
pub use record::{PidFile, RecordState};
