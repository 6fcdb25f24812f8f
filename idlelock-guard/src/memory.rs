//! In-memory ProcessControl implementation for testing.
//!
//! Keeps a fake process table so guard lifecycles can be exercised
//! without spawning anything. Terminated processes exit immediately.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use crate::pid::Pid;
use crate::process::{LaunchSpec, ProcessControl, Termination};

/// First pid handed out by [`InMemoryProcessControl`].
const FIRST_PID: u32 = 1000;

#[derive(Debug)]
struct Table {
    next_pid: u32,
    alive: BTreeSet<Pid>,
    /// Pids that exist but reject our signals.
    foreign: BTreeSet<Pid>,
    spawned: Vec<(Pid, LaunchSpec)>,
    terminated: Vec<Pid>,
    fail_next_spawn: bool,
}

/// In-memory process table.
#[derive(Debug)]
pub struct InMemoryProcessControl {
    table: Mutex<Table>,
}

impl InMemoryProcessControl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                next_pid: FIRST_PID,
                alive: BTreeSet::new(),
                foreign: BTreeSet::new(),
                spawned: Vec::new(),
                terminated: Vec::new(),
                fail_next_spawn: false,
            }),
        }
    }

    /// Make the next `spawn_detached` call fail with `NotFound`.
    pub fn fail_next_spawn(&self) {
        self.table().fail_next_spawn = true;
    }

    /// Simulate a process exiting on its own.
    pub fn exit(&self, pid: Pid) {
        self.table().alive.remove(&pid);
    }

    /// Simulate an unrelated process holding `pid`.
    pub fn mark_alive(&self, pid: Pid) {
        self.table().alive.insert(pid);
    }

    /// Simulate a live process owned by another user.
    pub fn mark_foreign(&self, pid: Pid) {
        let mut table = self.table();
        table.alive.insert(pid);
        table.foreign.insert(pid);
    }

    /// Every live pid, ascending.
    pub fn alive(&self) -> Vec<Pid> {
        self.table().alive.iter().copied().collect()
    }

    /// Every successful spawn, in order.
    pub fn spawned(&self) -> Vec<(Pid, LaunchSpec)> {
        self.table().spawned.clone()
    }

    /// Every pid a termination signal was delivered to, in order.
    pub fn terminated(&self) -> Vec<Pid> {
        self.table().terminated.clone()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for InMemoryProcessControl {
    fn spawn_detached(&self, spec: &LaunchSpec) -> std::io::Result<Pid> {
        let mut table = self.table();
        if std::mem::take(&mut table.fail_next_spawn) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", spec.program().to_string_lossy()),
            ));
        }

        let pid = loop {
            let candidate = Pid::new(table.next_pid).map_err(std::io::Error::other)?;
            table.next_pid += 1;
            if !table.alive.contains(&candidate) {
                break candidate;
            }
        };
        table.alive.insert(pid);
        table.spawned.push((pid, spec.clone()));
        Ok(pid)
    }

    fn is_alive(&self, pid: Pid) -> bool {
        self.table().alive.contains(&pid)
    }

    fn terminate(&self, pid: Pid) -> Termination {
        let mut table = self.table();
        if table.foreign.contains(&pid) {
            return Termination::Denied;
        }
        if table.alive.remove(&pid) {
            table.terminated.push(pid);
            Termination::Signalled
        } else {
            Termination::NotFound
        }
    }
}
