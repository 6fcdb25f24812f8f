//! Process control capability used by the guard.

use std::ffi::OsString;
use std::fmt;

use crate::pid::Pid;

/// Command line of the process the guard keeps running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: OsString,
    args: Vec<OsString>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// What a termination attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The signal was delivered.
    Signalled,
    /// No process has this pid.
    NotFound,
    /// The process exists but belongs to someone else.
    Denied,
}

/// Spawn, probe, and terminate OS processes.
///
/// The guard only talks to processes through this trait so the lifecycle
/// can be exercised against [`InMemoryProcessControl`](crate::InMemoryProcessControl).
pub trait ProcessControl: Send + Sync {
    /// Launch `spec` detached from the caller and return its pid.
    fn spawn_detached(&self, spec: &LaunchSpec) -> std::io::Result<Pid>;

    /// Whether a live process currently has this pid.
    fn is_alive(&self, pid: Pid) -> bool;

    /// Ask the process to terminate. Never blocks.
    fn terminate(&self, pid: Pid) -> Termination;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_spec_builder() {
        let spec = LaunchSpec::new("xautolock")
            .arg("-time")
            .arg("5")
            .args(["-locker", "i3lock -n"]);
        assert_eq!(spec.program(), "xautolock");
        assert_eq!(spec.get_args().len(), 4);
        assert_eq!(spec.get_args()[3], "i3lock -n");
    }

    #[test]
    fn test_launch_spec_display_quotes_spaced_args() {
        let spec = LaunchSpec::new("xautolock").args(["-locker", "i3lock -n"]);
        assert_eq!(spec.to_string(), r#"xautolock -locker "i3lock -n""#);
    }
}
