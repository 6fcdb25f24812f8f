//! Real process control backed by the operating system.

#[cfg(unix)]
use tracing::debug;

use crate::pid::Pid;
use crate::process::{LaunchSpec, ProcessControl, Termination};

/// Spawns and signals real processes.
///
/// Spawned processes run in their own session so they outlive the CLI
/// invocation that started them.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcessControl;

impl OsProcessControl {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ProcessControl for OsProcessControl {
    fn spawn_detached(&self, spec: &LaunchSpec) -> std::io::Result<Pid> {
        use std::os::unix::process::CommandExt;
        use std::process::Stdio;

        let mut cmd = std::process::Command::new(spec.program());
        cmd.args(spec.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // SAFETY: pre_exec runs after fork, before exec. setsid is
        // async-signal-safe and makes the child a session leader, detaching
        // it from the controlling terminal and the caller's process group.
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let child = cmd.spawn()?;
        let pid = Pid::new(child.id()).map_err(std::io::Error::other)?;

        // The child is never waited on; it is reparented to init once
        // this process exits.
        drop(child);

        debug!(pid = %pid, command = %spec, "Spawned detached process");
        Ok(pid)
    }

    fn is_alive(&self, pid: Pid) -> bool {
        // SAFETY: signal 0 performs the existence and permission checks
        // without delivering anything.
        let exists = unsafe { libc::kill(pid.as_u32() as libc::pid_t, 0) } == 0
            || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM);

        exists && !is_zombie(pid)
    }

    fn terminate(&self, pid: Pid) -> Termination {
        // SAFETY: Pid excludes 0 and negative values, so this never
        // targets a process group.
        let rc = unsafe { libc::kill(pid.as_u32() as libc::pid_t, libc::SIGTERM) };
        if rc == 0 {
            debug!(pid = %pid, "Sent SIGTERM");
            return Termination::Signalled;
        }

        match std::io::Error::last_os_error().raw_os_error() {
            Some(libc::EPERM) => Termination::Denied,
            _ => Termination::NotFound,
        }
    }
}

/// An exited child that has not been reaped still answers `kill(pid, 0)`.
#[cfg(target_os = "linux")]
fn is_zombie(pid: Pid) -> bool {
    let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
        return false;
    };
    // Format is "pid (comm) state ..."; comm may itself contain ')'.
    stat.rfind(')')
        .and_then(|idx| stat[idx + 1..].split_whitespace().next())
        .is_some_and(|state| state == "Z" || state == "X")
}

#[cfg(all(unix, not(target_os = "linux")))]
fn is_zombie(_pid: Pid) -> bool {
    false
}

#[cfg(not(unix))]
impl ProcessControl for OsProcessControl {
    fn spawn_detached(&self, spec: &LaunchSpec) -> std::io::Result<Pid> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("detached launch is not supported on this platform: {spec}"),
        ))
    }

    fn is_alive(&self, _pid: Pid) -> bool {
        false
    }

    fn terminate(&self, _pid: Pid) -> Termination {
        Termination::NotFound
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn wait_until_dead(control: &OsProcessControl, pid: Pid) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if !control.is_alive(pid) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn test_current_process_is_alive() {
        assert!(OsProcessControl.is_alive(Pid::current()));
    }

    #[test]
    fn test_nonexistent_process_is_not_alive() {
        // Above the default pid_max of 4194304
        let pid = Pid::new(999_999_999).unwrap();
        assert!(!OsProcessControl.is_alive(pid));
        assert_eq!(OsProcessControl.terminate(pid), Termination::NotFound);
    }

    // Relies on zombie detection: the test process never reaps the child.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_spawn_and_terminate() {
        let control = OsProcessControl::new();
        let pid = control
            .spawn_detached(&LaunchSpec::new("sleep").arg("30"))
            .unwrap();

        assert!(control.is_alive(pid));
        assert_eq!(control.terminate(pid), Termination::Signalled);
        assert!(wait_until_dead(&control, pid));
    }

    #[test]
    fn test_spawn_missing_binary_fails() {
        let err = OsProcessControl
            .spawn_detached(&LaunchSpec::new("/nonexistent/idlelock-launcher"))
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
