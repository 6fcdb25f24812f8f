//! XDG Base Directory paths for idlelock.
//!
//! idlelock resolves XDG paths on every platform instead of the native
//! ones, so the pid file lands in the same place on Linux and macOS.

use std::path::PathBuf;

const APP_DIR: &str = "idlelock";

/// File name of the pid record inside [`state_dir`].
pub const PID_FILE_NAME: &str = "idlelock.pid";

/// Get the idlelock config directory.
///
/// Returns `$XDG_CONFIG_HOME/idlelock` if set, otherwise `~/.config/idlelock`.
///
/// # Examples
///
/// ```
/// use idlelock_paths::config_dir;
///
/// let config = config_dir().join("config.toml");
/// assert!(config.ends_with("idlelock/config.toml"));
/// ```
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Get the idlelock state directory.
///
/// Returns `$XDG_STATE_HOME/idlelock` if set, otherwise
/// `~/.local/state/idlelock`. The pid record lives here.
pub fn state_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
}

/// Default location of the pid record.
pub fn default_pid_file() -> PathBuf {
    state_dir().join(PID_FILE_NAME)
}

fn xdg_dir(env_var: &str, home_relative: &str) -> PathBuf {
    match std::env::var_os(env_var) {
        Some(base) if !base.is_empty() => PathBuf::from(base).join(APP_DIR),
        _ => match dirs::home_dir() {
            Some(home) => home.join(home_relative).join(APP_DIR),
            None => PathBuf::from(home_relative).join(APP_DIR),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_dir_ends_with_idlelock() {
        let path = config_dir();
        assert!(
            path.ends_with("idlelock"),
            "config_dir should end with 'idlelock'"
        );
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg_env() {
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/tmp/test-config");
        }
        let path = config_dir();
        assert_eq!(path, PathBuf::from("/tmp/test-config/idlelock"));
        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_state_dir_respects_xdg_env() {
        unsafe {
            std::env::set_var("XDG_STATE_HOME", "/tmp/test-state");
        }
        assert_eq!(state_dir(), PathBuf::from("/tmp/test-state/idlelock"));
        assert_eq!(
            default_pid_file(),
            PathBuf::from("/tmp/test-state/idlelock/idlelock.pid")
        );
        unsafe {
            std::env::remove_var("XDG_STATE_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_empty_xdg_var_falls_back_to_home() {
        unsafe {
            std::env::set_var("XDG_STATE_HOME", "");
        }
        let path = state_dir();
        assert!(path.ends_with(".local/state/idlelock"));
        unsafe {
            std::env::remove_var("XDG_STATE_HOME");
        }
    }
}
