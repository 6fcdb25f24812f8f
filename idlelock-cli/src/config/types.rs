use anyhow::{Result, bail};
use idlelock_guard::LaunchSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default idle-detection launcher
pub const DEFAULT_PROGRAM: &str = "xautolock";

/// Default idle time before locking, in minutes
pub const DEFAULT_INTERVAL_MINUTES: u32 = 5;

/// Default lock action
pub const DEFAULT_LOCKER: &str = "i3lock -n";

/// Default time to wait for a stopped launcher to exit
pub const DEFAULT_STOP_GRACE_MS: u64 = 500;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawIdlelockConfig {
    #[serde(default)]
    pub launcher: RawLauncherConfig,

    #[serde(default)]
    pub guard: RawGuardConfig,
}

/// Launcher config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawLauncherConfig {
    pub program: Option<String>,
    pub interval_minutes: Option<u32>,
    pub locker: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

/// Only the `[guard]` section of a config file; everything else is ignored
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawGuardLayer {
    #[serde(default)]
    pub guard: RawGuardConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawGuardConfig {
    pub pid_file: Option<PathBuf>,
    pub stop_grace_ms: Option<u64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IdlelockConfig {
    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default)]
    pub guard: GuardConfig,
}

/// The idle-detection launcher kept running by `idlelock start`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LauncherConfig {
    /// Launcher binary
    pub program: String,

    /// Minutes of inactivity before the locker runs
    pub interval_minutes: u32,

    /// Command string the launcher runs as the lock action
    pub locker: String,

    /// Appended verbatim after the generated arguments
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            locker: DEFAULT_LOCKER.to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl LauncherConfig {
    /// Command line for the launcher, in xautolock's argument convention
    pub fn launch_spec(&self) -> Result<LaunchSpec> {
        if self.program.trim().is_empty() {
            bail!("launcher.program must not be empty");
        }
        if self.interval_minutes == 0 {
            bail!("launcher.interval_minutes must be at least 1");
        }

        Ok(LaunchSpec::new(&self.program)
            .arg("-time")
            .arg(self.interval_minutes.to_string())
            .arg("-locker")
            .arg(&self.locker)
            .args(&self.extra_args))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardConfig {
    /// Pid record location
    pub pid_file: PathBuf,

    /// Milliseconds to wait for a signalled launcher to exit
    pub stop_grace_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            pid_file: idlelock_paths::default_pid_file(),
            stop_grace_ms: DEFAULT_STOP_GRACE_MS,
        }
    }
}

impl GuardConfig {
    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = IdlelockConfig::default();
        assert_eq!(config.launcher.program, "xautolock");
        assert_eq!(config.launcher.interval_minutes, 5);
        assert_eq!(config.launcher.locker, "i3lock -n");
        assert!(config.launcher.extra_args.is_empty());
        assert!(config.guard.pid_file.ends_with("idlelock/idlelock.pid"));
        assert_eq!(config.guard.stop_grace_ms, 500);
    }

    #[test]
    fn test_launch_spec_uses_xautolock_flags() {
        let launcher = LauncherConfig {
            extra_args: vec!["-detectsleep".to_string()],
            ..Default::default()
        };
        let spec = launcher.launch_spec().unwrap();

        assert_eq!(spec.program(), "xautolock");
        assert_eq!(
            spec.get_args(),
            ["-time", "5", "-locker", "i3lock -n", "-detectsleep"]
                .map(std::ffi::OsString::from)
                .as_slice()
        );
    }

    #[test]
    fn test_launch_spec_rejects_invalid_launcher() {
        let zero = LauncherConfig {
            interval_minutes: 0,
            ..Default::default()
        };
        assert!(zero.launch_spec().is_err());

        let blank = LauncherConfig {
            program: "  ".to_string(),
            ..Default::default()
        };
        assert!(blank.launch_spec().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = IdlelockConfig {
            launcher: LauncherConfig {
                program: "xidlehook".to_string(),
                interval_minutes: 15,
                locker: "slock".to_string(),
                extra_args: vec!["-corners".to_string(), "----".to_string()],
            },
            guard: GuardConfig {
                pid_file: PathBuf::from("/tmp/idlelock.pid"),
                stop_grace_ms: 50,
            },
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: IdlelockConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.guard.stop_grace(), Duration::from_millis(50));
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[launcher]
interval_minutes = 10
"#;
        let raw: RawIdlelockConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.launcher.interval_minutes, Some(10));
        assert!(raw.launcher.program.is_none());
        assert!(raw.launcher.locker.is_none());
        assert!(raw.guard.pid_file.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawIdlelockConfig = toml::from_str("").unwrap();
        assert!(raw.launcher.program.is_none());
        assert!(raw.launcher.extra_args.is_none());
        assert!(raw.guard.stop_grace_ms.is_none());
    }

    #[test]
    fn test_raw_config_rejects_unknown_keys() {
        let result: Result<RawIdlelockConfig, _> = toml::from_str("[launcher]\ntimeout = 3\n");
        assert!(result.is_err());
    }
}
