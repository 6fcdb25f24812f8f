use super::types::{
    DEFAULT_STOP_GRACE_MS, GuardConfig, IdlelockConfig, LauncherConfig, RawGuardConfig,
    RawGuardLayer, RawIdlelockConfig, RawLauncherConfig,
};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment variable naming an extra config file layered over the user config
pub const CONFIG_ENV_VAR: &str = "IDLELOCK_CONFIG";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (defaults, user config, `IDLELOCK_CONFIG`)
    pub fn load() -> Result<IdlelockConfig> {
        Self::load_layers(&Self::layer_paths())
    }

    /// Load only the `[guard]` section
    ///
    /// `stop` and `status` go through here so an edited `[launcher]`
    /// section never keeps them from reaching a running instance.
    pub fn load_guard() -> Result<GuardConfig> {
        Self::load_guard_layers(&Self::layer_paths())
    }

    fn layer_paths() -> Vec<PathBuf> {
        let mut layers = vec![Self::user_config_path()];
        if let Some(path) = Self::override_config_path() {
            layers.push(path);
        }
        layers
    }

    /// Get user config path (`$XDG_CONFIG_HOME/idlelock/config.toml`)
    pub fn user_config_path() -> PathBuf {
        idlelock_paths::config_dir().join("config.toml")
    }

    /// Get the override config path, if `IDLELOCK_CONFIG` is set
    pub fn override_config_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// Merge the given files in order; missing files are skipped
    pub fn load_layers(paths: &[PathBuf]) -> Result<IdlelockConfig> {
        let mut raw = RawIdlelockConfig::default();

        for path in paths {
            if let Some(layer) = Self::read_raw(path)? {
                raw = Self::merge_raw(raw, layer);
            }
        }

        Ok(Self::finalize(raw))
    }

    /// Merge the `[guard]` sections of the given files; other sections are ignored
    pub fn load_guard_layers(paths: &[PathBuf]) -> Result<GuardConfig> {
        let mut guard = RawGuardConfig::default();

        for path in paths {
            if let Some(layer) = Self::read_raw::<RawGuardLayer>(path)? {
                guard = Self::merge_guard(guard, layer.guard);
            }
        }

        Ok(Self::finalize_guard(guard))
    }

    fn read_raw<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(Some(raw))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawIdlelockConfig, overlay: RawIdlelockConfig) -> RawIdlelockConfig {
        RawIdlelockConfig {
            launcher: RawLauncherConfig {
                program: overlay.launcher.program.or(base.launcher.program),
                interval_minutes: overlay
                    .launcher
                    .interval_minutes
                    .or(base.launcher.interval_minutes),
                locker: overlay.launcher.locker.or(base.launcher.locker),
                extra_args: overlay.launcher.extra_args.or(base.launcher.extra_args),
            },
            guard: Self::merge_guard(base.guard, overlay.guard),
        }
    }

    fn merge_guard(base: RawGuardConfig, overlay: RawGuardConfig) -> RawGuardConfig {
        RawGuardConfig {
            pid_file: overlay.pid_file.or(base.pid_file),
            stop_grace_ms: overlay.stop_grace_ms.or(base.stop_grace_ms),
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawIdlelockConfig) -> IdlelockConfig {
        let defaults = LauncherConfig::default();
        let launcher = LauncherConfig {
            program: raw.launcher.program.unwrap_or(defaults.program),
            interval_minutes: raw
                .launcher
                .interval_minutes
                .unwrap_or(defaults.interval_minutes),
            locker: raw.launcher.locker.unwrap_or(defaults.locker),
            extra_args: raw.launcher.extra_args.unwrap_or_default(),
        };

        IdlelockConfig {
            launcher,
            guard: Self::finalize_guard(raw.guard),
        }
    }

    fn finalize_guard(raw: RawGuardConfig) -> GuardConfig {
        GuardConfig {
            pid_file: raw
                .pid_file
                .unwrap_or_else(idlelock_paths::default_pid_file),
            stop_grace_ms: raw.stop_grace_ms.unwrap_or(DEFAULT_STOP_GRACE_MS),
        }
    }
}
