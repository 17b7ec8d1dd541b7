//! Per-install preferences for MathLearn.
//!
//! Stored as TOML at `<workspace>/config/config.toml`, where the workspace is
//! `MATHLEARN_HOME` when set, otherwise the OS data directory:
//!   %APPDATA%/MathLearn on Windows
//!   $XDG_DATA_HOME/MathLearn on Linux
//!   ~/Library/Application Support/MathLearn on macOS
//!
//! Every field has a serde default so hand-edited partial files still load.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the workspace root.
pub const HOME_ENV_VAR: &str = "MATHLEARN_HOME";

/// File name of the config inside `<workspace>/config`.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Play feedback sounds after each answer.
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Offer the strategy hint on each exercise.
    #[serde(default = "default_show_hints")]
    pub show_hints: bool,
    /// Run a countdown per exercise; expiry counts as a wrong answer.
    #[serde(default = "default_show_timer")]
    pub show_timer: bool,
    /// Countdown length in seconds, used only when `show_timer` is set.
    #[serde(default = "default_timer_duration_secs")]
    pub timer_duration_secs: u32,
    #[serde(default)]
    pub progression: ProgressionSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sound_enabled: default_sound_enabled(),
            show_hints: default_show_hints(),
            show_timer: default_show_timer(),
            timer_duration_secs: default_timer_duration_secs(),
            progression: ProgressionSettings::default(),
        }
    }
}

impl AppConfig {
    /// Countdown to arm for each exercise, if the timer is enabled.
    pub fn exercise_timer(&self) -> Option<Duration> {
        if self.show_timer && self.timer_duration_secs > 0 {
            Some(Duration::from_secs(u64::from(self.timer_duration_secs)))
        } else {
            None
        }
    }
}

const fn default_sound_enabled() -> bool {
    true
}

const fn default_show_hints() -> bool {
    true
}

const fn default_show_timer() -> bool {
    false
}

const fn default_timer_duration_secs() -> u32 {
    30
}

/// Knobs for the unlock cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressionSettings {
    #[serde(default)]
    pub grade_unlock: GradeUnlockPolicy,
}

/// When grade `n + 1` unlocks relative to the state of grade `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeUnlockPolicy {
    /// At least one operation of the grade is completed.
    #[default]
    AnyOperationCompleted,
    /// Every operation of the grade is completed.
    AllOperationsCompleted,
    /// All grades are open from the start.
    Always,
}

impl GradeUnlockPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            GradeUnlockPolicy::AnyOperationCompleted => "any_operation_completed",
            GradeUnlockPolicy::AllOperationsCompleted => "all_operations_completed",
            GradeUnlockPolicy::Always => "always",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "any_operation_completed" | "any" => Some(GradeUnlockPolicy::AnyOperationCompleted),
            "all_operations_completed" | "all" => Some(GradeUnlockPolicy::AllOperationsCompleted),
            "always" => Some(GradeUnlockPolicy::Always),
            _ => None,
        }
    }
}

/// Returns the root directory where MathLearn stores data.
///
/// Order of precedence:
/// 1. `MATHLEARN_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("MathLearn"))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from the workspace or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    load_from(&config_file_path()?)
}

/// Loads the configuration at `path`, defaulting when the file is absent.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let cfg: AppConfig = toml::from_str(&data)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    Ok(cfg)
}

/// Persists the configuration into the workspace.
pub fn save(config: &AppConfig) -> Result<PathBuf> {
    let path = config_file_path()?;
    save_to(config, &path)?;
    Ok(path)
}

pub fn save_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;
    }
    let data = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, data).with_context(|| format!("Failed to write config file {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_files_fill_in_defaults() {
        let cfg: AppConfig = toml::from_str("show_timer = true\n").unwrap();
        assert!(cfg.show_timer);
        assert!(cfg.sound_enabled);
        assert_eq!(cfg.timer_duration_secs, 30);
        assert_eq!(
            cfg.progression.grade_unlock,
            GradeUnlockPolicy::AnyOperationCompleted
        );
    }

    #[test]
    fn policy_reads_from_progression_table() {
        let cfg: AppConfig =
            toml::from_str("[progression]\ngrade_unlock = \"all_operations_completed\"\n").unwrap();
        assert_eq!(
            cfg.progression.grade_unlock,
            GradeUnlockPolicy::AllOperationsCompleted
        );
    }

    #[test]
    fn save_then_load_keeps_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config").join(CONFIG_FILE_NAME);
        let mut cfg = AppConfig::default();
        cfg.show_hints = false;
        cfg.timer_duration_secs = 45;
        save_to(&cfg, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn timer_only_arms_when_enabled() {
        let mut cfg = AppConfig::default();
        assert_eq!(cfg.exercise_timer(), None);
        cfg.show_timer = true;
        assert_eq!(cfg.exercise_timer(), Some(Duration::from_secs(30)));
    }
}
