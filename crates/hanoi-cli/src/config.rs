//! Configuration file management for hanoi.
//!
//! Provides a TOML-based config file at `~/.config/hanoi/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const STEP_DELAY_ENV: &str = "HANOI_STEP_DELAY_MS";
pub const MAX_DISKS_ENV: &str = "HANOI_MAX_DISKS";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub replay: ReplaySection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySection {
    /// Pause between replayed moves, in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// Largest disk count accepted by `plan`, `solve`, `replay` and `verify`.
    #[serde(default = "default_max_disks")]
    pub max_disks: u32,
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            max_disks: default_max_disks(),
        }
    }
}

fn default_step_delay_ms() -> u64 {
    HanoiConfig::DEFAULT_STEP_DELAY_MS
}

fn default_max_disks() -> u32 {
    HanoiConfig::DEFAULT_MAX_DISKS
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the hanoi config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/hanoi` or `~/.config/hanoi`,
/// never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("hanoi");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("hanoi")
}

/// Return the path to the hanoi config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Load the config file if it exists. A missing file is not an error; a
/// malformed one is.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides {
    pub step_delay_ms: Option<u64>,
    pub max_disks: Option<u32>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HanoiConfig {
    pub step_delay: Duration,
    pub max_disks: u32,
}

impl HanoiConfig {
    pub const DEFAULT_STEP_DELAY_MS: u64 = 500;
    pub const DEFAULT_MAX_DISKS: u32 = 10;

    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Step delay: `--step-delay-ms` > `HANOI_STEP_DELAY_MS` > `replay.step_delay_ms` > 500
    /// - Ceiling: `--max-disks` > `HANOI_MAX_DISKS` > `replay.max_disks` > 10
    pub fn resolve(cli: CliOverrides) -> Result<Self> {
        let file_config = load_config()?;
        Self::resolve_with(cli, file_config.as_ref())
    }

    /// Same as [`HanoiConfig::resolve`] with an already loaded file.
    pub fn resolve_with(cli: CliOverrides, file: Option<&ConfigFile>) -> Result<Self> {
        let step_delay_ms = if let Some(ms) = cli.step_delay_ms {
            ms
        } else if let Some(ms) = env_number::<u64>(STEP_DELAY_ENV)? {
            ms
        } else if let Some(cfg) = file {
            cfg.replay.step_delay_ms
        } else {
            Self::DEFAULT_STEP_DELAY_MS
        };

        let max_disks = if let Some(n) = cli.max_disks {
            n
        } else if let Some(n) = env_number::<u32>(MAX_DISKS_ENV)? {
            n
        } else if let Some(cfg) = file {
            cfg.replay.max_disks
        } else {
            Self::DEFAULT_MAX_DISKS
        };

        Ok(Self {
            step_delay: Duration::from_millis(step_delay_ms),
            max_disks,
        })
    }

    /// Reject disk counts above the configured ceiling.
    pub fn check_ceiling(&self, disks: u32) -> Result<()> {
        if disks > self.max_disks {
            bail!(
                "{disks} disks exceeds the configured maximum of {}; \
                 raise it with --max-disks or {MAX_DISKS_ENV}",
                self.max_disks
            );
        }
        Ok(())
    }
}

fn env_number<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("{name} is not a valid number: {raw:?}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
