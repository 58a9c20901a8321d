//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;

use crate::core::error::BenchError;
use crate::core::executor::ExecutorSettings;
use crate::core::sampler::DelayRange;

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".cbench.yaml";

/// Component Bench configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Random seed for reproducible runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Lower bound of the simulated instrument latency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_min_ms: Option<u64>,

    /// Upper bound of the simulated instrument latency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_max_ms: Option<u64>,

    /// Per-component test timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Default report format (text, json, yaml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

/// Valid configuration keys with descriptions
pub const VALID_KEYS: &[(&str, &str)] = &[
    ("seed", "Random seed for reproducible runs"),
    ("delay_min_ms", "Minimum simulated instrument latency (ms)"),
    ("delay_max_ms", "Maximum simulated instrument latency (ms)"),
    ("timeout_ms", "Per-component test timeout (ms)"),
    ("default_format", "Default report format (text, json, yaml)"),
];

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_from(
            Self::global_config_path().as_deref(),
            Some(Path::new(LOCAL_CONFIG_FILE)),
            |key| std::env::var(key).ok(),
        )
    }

    /// Load from explicit file locations and an environment lookup
    pub fn load_from(
        global_path: Option<&Path>,
        local_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        // 1. Built-in defaults (already in Default impl)
        let mut config = Config::default();

        // 2. Global user config (~/.config/cbench/config.yaml)
        if let Some(global) = global_path.and_then(Self::read_file) {
            config.merge(global);
        }

        // 3. Local config (./.cbench.yaml)
        if let Some(local) = local_path.and_then(Self::read_file) {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env(env));

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cbench")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Skipping unreadable config {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Skipping malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    fn from_env(env: impl Fn(&str) -> Option<String>) -> Config {
        let number = |key: &str| -> Option<u64> {
            let raw = env(key)?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring {}={:?}: not a non-negative integer", key, raw);
                    None
                }
            }
        };

        Config {
            seed: number("CBENCH_SEED"),
            delay_min_ms: number("CBENCH_DELAY_MIN_MS"),
            delay_max_ms: number("CBENCH_DELAY_MAX_MS"),
            timeout_ms: number("CBENCH_TIMEOUT_MS"),
            default_format: env("CBENCH_FORMAT"),
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.delay_min_ms.is_some() {
            self.delay_min_ms = other.delay_min_ms;
        }
        if other.delay_max_ms.is_some() {
            self.delay_max_ms = other.delay_max_ms;
        }
        if other.timeout_ms.is_some() {
            self.timeout_ms = other.timeout_ms;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Get a config value by key, formatted for display
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "seed" => self.seed.map(|v| v.to_string()),
            "delay_min_ms" => self.delay_min_ms.map(|v| v.to_string()),
            "delay_max_ms" => self.delay_max_ms.map(|v| v.to_string()),
            "timeout_ms" => self.timeout_ms.map(|v| v.to_string()),
            "default_format" => self.default_format.clone(),
            _ => None,
        }
    }

    /// Validate the timing settings into executor settings
    pub fn executor_settings(&self) -> Result<ExecutorSettings, BenchError> {
        let delay = DelayRange::from_millis(
            self.delay_min_ms.unwrap_or(DelayRange::DEFAULT_MIN_MS),
            self.delay_max_ms.unwrap_or(DelayRange::DEFAULT_MAX_MS),
        )?;
        ExecutorSettings::new(delay, self.timeout_ms.map(Duration::from_millis))
    }
}
