//! CLI configuration management.
//!
//! Precedence, highest first: command-line flags, environment variables
//! (a `.env` file is loaded when present), the config file, defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use enumtab_core::{CodeBase, GeneratorConfig, DEFAULT_HOOK_CRATE, DEFAULT_SPARSE_RUN_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Overrides the directory holding `config.json`.
pub const CONFIG_DIR_ENV: &str = "ENUMTAB_CONFIG_DIR";

/// Persistent defaults for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base of the generated `code()` accessor: 2, 8, 10 or 16.
    pub format_base: u32,

    /// Prefix stripped from constant names in lookup output.
    pub trim_prefix: String,

    /// Crate the `oh_no` hook forwards to.
    pub ohno_crate: String,

    /// Run count above which lookups switch to a map.
    pub sparse_threshold: usize,

    /// Pipe generated code through rustfmt.
    pub rustfmt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format_base: CodeBase::default().radix(),
            trim_prefix: String::new(),
            ohno_crate: DEFAULT_HOOK_CRATE.to_string(),
            sparse_threshold: DEFAULT_SPARSE_RUN_THRESHOLD,
            rustfmt: false,
        }
    }
}

/// Per-invocation flags layered over the loaded config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub format_base: Option<u32>,
    pub trim_prefix: Option<String>,
    pub ohno_crate: Option<String>,
    pub sparse_threshold: Option<usize>,
    pub extended_error: bool,
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;

        if let Ok(base) = std::env::var("ENUMTAB_FORMAT_BASE") {
            config.format_base = base
                .trim()
                .parse()
                .with_context(|| format!("Invalid ENUMTAB_FORMAT_BASE: {base}"))?;
        }
        if let Ok(prefix) = std::env::var("ENUMTAB_TRIM_PREFIX") {
            config.trim_prefix = prefix;
        }
        if let Ok(krate) = std::env::var("ENUMTAB_OHNO_CRATE") {
            config.ohno_crate = krate;
        }
        if let Ok(threshold) = std::env::var("ENUMTAB_SPARSE_THRESHOLD") {
            config.sparse_threshold = threshold
                .trim()
                .parse()
                .with_context(|| format!("Invalid ENUMTAB_SPARSE_THRESHOLD: {threshold}"))?;
        }
        if let Ok(rustfmt) = std::env::var("ENUMTAB_RUSTFMT") {
            config.rustfmt = parse_bool(&rustfmt)
                .with_context(|| format!("Invalid ENUMTAB_RUSTFMT: {rustfmt}"))?;
        }

        Ok(config)
    }

    /// Load only what the config file holds, falling back to defaults.
    pub fn load_file() -> Result<Self> {
        match Self::config_file_path() {
            Some(config_path) if config_path.exists() => {
                let contents = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config from {}", config_path.display())
                })?;
                serde_json::from_str(&contents).with_context(|| {
                    format!("Failed to parse config file {}", config_path.display())
                })
            }
            _ => Ok(Self::default()),
        }
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("config.json"));
        }
        ProjectDirs::from("dev", "enumtab", "enumtab")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Generator options for one invocation.
    pub fn generator_config(&self, overrides: &Overrides) -> Result<GeneratorConfig> {
        let base = overrides.format_base.unwrap_or(self.format_base);
        let config = GeneratorConfig {
            trim_prefix: overrides
                .trim_prefix
                .clone()
                .unwrap_or_else(|| self.trim_prefix.clone()),
            code_base: CodeBase::try_from(base)?,
            extended_error: overrides.extended_error,
            hook_crate: overrides
                .ohno_crate
                .clone()
                .unwrap_or_else(|| self.ohno_crate.clone()),
            sparse_threshold: overrides.sparse_threshold.unwrap_or(self.sparse_threshold),
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got `{}`", other),
    }
}
