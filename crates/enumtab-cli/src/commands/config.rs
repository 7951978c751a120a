//! Config command implementation.
//!
//! Manages the persisted generation defaults.

use anyhow::Result;
use enumtab_core::CodeBase;

use crate::config::{parse_bool, Config};

const VALID_KEYS: &str = "format-base, trim-prefix, ohno-crate, sparse-threshold, rustfmt";

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("enumtab Configuration");
    println!("{:-<40}", "");

    println!("Format Base:       {}", config.format_base);
    println!(
        "Trim Prefix:       {}",
        if config.trim_prefix.is_empty() {
            "(not set)"
        } else {
            config.trim_prefix.as_str()
        }
    );
    println!("OhNo Crate:        {}", config.ohno_crate);
    println!("Sparse Threshold:  {}", config.sparse_threshold);
    println!("Run rustfmt:       {}", config.rustfmt);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "format-base" | "base" => {
            let base: u32 = value.parse()?;
            CodeBase::try_from(base)?;
            config.format_base = base;
        }
        "trim-prefix" | "trim" => {
            config.trim_prefix = value.to_string();
        }
        "ohno-crate" | "hook-crate" => {
            config.ohno_crate = value.to_string();
        }
        "sparse-threshold" | "threshold" => {
            let threshold: usize = value.parse()?;
            if threshold == 0 {
                anyhow::bail!("sparse-threshold must be at least 1");
            }
            config.sparse_threshold = threshold;
        }
        "rustfmt" => {
            config.rustfmt = parse_bool(value)?;
        }
        _ => {
            anyhow::bail!("Unknown config key: {}. Valid keys: {}", key, VALID_KEYS);
        }
    }

    config.save()?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "format-base" | "base" => config.format_base.to_string(),
        "trim-prefix" | "trim" => config.trim_prefix.clone(),
        "ohno-crate" | "hook-crate" => config.ohno_crate.clone(),
        "sparse-threshold" | "threshold" => config.sparse_threshold.to_string(),
        "rustfmt" => config.rustfmt.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}. Valid keys: {}", key, VALID_KEYS);
        }
    };

    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
