//! Generation options threaded through every pipeline stage.

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::strategy::DEFAULT_SPARSE_RUN_THRESHOLD;

/// Default path of the structured-error crate the `oh_no` hook forwards to.
pub const DEFAULT_HOOK_CRATE: &str = "ohno";

/// Numeric base used by the generated `code()` accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CodeBase {
    Binary,
    Octal,
    #[default]
    Decimal,
    Hex,
}

impl CodeBase {
    pub fn radix(&self) -> u32 {
        match self {
            CodeBase::Binary => 2,
            CodeBase::Octal => 8,
            CodeBase::Decimal => 10,
            CodeBase::Hex => 16,
        }
    }

    /// Literal prefix prepended to the formatted digits.
    pub fn prefix(&self) -> &'static str {
        match self {
            CodeBase::Binary => "0b",
            CodeBase::Octal => "0o",
            CodeBase::Decimal => "",
            CodeBase::Hex => "0x",
        }
    }

    /// `format!` spec rendering digits in this base.
    pub fn format_spec(&self) -> &'static str {
        match self {
            CodeBase::Binary => "{:b}",
            CodeBase::Octal => "{:o}",
            CodeBase::Decimal => "{}",
            CodeBase::Hex => "{:x}",
        }
    }

    /// Render a magnitude in this base, without prefix or sign.
    pub fn digits(&self, magnitude: u128) -> String {
        match self {
            CodeBase::Binary => format!("{magnitude:b}"),
            CodeBase::Octal => format!("{magnitude:o}"),
            CodeBase::Decimal => magnitude.to_string(),
            CodeBase::Hex => format!("{magnitude:x}"),
        }
    }
}

impl TryFrom<u32> for CodeBase {
    type Error = GenError;

    fn try_from(base: u32) -> GenResult<Self> {
        match base {
            2 => Ok(CodeBase::Binary),
            8 => Ok(CodeBase::Octal),
            10 => Ok(CodeBase::Decimal),
            16 => Ok(CodeBase::Hex),
            other => Err(GenError::invalid_config(format!(
                "format base can only be one of 2, 8, 10, 16; got {other}"
            ))),
        }
    }
}

impl From<CodeBase> for u32 {
    fn from(base: CodeBase) -> Self {
        base.radix()
    }
}

/// Immutable generation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Prefix stripped from constant names in lookup output.
    #[serde(default)]
    pub trim_prefix: String,

    /// Base of the `code()` accessor.
    #[serde(default)]
    pub code_base: CodeBase,

    /// Emit the `oh_no` hook.
    #[serde(default)]
    pub extended_error: bool,

    /// Crate path the hook forwards to.
    #[serde(default = "default_hook_crate")]
    pub hook_crate: String,

    /// Run count above which lookups switch to a map.
    #[serde(default = "default_sparse_threshold")]
    pub sparse_threshold: usize,
}

fn default_hook_crate() -> String {
    DEFAULT_HOOK_CRATE.to_string()
}

fn default_sparse_threshold() -> usize {
    DEFAULT_SPARSE_RUN_THRESHOLD
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            trim_prefix: String::new(),
            code_base: CodeBase::default(),
            extended_error: false,
            hook_crate: default_hook_crate(),
            sparse_threshold: default_sparse_threshold(),
        }
    }
}

impl GeneratorConfig {
    /// Config with the given base, everything else default.
    pub fn with_base(code_base: CodeBase) -> Self {
        Self {
            code_base,
            ..Default::default()
        }
    }

    /// Reject settings the synthesizer cannot honor.
    pub fn validate(&self) -> GenResult<()> {
        if self.sparse_threshold == 0 {
            return Err(GenError::invalid_config(
                "sparse threshold must be at least 1",
            ));
        }
        if self.extended_error && !is_path(&self.hook_crate) {
            return Err(GenError::invalid_config(format!(
                "hook crate `{}` is not a valid Rust path",
                self.hook_crate
            )));
        }
        Ok(())
    }

    /// Hook crate as an absolute path, e.g. `::ohno`.
    pub fn hook_path(&self) -> String {
        let trimmed = self.hook_crate.trim_start_matches("::");
        match trimmed.split("::").next() {
            Some("crate" | "self" | "super") => trimmed.to_string(),
            _ => format!("::{trimmed}"),
        }
    }
}

fn is_path(path: &str) -> bool {
    let path = path.strip_prefix("::").unwrap_or(path);
    !path.is_empty() && path.split("::").all(is_ident)
}

pub(crate) fn is_ident(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    segment != "_" && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_base_from_u32() {
        assert_eq!(CodeBase::try_from(2).unwrap(), CodeBase::Binary);
        assert_eq!(CodeBase::try_from(16).unwrap().prefix(), "0x");
        assert_eq!(CodeBase::try_from(10).unwrap().prefix(), "");

        let err = CodeBase::try_from(7).unwrap_err();
        assert!(matches!(err, GenError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("got 7"));
    }

    #[test]
    fn test_code_base_digits() {
        assert_eq!(CodeBase::Binary.digits(5), "101");
        assert_eq!(CodeBase::Octal.digits(8), "10");
        assert_eq!(CodeBase::Hex.digits(255), "ff");
        assert_eq!(CodeBase::Decimal.digits(42), "42");
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"code_base": 16}"#).unwrap();
        assert_eq!(config.code_base, CodeBase::Hex);
        assert_eq!(config.hook_crate, "ohno");
        assert_eq!(config.sparse_threshold, 10);

        let bad = serde_json::from_str::<GeneratorConfig>(r#"{"code_base": 3}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_config_validate() {
        assert!(GeneratorConfig::default().validate().is_ok());

        let zero = GeneratorConfig {
            sparse_threshold: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let bad_hook = GeneratorConfig {
            extended_error: true,
            hook_crate: "oh-no".to_string(),
            ..Default::default()
        };
        assert!(bad_hook.validate().is_err());
    }

    #[test]
    fn test_hook_path() {
        let mut config = GeneratorConfig::default();
        assert_eq!(config.hook_path(), "::ohno");

        config.hook_crate = "::errors::ohno".to_string();
        assert_eq!(config.hook_path(), "::errors::ohno");

        config.hook_crate = "crate::ohno".to_string();
        assert_eq!(config.hook_path(), "crate::ohno");
    }
}
