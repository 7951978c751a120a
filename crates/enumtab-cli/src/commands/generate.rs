//! Generate command implementation.
//!
//! Writes the lookup code for the requested types to one file.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{Config, Overrides};

/// Generate code for `types` and write it to `output`, or next to the
/// manifest under the default name.
pub fn execute(
    config: &Config,
    manifest_path: &Path,
    types: &[String],
    output: Option<PathBuf>,
    overrides: &Overrides,
    rustfmt: bool,
    invocation: &str,
) -> Result<PathBuf> {
    if types.is_empty() {
        anyhow::bail!("At least one type name is required (-t/--type)");
    }

    let manifest = super::load_manifest(manifest_path)?;
    let generator = config.generator_config(overrides)?;

    info!(
        manifest = %manifest_path.display(),
        types = %types.join(","),
        code_base = generator.code_base.radix(),
        "Generating lookups"
    );

    let source = enumtab_core::generate_file(&manifest, types, &generator, invocation)
        .with_context(|| format!("Failed to generate code for {}", types.join(",")))?;

    let source = if rustfmt || config.rustfmt {
        format_source(source)
    } else {
        source
    };

    let output_path = match output {
        Some(path) => path,
        None => {
            let name = enumtab_core::default_output_name(types)
                .context("At least one type name is required (-t/--type)")?;
            manifest_path
                .parent()
                .map(|dir| dir.join(&name))
                .unwrap_or_else(|| PathBuf::from(name))
        }
    };

    // Ensure parent directory exists
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    std::fs::write(&output_path, &source)
        .with_context(|| format!("Failed to write output to: {}", output_path.display()))?;

    info!(path = %output_path.display(), bytes = source.len(), "Wrote generated code");
    println!("Output written to: {}", output_path.display());

    Ok(output_path)
}

/// Format with rustfmt, keeping the raw text when rustfmt is unavailable
/// or rejects it.
fn format_source(source: String) -> String {
    match run_rustfmt(&source) {
        Ok(formatted) => formatted,
        Err(e) => {
            warn!(error = %e, "rustfmt failed, writing unformatted output");
            source
        }
    }
}

fn run_rustfmt(source: &str) -> Result<String> {
    let mut child = Command::new("rustfmt")
        .args(["--edition", "2021"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("Failed to start rustfmt")?;

    child
        .stdin
        .take()
        .context("rustfmt stdin unavailable")?
        .write_all(source.as_bytes())
        .context("Failed to write to rustfmt")?;

    let output = child.wait_with_output().context("Failed to wait for rustfmt")?;
    if !output.status.success() {
        anyhow::bail!(
            "rustfmt exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    String::from_utf8(output.stdout).context("rustfmt produced invalid UTF-8")
}
