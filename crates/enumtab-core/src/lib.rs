//! Constant-set compaction and lookup-code synthesis.
//!
//! Given the named integer constants of an enumerated newtype, this crate
//! decides how to store their names and descriptions compactly and emits
//! Rust source for the `value -> name` and `value -> description` lookups,
//! with a fallback for undeclared values and a compile-time guard against
//! renumbering.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`normalize`]: sort by value, collapse aliases (first declared wins).
//! 2. [`runs::segment`]: split into maximal contiguous runs.
//! 3. [`Strategy::select`]: single run, a branch per run, or a map.
//! 4. [`table`]: concatenated text blobs with minimal-width offset indexes.
//! 5. [`synth`]: lookup bodies, guard and accessors.
//!
//! ```no_run
//! use enumtab_core::{generate_file, GeneratorConfig, Manifest};
//!
//! let manifest = Manifest::from_json_str(r#"{"package": "net", "types": []}"#)?;
//! let source = generate_file(&manifest, &["MyError"], &GeneratorConfig::default(), "-type MyError")?;
//! # Ok::<(), enumtab_core::GenError>(())
//! ```

pub mod config;
pub mod declaration;
pub mod error;
pub mod manifest;
pub mod normalize;
pub mod plan;
pub mod runs;
pub mod strategy;
pub mod synth;
pub mod table;

pub use config::{CodeBase, GeneratorConfig, DEFAULT_HOOK_CRATE};
pub use declaration::{ConstantDeclaration, IntegerKind};
pub use error::{GenError, GenResult};
pub use manifest::{ConstantEntry, ConstantValue, Manifest, TypeManifest};
pub use normalize::normalize;
pub use plan::{LookupPlan, PlanSummary, TableSummary, TypeSpec};
pub use runs::{Run, RunSummary};
pub use strategy::{Strategy, DEFAULT_SPARSE_RUN_THRESHOLD};
pub use synth::{render_header, HookSignature, Synthesizer};
pub use table::{IndexWidth, StringTable, TableField};

use tracing::debug;

/// Generate one file covering `type_names`, in request order.
///
/// All plans are built before any code is rendered, so a failing type
/// yields no output at all.
pub fn generate_file<S: AsRef<str>>(
    manifest: &Manifest,
    type_names: &[S],
    config: &GeneratorConfig,
    invocation: &str,
) -> GenResult<String> {
    config.validate()?;

    let plans = type_names
        .iter()
        .map(|name| manifest.plan(name.as_ref(), config))
        .collect::<GenResult<Vec<_>>>()?;

    let synthesizer = Synthesizer::new(config);
    let mut out = render_header(invocation)?;
    for plan in &plans {
        out.push('\n');
        out.push_str(&synthesizer.render(plan)?);
    }

    debug!(types = plans.len(), bytes = out.len(), "Generated file");
    Ok(out)
}

/// Default file name for generated code: `<first type>_errors.rs`, lowercased.
pub fn default_output_name<S: AsRef<str>>(type_names: &[S]) -> Option<String> {
    type_names
        .first()
        .map(|name| format!("{}_errors.rs", name.as_ref().to_lowercase()))
}
