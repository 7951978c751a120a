//! Inspect command implementation.
//!
//! Shows the lookup plan chosen for a type without writing code.

use std::path::Path;

use anyhow::{Context, Result};
use enumtab_core::{ConstantValue, LookupPlan, PlanSummary};
use serde::Serialize;
use tracing::debug;

use crate::config::{Config, Overrides};

/// What the generated accessors return for one value.
#[derive(Debug, Serialize)]
struct LookupReport {
    value: String,
    name: String,
    description: String,
    code: String,
    error: String,
}

impl LookupReport {
    fn new(plan: &LookupPlan, raw: &str) -> Result<Self> {
        let value = ConstantValue::Text(raw.to_string())
            .parse()
            .with_context(|| format!("Invalid lookup value: {raw}"))?;
        let underlying = plan.spec().underlying;
        if !underlying.contains(value) {
            let (lo, hi) = underlying.range();
            anyhow::bail!(
                "Lookup value {raw} does not fit {underlying} ({lo}..={hi}) of type {}",
                plan.type_name()
            );
        }
        Ok(Self {
            value: value.to_string(),
            name: plan.name_of(value),
            description: plan.description_of(value),
            code: plan.code_of(value),
            error: plan.error_string_of(value),
        })
    }
}

#[derive(Debug, Serialize)]
struct InspectReport {
    #[serde(flatten)]
    summary: PlanSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup: Option<LookupReport>,
}

/// Print the plan for `type_name`, optionally evaluating one value.
pub fn execute(
    config: &Config,
    manifest_path: &Path,
    type_name: &str,
    overrides: &Overrides,
    lookup: Option<&str>,
    json: bool,
) -> Result<()> {
    let manifest = super::load_manifest(manifest_path)?;
    let generator = config.generator_config(overrides)?;
    let plan = manifest
        .plan(type_name, &generator)
        .with_context(|| format!("Failed to plan lookups for {type_name}"))?;

    debug!(type_name, strategy = %plan.strategy(), "Inspecting plan");

    let report = InspectReport {
        summary: plan.summary(),
        lookup: lookup.map(|raw| LookupReport::new(&plan, raw)).transpose()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &InspectReport) {
    let summary = &report.summary;
    println!("Type:       {} ({})", summary.type_name, summary.underlying);
    println!("Package:    {}", summary.package);
    println!("Strategy:   {}", summary.strategy);
    println!(
        "Constants:  {} declared, {} unique",
        summary.declared, summary.unique
    );

    println!("\nRuns");
    println!("{:-<40}", "");
    for (i, run) in summary.runs.iter().enumerate() {
        println!("  #{i:<3} {}..={} ({} values)", run.start, run.end, run.len);
    }

    println!("\nTables");
    println!("{:-<40}", "");
    for table in &summary.tables {
        let width = table
            .index_width
            .map(|w| w.to_string())
            .unwrap_or_else(|| "(no index)".to_string());
        println!(
            "  #{:<3} {:<12} {:>4} entries {:>6} bytes  {}",
            table.slot,
            table.field.accessor(),
            table.entries,
            table.bytes,
            width
        );
    }

    if let Some(lookup) = &report.lookup {
        println!("\nLookup {}", lookup.value);
        println!("{:-<40}", "");
        println!("  name:        {}", lookup.name);
        println!("  description: {}", lookup.description);
        println!("  code:        {}", lookup.code);
        println!("  error:       {}", lookup.error);
    }
}
