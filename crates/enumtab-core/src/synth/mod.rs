//! Rust source synthesis from a [`LookupPlan`].
//!
//! Fixed-shape items (file header, accessor `impl`, trait impls, hook) come
//! from askama templates; lookup bodies and tables vary with the strategy
//! and are written directly.

mod accessors;
mod guard;
mod lookup;

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::plan::LookupPlan;
use crate::table::TableField;

pub use accessors::{render_header, HookParam, HookSignature};

/// Renders the code for one type at a time.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Guard, tables and accessors for the plan's type.
    pub fn render(&self, plan: &LookupPlan) -> GenResult<String> {
        let names = ItemNames::new(plan.type_name());
        let mut out = String::new();

        guard::write_guard(&mut out, plan)?;
        out.push('\n');
        lookup::write_tables(&mut out, plan, &names)?;
        out.push('\n');

        let name_body = lookup::body(plan, &names, TableField::Name)?;
        let description_body = lookup::body(plan, &names, TableField::Description)?;
        let rendered = accessors::render_impl(plan, self.config, &name_body, &description_body)?;
        out.push_str(rendered.trim_end());
        out.push('\n');

        debug!(
            type_name = plan.type_name(),
            strategy = %plan.strategy(),
            bytes = out.len(),
            "Synthesized lookup code"
        );
        Ok(out)
    }
}

/// Names of the private items emitted for one type.
#[derive(Debug, Clone)]
pub(crate) struct ItemNames {
    prefix: String,
}

impl ItemNames {
    pub(crate) fn new(type_name: &str) -> Self {
        Self {
            prefix: format!("_{}", screaming_snake(type_name)),
        }
    }

    /// Blob constant; `slot` is the run position for per-run tables.
    pub(crate) fn table(&self, field: TableField, slot: Option<usize>) -> String {
        match slot {
            Some(n) => format!("{}_{}_{n}", self.prefix, field.tag()),
            None => format!("{}_{}", self.prefix, field.tag()),
        }
    }

    pub(crate) fn index(&self, field: TableField, slot: Option<usize>) -> String {
        format!("{}_INDEX", self.table(field, slot))
    }

    pub(crate) fn map(&self, field: TableField) -> String {
        format!("{}_{}_MAP", self.prefix, field.tag())
    }
}

/// `MyError` -> `MY_ERROR`, `HTTPError` -> `HTTP_ERROR`.
pub fn screaming_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}
