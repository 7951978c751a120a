//! String tables and per-strategy lookup bodies.
//!
//! Range arithmetic runs in `i64` or `u64` so every underlying width shares
//! one code shape; wrapping subtraction there is exact for any run that can
//! be declared.

use std::fmt::Write;

use crate::error::GenResult;
use crate::plan::LookupPlan;
use crate::runs::Run;
use crate::strategy::Strategy;
use crate::table::{StringTable, TableField, Tables};

use super::ItemNames;

const COW: &str = "::std::borrow::Cow";

/// Slot suffix of the table at `position`.
fn slot(strategy: Strategy, position: usize) -> Option<usize> {
    match strategy {
        Strategy::MultipleRuns => Some(position),
        Strategy::SingleRun | Strategy::SparseMap => None,
    }
}

/// Emit the blob constants, the index arrays of per-run tables, and the
/// maps of a sparse lookup.
pub(super) fn write_tables(out: &mut String, plan: &LookupPlan, names: &ItemNames) -> GenResult<()> {
    let indexed = plan.tables().emits_index();
    for field in [TableField::Name, TableField::Description] {
        for (position, pair) in plan.tables().pairs().iter().enumerate() {
            let slot = slot(plan.strategy(), position);
            let index = indexed.then(|| names.index(field, slot));
            write_table(out, pair.get(field), &names.table(field, slot), index.as_deref())?;
        }
    }

    if let Tables::Global(pair) = plan.tables() {
        for field in [TableField::Name, TableField::Description] {
            write_map(out, plan, names, field, pair.get(field))?;
        }
    }
    Ok(())
}

fn write_table(
    out: &mut String,
    table: &StringTable,
    blob: &str,
    index: Option<&str>,
) -> GenResult<()> {
    writeln!(out, "const {blob}: &str = {:?};", table.text())?;
    if let (Some(index), Some(offsets)) = (index, table.offsets()) {
        let joined = offsets
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "const {index}: [{}; {}] = [{joined}];",
            table.width(),
            offsets.len()
        )?;
    }
    Ok(())
}

fn write_map(
    out: &mut String,
    plan: &LookupPlan,
    names: &ItemNames,
    field: TableField,
    table: &StringTable,
) -> GenResult<()> {
    let blob = names.table(field, None);
    writeln!(
        out,
        "static {}: ::std::sync::LazyLock<::std::collections::HashMap<{}, &'static str>> =",
        names.map(field),
        plan.spec().underlying
    )?;
    writeln!(out, "    ::std::sync::LazyLock::new(|| {{")?;
    writeln!(out, "        ::std::collections::HashMap::from([")?;
    for (i, decl) in plan.values().iter().enumerate() {
        if let Some((lo, hi)) = table.span(i) {
            writeln!(out, "            ({}, &{blob}[{lo}..{hi}]),", decl.value())?;
        }
    }
    writeln!(out, "        ])")?;
    writeln!(out, "    }});")?;
    Ok(())
}

/// `Cow::Owned(format!("T({})", self.0 as i64))`
fn fallback(type_name: &str) -> String {
    format!("{COW}::Owned(::std::format!(\"{type_name}({{}})\", self.0 as i64))")
}

fn domain(plan: &LookupPlan) -> &'static str {
    if plan.is_signed() {
        "i64"
    } else {
        "u64"
    }
}

/// Borrow entry `i` (a `usize` in scope) of an indexed table.
fn slice_expr(blob: &str, index: &str) -> String {
    format!("{COW}::Borrowed(&{blob}[{index}[i] as usize..{index}[i + 1] as usize])")
}

/// Body of `name()` or `description()`, indented for the accessor block.
pub(super) fn body(plan: &LookupPlan, names: &ItemNames, field: TableField) -> GenResult<String> {
    let mut out = String::new();
    match plan.strategy() {
        Strategy::SingleRun => single_run(&mut out, plan, names, field)?,
        Strategy::MultipleRuns => multiple_runs(&mut out, plan, names, field)?,
        Strategy::SparseMap => sparse_map(&mut out, plan, names, field)?,
    }
    Ok(out.trim_end().to_string())
}

fn single_run(out: &mut String, plan: &LookupPlan, names: &ItemNames, field: TableField) -> GenResult<()> {
    let runs = plan.runs();
    let run = runs[0];
    let table = plan.tables().pairs()[0].get(field);
    let blob = names.table(field, None);
    let fallback = fallback(plan.type_name());

    if !table.has_index() {
        writeln!(out, "        if self.0 == {} {{", run.start())?;
        writeln!(out, "            {COW}::Borrowed({blob})")?;
        writeln!(out, "        }} else {{")?;
        writeln!(out, "            {fallback}")?;
        writeln!(out, "        }}")?;
        return Ok(());
    }

    let domain = domain(plan);
    if run.start() == 0 {
        writeln!(out, "        let i = self.0 as {domain};")?;
    } else {
        writeln!(out, "        let i = (self.0 as {domain}).wrapping_sub({});", run.start())?;
    }
    if plan.is_signed() {
        writeln!(out, "        if i < 0 || i >= {} {{", run.len())?;
    } else {
        writeln!(out, "        if i >= {} {{", run.len())?;
    }
    writeln!(out, "            return {fallback};")?;
    writeln!(out, "        }}")?;
    writeln!(out, "        let i = i as usize;")?;
    writeln!(out, "        {}", slice_expr(&blob, &names.index(field, None)))?;
    Ok(())
}

/// Range test selecting `run`, in the widened domain.
fn run_test(plan: &LookupPlan, run: &Run<'_>) -> String {
    if run.is_singleton() {
        format!("i == {}", run.start())
    } else if run.start() == 0 && !plan.is_signed() {
        format!("i <= {}", run.end())
    } else {
        format!("{} <= i && i <= {}", run.start(), run.end())
    }
}

fn multiple_runs(
    out: &mut String,
    plan: &LookupPlan,
    names: &ItemNames,
    field: TableField,
) -> GenResult<()> {
    let pairs = plan.tables().pairs();
    writeln!(out, "        let i = self.0 as {};", domain(plan))?;

    for (position, (run, pair)) in plan.runs().iter().zip(pairs).enumerate() {
        let keyword = if position == 0 { "if" } else { "} else if" };
        writeln!(out, "        {keyword} {} {{", run_test(plan, run))?;

        let slot = Some(position);
        let blob = names.table(field, slot);
        if pair.get(field).has_index() {
            if run.start() == 0 {
                writeln!(out, "            let i = i as usize;")?;
            } else {
                writeln!(out, "            let i = i.wrapping_sub({}) as usize;", run.start())?;
            }
            writeln!(out, "            {}", slice_expr(&blob, &names.index(field, slot)))?;
        } else {
            writeln!(out, "            {COW}::Borrowed({blob})")?;
        }
    }

    writeln!(out, "        }} else {{")?;
    writeln!(out, "            {}", fallback(plan.type_name()))?;
    writeln!(out, "        }}")?;
    Ok(())
}

fn sparse_map(out: &mut String, plan: &LookupPlan, names: &ItemNames, field: TableField) -> GenResult<()> {
    writeln!(out, "        match {}.get(&self.0) {{", names.map(field))?;
    writeln!(out, "            Some(&text) => {COW}::Borrowed(text),")?;
    writeln!(out, "            None => {},", fallback(plan.type_name()))?;
    writeln!(out, "        }}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::declaration::{ConstantDeclaration, IntegerKind};
    use crate::plan::TypeSpec;

    fn plan(underlying: IntegerKind, values: &[i128]) -> LookupPlan {
        let decls = values
            .iter()
            .map(|&v| {
                ConstantDeclaration::new(format!("V{}", v.unsigned_abs()), v, underlying.is_signed(), None, "", "")
            })
            .collect();
        LookupPlan::build(TypeSpec::new("T", "pkg", underlying), decls, &GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_single_run_subtracts_start() {
        let p = plan(IntegerKind::I32, &[100, 101, 102]);
        let body = body(&p, &ItemNames::new("T"), TableField::Name).unwrap();
        assert!(body.contains("let i = (self.0 as i64).wrapping_sub(100);"));
        assert!(body.contains("if i < 0 || i >= 3 {"));
        assert!(body.contains("&_T_NAME[_T_NAME_INDEX[i] as usize.._T_NAME_INDEX[i + 1] as usize]"));
    }

    #[test]
    fn test_single_run_from_zero_unsigned() {
        let p = plan(IntegerKind::U8, &[0, 1]);
        let body = body(&p, &ItemNames::new("T"), TableField::Name).unwrap();
        assert!(body.contains("let i = self.0 as u64;"));
        assert!(body.contains("if i >= 2 {"));
        assert!(!body.contains("i < 0"));
    }

    #[test]
    fn test_single_constant_has_no_index() {
        let p = plan(IntegerKind::I32, &[7]);
        let mut tables = String::new();
        write_tables(&mut tables, &p, &ItemNames::new("T")).unwrap();
        assert!(tables.contains("const _T_NAME: &str = \"V7\";"));
        assert!(!tables.contains("INDEX"));

        let body = body(&p, &ItemNames::new("T"), TableField::Name).unwrap();
        assert!(body.contains("if self.0 == 7 {"));
    }

    #[test]
    fn test_multiple_runs_chain() {
        let p = plan(IntegerKind::U16, &[0, 1, 2, 10, 11, 40]);
        let body = body(&p, &ItemNames::new("T"), TableField::Name).unwrap();
        assert!(body.contains("        if i <= 2 {"));
        assert!(body.contains("} else if 10 <= i && i <= 11 {"));
        assert!(body.contains("let i = i.wrapping_sub(10) as usize;"));
        assert!(body.contains("} else if i == 40 {"));
        assert!(body.contains("Cow::Borrowed(_T_NAME_2)"));
        assert!(body.ends_with('}'));
    }

    #[test]
    fn test_sparse_map_tables() {
        let values: Vec<i128> = (0..11).map(|k| k * 10).collect();
        let p = plan(IntegerKind::I64, &values);
        let mut tables = String::new();
        write_tables(&mut tables, &p, &ItemNames::new("T")).unwrap();
        assert!(tables.contains("static _T_NAME_MAP: ::std::sync::LazyLock<::std::collections::HashMap<i64, &'static str>> ="));
        assert!(tables.contains("(100, &_T_NAME["));
        assert!(!tables.contains("INDEX"), "map entries carry their own spans");

        let body = body(&p, &ItemNames::new("T"), TableField::Description).unwrap();
        assert!(body.contains("match _T_DESC_MAP.get(&self.0) {"));
    }

    #[test]
    fn test_fallback_expression() {
        assert_eq!(
            fallback("MyError"),
            "::std::borrow::Cow::Owned(::std::format!(\"MyError({})\", self.0 as i64))"
        );
    }
}
