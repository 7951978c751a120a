//! Compile-time guard against constants drifting from the generated tables.

use std::fmt::Write;

use crate::error::GenResult;
use crate::plan::LookupPlan;

/// Write a `const` block that indexes a one-element array with
/// `CONSTANT.0 - literal` for every declared constant, aliases included.
/// Any renumbering makes const evaluation fail.
pub(super) fn write_guard(out: &mut String, plan: &LookupPlan) -> GenResult<()> {
    let spec = plan.spec();
    writeln!(
        out,
        "// An \"index out of bounds\" or \"overflow\" error here means the values of {} changed.",
        spec.name
    )?;
    writeln!(out, "// Re-run enumtab to generate this file again.")?;
    writeln!(out, "const _: () = {{")?;
    writeln!(out, "    let x = [(); 1];")?;
    for decl in plan.declared() {
        writeln!(
            out,
            "    x[({}.0 - {}) as usize];",
            spec.constant_path(decl),
            decl.operand()
        )?;
    }
    writeln!(out, "}};")?;
    Ok(())
}
