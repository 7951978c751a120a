//! Ordering and alias collapsing of raw declarations.

use tracing::debug;

use crate::declaration::ConstantDeclaration;
use crate::error::{GenError, GenResult};

/// Sort declarations by value and keep one declaration per value.
///
/// The sort is stable, so among aliases of one value the earliest declared
/// name survives; later aliases are dropped. Signedness decides whether the
/// bit pattern compares as `i64` or `u64`.
pub fn normalize(
    type_name: &str,
    mut declarations: Vec<ConstantDeclaration>,
) -> GenResult<Vec<ConstantDeclaration>> {
    let declared = declarations.len();

    declarations.sort_by_key(ConstantDeclaration::value);
    declarations.dedup_by_key(|decl| decl.value());

    if declarations.is_empty() {
        return Err(GenError::empty(type_name));
    }

    debug!(
        type_name,
        declared,
        unique = declarations.len(),
        "Normalized declarations"
    );
    Ok(declarations)
}
