//! Choice of lookup code shape from the run structure.

use std::fmt;

use serde::Serialize;

/// Run count above which lookups use a map instead of a branch per run.
///
/// A heuristic, not a derived optimum: for many runs the linear scan over
/// branches starts to cost more than a hash lookup, and the generated code
/// grows with every branch. Overridable through `GeneratorConfig`.
pub const DEFAULT_SPARSE_RUN_THRESHOLD: usize = 10;

/// Shape of the generated lookup code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One contiguous run: arithmetic plus one slice.
    SingleRun,
    /// Few runs: an ordered range check per run.
    MultipleRuns,
    /// Many runs: a map keyed by value.
    SparseMap,
}

impl Strategy {
    /// Pick the strategy for `run_count` runs.
    pub fn select(run_count: usize, sparse_threshold: usize) -> Self {
        match run_count {
            0 | 1 => Strategy::SingleRun,
            k if k <= sparse_threshold => Strategy::MultipleRuns,
            _ => Strategy::SparseMap,
        }
    }

    /// Whether tables are built per run or once over all declarations.
    pub fn uses_per_run_tables(&self) -> bool {
        match self {
            Strategy::SingleRun | Strategy::MultipleRuns => true,
            Strategy::SparseMap => false,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strategy::SingleRun => "single-run",
            Strategy::MultipleRuns => "multiple-runs",
            Strategy::SparseMap => "sparse-map",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_boundaries() {
        let t = DEFAULT_SPARSE_RUN_THRESHOLD;
        assert_eq!(Strategy::select(1, t), Strategy::SingleRun);
        assert_eq!(Strategy::select(2, t), Strategy::MultipleRuns);
        assert_eq!(Strategy::select(10, t), Strategy::MultipleRuns);
        assert_eq!(Strategy::select(11, t), Strategy::SparseMap);
    }

    #[test]
    fn test_select_custom_threshold() {
        assert_eq!(Strategy::select(3, 2), Strategy::SparseMap);
        assert_eq!(Strategy::select(2, 2), Strategy::MultipleRuns);
        assert_eq!(Strategy::select(1, 1), Strategy::SingleRun);
    }
}
