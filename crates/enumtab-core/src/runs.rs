//! Partitioning of normalized declarations into contiguous runs.

use serde::Serialize;

use crate::declaration::ConstantDeclaration;

/// A maximal stretch of declarations whose values increase by exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    members: &'a [ConstantDeclaration],
}

impl<'a> Run<'a> {
    pub fn members(&self) -> &'a [ConstantDeclaration] {
        self.members
    }

    pub fn first(&self) -> &'a ConstantDeclaration {
        &self.members[0]
    }

    pub fn last(&self) -> &'a ConstantDeclaration {
        &self.members[self.members.len() - 1]
    }

    pub fn start(&self) -> i128 {
        self.first().value()
    }

    pub fn end(&self) -> i128 {
        self.last().value()
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    pub fn contains(&self, value: i128) -> bool {
        self.start() <= value && value <= self.end()
    }

    /// Position of `value` inside the run, if it belongs to it.
    pub fn position(&self, value: i128) -> Option<usize> {
        self.contains(value)
            .then(|| (value - self.start()) as usize)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            start: self.start().to_string(),
            end: self.end().to_string(),
            len: self.len(),
        }
    }
}

/// Serializable view of a run. Bounds are strings so full-range `u64`
/// values survive JSON consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub start: String,
    pub end: String,
    pub len: usize,
}

/// Split ascending, duplicate-free declarations into maximal runs.
///
/// Given values 1,2,3,5,6,7 it returns {1,2,3},{5,6,7}.
pub fn segment(values: &[ConstantDeclaration]) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut rest = values;
    while !rest.is_empty() {
        let mut i = 1;
        while i < rest.len() && rest[i].value() == rest[i - 1].value() + 1 {
            i += 1;
        }
        let (run, tail) = rest.split_at(i);
        runs.push(Run { members: run });
        rest = tail;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[i128]) -> Vec<ConstantDeclaration> {
        raw.iter()
            .map(|&v| ConstantDeclaration::new(format!("V{v}"), v, true, None, "", ""))
            .collect()
    }

    fn bounds(runs: &[Run<'_>]) -> Vec<(i128, i128)> {
        runs.iter().map(|r| (r.start(), r.end())).collect()
    }

    #[test]
    fn test_two_runs() {
        let decls = values(&[1, 2, 3, 5, 6, 7]);
        let runs = segment(&decls);
        assert_eq!(bounds(&runs), vec![(1, 3), (5, 7)]);
        assert!(runs.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn test_single_element_is_a_run() {
        let decls = values(&[42]);
        let runs = segment(&decls);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].is_singleton());
        assert_eq!(runs[0].position(42), Some(0));
        assert_eq!(runs[0].position(43), None);
    }

    #[test]
    fn test_runs_cross_zero() {
        let decls = values(&[-2, -1, 0, 1, 9]);
        let runs = segment(&decls);
        assert_eq!(bounds(&runs), vec![(-2, 1), (9, 9)]);
        assert_eq!(runs[0].position(0), Some(2));
    }

    #[test]
    fn test_empty_input_has_no_runs() {
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn test_summary_keeps_full_range() {
        let decls = vec![ConstantDeclaration::new(
            "Max",
            u64::MAX as i128,
            false,
            None,
            "",
            "",
        )];
        let runs = segment(&decls);
        assert_eq!(runs[0].summary().start, "18446744073709551615");
    }
}
