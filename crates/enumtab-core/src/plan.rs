//! The per-type lookup plan: normalized declarations, runs, strategy and
//! tables, plus an evaluation model of the code synthesized from them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CodeBase, GeneratorConfig};
use crate::declaration::{ConstantDeclaration, IntegerKind};
use crate::error::{GenError, GenResult};
use crate::normalize::normalize;
use crate::runs::{segment, Run, RunSummary};
use crate::strategy::Strategy;
use crate::table::{IndexWidth, TableField, Tables};

/// The type a plan generates code for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    /// Name of the newtype, e.g. `MyError`.
    pub name: String,
    /// Identifier returned by the generated `package()` accessor.
    pub package: String,
    /// Integer primitive wrapped by the newtype.
    pub underlying: IntegerKind,
    /// Path qualifying constant names in the guard, e.g. `MyError` for
    /// associated constants. `None` for free constants.
    #[serde(default)]
    pub scope: Option<String>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>, package: impl Into<String>, underlying: IntegerKind) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            underlying,
            scope: None,
        }
    }

    /// Expression naming a declared constant.
    pub fn constant_path(&self, decl: &ConstantDeclaration) -> String {
        match &self.scope {
            Some(scope) => format!("{scope}::{}", decl.original_name),
            None => decl.original_name.clone(),
        }
    }
}

/// Everything the synthesizer needs for one type.
#[derive(Debug, Clone)]
pub struct LookupPlan {
    spec: TypeSpec,
    declared: Vec<ConstantDeclaration>,
    values: Vec<ConstantDeclaration>,
    tables: Tables,
    code_base: CodeBase,
}

impl LookupPlan {
    /// Run normalization, segmentation, strategy selection and table
    /// building for one type.
    pub fn build(
        spec: TypeSpec,
        declarations: Vec<ConstantDeclaration>,
        config: &GeneratorConfig,
    ) -> GenResult<Self> {
        config.validate()?;

        for decl in &declarations {
            if !spec.underlying.contains(decl.value()) {
                return Err(GenError::UnrepresentableValue {
                    type_name: spec.name.clone(),
                    constant: decl.original_name.clone(),
                    value: decl.value().to_string(),
                    underlying: spec.underlying.to_string(),
                });
            }
        }

        let declared = declarations.clone();
        let values = normalize(&spec.name, declarations)?;
        let runs = segment(&values);
        let strategy = Strategy::select(runs.len(), config.sparse_threshold);
        let tables = Tables::build(strategy, &runs, &values);

        debug!(
            type_name = %spec.name,
            runs = runs.len(),
            %strategy,
            "Selected lookup strategy"
        );

        Ok(Self {
            spec,
            declared,
            values,
            tables,
            code_base: config.code_base,
        })
    }

    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }

    pub fn type_name(&self) -> &str {
        &self.spec.name
    }

    /// Declarations in input order, aliases included.
    pub fn declared(&self) -> &[ConstantDeclaration] {
        &self.declared
    }

    /// Ascending, alias-free declarations.
    pub fn values(&self) -> &[ConstantDeclaration] {
        &self.values
    }

    pub fn runs(&self) -> Vec<Run<'_>> {
        segment(&self.values)
    }

    pub fn strategy(&self) -> Strategy {
        self.tables.strategy()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn is_signed(&self) -> bool {
        self.spec.underlying.is_signed()
    }

    /// Text stored for `value`, or `None` when no constant has it.
    pub fn lookup(&self, field: TableField, value: i128) -> Option<&str> {
        if !self.spec.underlying.contains(value) {
            return None;
        }
        match &self.tables {
            Tables::PerRun(pairs) => self
                .runs()
                .iter()
                .zip(pairs)
                .find(|(run, _)| run.contains(value))
                .and_then(|(run, pair)| pair.get(field).entry(run.position(value)?)),
            Tables::Global(pair) => self
                .values
                .iter()
                .position(|decl| decl.value() == value)
                .and_then(|i| pair.get(field).entry(i)),
        }
    }

    /// What the generated `name()` returns for `value`.
    pub fn name_of(&self, value: i128) -> String {
        self.lookup(TableField::Name, value)
            .map(str::to_string)
            .unwrap_or_else(|| self.fallback(value))
    }

    /// What the generated `description()` returns for `value`.
    pub fn description_of(&self, value: i128) -> String {
        self.lookup(TableField::Description, value)
            .map(str::to_string)
            .unwrap_or_else(|| self.fallback(value))
    }

    /// `TypeName(value)`, the value read as a signed 64-bit integer.
    pub fn fallback(&self, value: i128) -> String {
        format!("{}({})", self.spec.name, value as i64)
    }

    /// What the generated `code()` returns for `value`.
    pub fn code_of(&self, value: i128) -> String {
        let prefix = self.code_base.prefix();
        if self.is_signed() && value < 0 {
            let magnitude = (value as i64).unsigned_abs() as u128;
            format!("{prefix}-{}", self.code_base.digits(magnitude))
        } else {
            format!("{prefix}{}", self.code_base.digits(value as u64 as u128))
        }
    }

    /// What the generated `Display` impl writes for `value`.
    pub fn error_string_of(&self, value: i128) -> String {
        format!(
            "[{}]{}.{}: {}",
            self.code_of(value),
            self.spec.package,
            self.name_of(value),
            self.description_of(value)
        )
    }

    pub fn summary(&self) -> PlanSummary {
        let runs = self.runs();
        let indexed = self.tables.emits_index();
        let tables = self
            .tables
            .pairs()
            .iter()
            .enumerate()
            .flat_map(|(slot, pair)| {
                [TableField::Name, TableField::Description].map(|field| {
                    let table = pair.get(field);
                    TableSummary {
                        slot,
                        field,
                        entries: table.count(),
                        bytes: table.text().len(),
                        index_width: (indexed && table.has_index()).then(|| table.width()),
                    }
                })
            })
            .collect();

        PlanSummary {
            type_name: self.spec.name.clone(),
            package: self.spec.package.clone(),
            underlying: self.spec.underlying,
            strategy: self.strategy(),
            declared: self.declared.len(),
            unique: self.values.len(),
            runs: runs.iter().map(Run::summary).collect(),
            tables,
        }
    }
}

/// Serializable description of a plan, for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub type_name: String,
    pub package: String,
    pub underlying: IntegerKind,
    pub strategy: Strategy,
    pub declared: usize,
    pub unique: usize,
    pub runs: Vec<RunSummary>,
    pub tables: Vec<TableSummary>,
}

/// One table of a plan.
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    /// Run position, or 0 for the global table of a sparse map.
    pub slot: usize,
    pub field: TableField,
    pub entries: usize,
    pub bytes: usize,
    /// `None` when no index array is emitted: single-entry tables and the
    /// global table of a sparse map.
    pub index_width: Option<IndexWidth>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(underlying: IntegerKind, values: &[(&str, i128)]) -> LookupPlan {
        let signed = underlying.is_signed();
        let decls = values
            .iter()
            .map(|&(name, v)| {
                ConstantDeclaration::new(name, v, signed, None, format!("about {name}"), "")
            })
            .collect();
        LookupPlan::build(
            TypeSpec::new("Kind", "pkg", underlying),
            decls,
            &GeneratorConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_run_lookup() {
        let p = plan(IntegerKind::I32, &[("X", 0), ("Y", 1), ("Z", 2)]);
        assert_eq!(p.strategy(), Strategy::SingleRun);
        assert_eq!(p.name_of(1), "Y");
        assert_eq!(p.description_of(2), "about Z");
        assert_eq!(p.name_of(99), "Kind(99)");
        assert_eq!(p.name_of(-1), "Kind(-1)");
    }

    #[test]
    fn test_multiple_runs_lookup() {
        let p = plan(
            IntegerKind::U16,
            &[("A", 0), ("B", 1), ("C", 5), ("D", 100), ("E", 101)],
        );
        assert_eq!(p.strategy(), Strategy::MultipleRuns);
        assert_eq!(p.name_of(5), "C");
        assert_eq!(p.name_of(101), "E");
        assert_eq!(p.name_of(4), "Kind(4)");
    }

    #[test]
    fn test_out_of_domain_value_falls_back() {
        let p = plan(IntegerKind::U8, &[("A", 0)]);
        assert_eq!(p.lookup(TableField::Name, 256), None);
        assert_eq!(p.lookup(TableField::Name, -1), None);
    }

    #[test]
    fn test_unrepresentable_value_is_rejected() {
        let decls = vec![ConstantDeclaration::new("Big", 300, false, None, "", "")];
        let err = LookupPlan::build(
            TypeSpec::new("Small", "pkg", IntegerKind::U8),
            decls,
            &GeneratorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GenError::UnrepresentableValue { ref constant, .. } if constant == "Big"));
    }

    #[test]
    fn test_code_of_bases() {
        let decls = vec![ConstantDeclaration::new("A", -5, true, None, "", "")];
        let spec = TypeSpec::new("T", "pkg", IntegerKind::I64);
        let hex = LookupPlan::build(spec.clone(), decls.clone(), &GeneratorConfig::with_base(CodeBase::Hex)).unwrap();
        assert_eq!(hex.code_of(-5), "0x-5");
        assert_eq!(hex.code_of(255), "0xff");

        let bin = LookupPlan::build(spec, decls, &GeneratorConfig::with_base(CodeBase::Binary)).unwrap();
        assert_eq!(bin.code_of(5), "0b101");
        assert_eq!(bin.code_of(-5), "0b-101");
    }

    #[test]
    fn test_error_string_composition() {
        let p = plan(IntegerKind::I32, &[("NotFound", 0)]);
        assert_eq!(p.error_string_of(0), "[0]pkg.NotFound: about NotFound");
        assert_eq!(p.error_string_of(7), "[7]pkg.Kind(7): Kind(7)");
    }

    #[test]
    fn test_summary_reports_tables() {
        let p = plan(IntegerKind::I32, &[("A", 0), ("B", 1), ("C", 9)]);
        let summary = p.summary();
        assert_eq!(summary.strategy, Strategy::MultipleRuns);
        assert_eq!(summary.runs.len(), 2);
        assert_eq!(summary.tables.len(), 4);
        assert_eq!(summary.tables[0].index_width, Some(IndexWidth::U8));
        // The singleton run at 9 needs no index.
        assert_eq!(summary.tables[2].index_width, None);
    }

    #[test]
    fn test_sparse_plan_reports_no_index() {
        let values: Vec<(String, i128)> = (0..12).map(|i| (format!("S{i}"), i * 10)).collect();
        let named: Vec<(&str, i128)> = values.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        let p = plan(IntegerKind::I64, &named);
        assert_eq!(p.strategy(), Strategy::SparseMap);
        assert_eq!(p.name_of(110), "S11");
        assert_eq!(p.name_of(111), "Kind(111)");

        let summary = p.summary();
        assert_eq!(summary.tables.len(), 2);
        assert!(summary.tables.iter().all(|t| t.index_width.is_none()));
    }
}
