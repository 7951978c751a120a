//! JSON declaration manifests handed over by the extraction step.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::declaration::{ConstantDeclaration, IntegerKind};
use crate::error::{GenError, GenResult};
use crate::plan::{LookupPlan, TypeSpec};

/// Every type found in one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package identifier baked into the generated `package()` accessor.
    pub package: String,
    #[serde(default)]
    pub types: Vec<TypeManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeManifest {
    pub name: String,
    /// Integer primitive wrapped by the newtype, e.g. `i32`.
    pub underlying: String,
    #[serde(default)]
    pub scope: Option<String>,
    /// Overrides the manifest-level package for this type.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub constants: Vec<ConstantEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantEntry {
    pub name: String,
    pub value: ConstantValue,
    /// Literal text as written in the source; defaults to the decimal value.
    #[serde(default)]
    pub literal: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A JSON integer, or a string for prefixed and out-of-`i64` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl ConstantValue {
    /// Exact value, accepting `0x`, `0o`, `0b` prefixes, a leading `-` and
    /// `_` separators in the string form.
    pub fn parse(&self) -> Option<i128> {
        match self {
            ConstantValue::Signed(v) => Some(*v as i128),
            ConstantValue::Unsigned(v) => Some(*v as i128),
            ConstantValue::Text(text) => parse_integer(text),
        }
    }

    fn display(&self) -> String {
        match self {
            ConstantValue::Signed(v) => v.to_string(),
            ConstantValue::Unsigned(v) => v.to_string(),
            ConstantValue::Text(text) => text.clone(),
        }
    }
}

fn parse_integer(text: &str) -> Option<i128> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let lower = rest.to_ascii_lowercase();
    let (radix, digits) = match lower.get(..2) {
        Some("0x") => (16, &lower[2..]),
        Some("0o") => (8, &lower[2..]),
        Some("0b") => (2, &lower[2..]),
        _ => (10, lower.as_str()),
    };

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i128::from_str_radix(&digits, radix).ok()?;
    // Declarations carry at most 64 bits.
    if magnitude > u64::MAX as i128 {
        return None;
    }
    Some(if negative { -magnitude } else { magnitude })
}

impl Manifest {
    pub fn from_json_str(json: &str) -> GenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn find(&self, type_name: &str) -> Option<&TypeManifest> {
        self.types.iter().find(|t| t.name == type_name)
    }

    /// Build the lookup plan for `type_name`. A type absent from the
    /// manifest has no values and fails like an empty one.
    pub fn plan(&self, type_name: &str, config: &GeneratorConfig) -> GenResult<LookupPlan> {
        let entry = self.find(type_name).ok_or_else(|| GenError::empty(type_name))?;
        let spec = entry.spec(&self.package)?;
        let declarations = entry.declarations(spec.underlying, config)?;
        debug!(
            type_name,
            constants = declarations.len(),
            underlying = %spec.underlying,
            "Loaded declarations"
        );
        LookupPlan::build(spec, declarations, config)
    }
}

impl TypeManifest {
    pub fn spec(&self, default_package: &str) -> GenResult<TypeSpec> {
        Ok(TypeSpec {
            name: self.name.clone(),
            package: self
                .package
                .clone()
                .unwrap_or_else(|| default_package.to_string()),
            underlying: IntegerKind::parse_for(&self.name, &self.underlying)?,
            scope: self.scope.clone(),
        })
    }

    /// Declarations in manifest order, range-checked against `underlying`.
    pub fn declarations(
        &self,
        underlying: IntegerKind,
        config: &GeneratorConfig,
    ) -> GenResult<Vec<ConstantDeclaration>> {
        self.constants
            .iter()
            .map(|entry| {
                let value = entry
                    .value
                    .parse()
                    .filter(|v| underlying.contains(*v))
                    .ok_or_else(|| GenError::UnrepresentableValue {
                        type_name: self.name.clone(),
                        constant: entry.name.clone(),
                        value: entry.value.display(),
                        underlying: underlying.to_string(),
                    })?;
                let description = entry.description.as_deref().unwrap_or_default().trim();
                Ok(ConstantDeclaration::new(
                    entry.name.as_str(),
                    value,
                    underlying.is_signed(),
                    entry.literal.clone(),
                    description,
                    &config.trim_prefix,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "package": "somepkg",
        "types": [
            {
                "name": "MyError",
                "underlying": "i32",
                "constants": [
                    { "name": "ErrNotFound", "value": 0, "description": "  missing  " },
                    { "name": "ErrDenied", "value": "0x1", "literal": "0x1" },
                    { "name": "ErrBroken", "value": -2 }
                ]
            },
            {
                "name": "Flags",
                "underlying": "u64",
                "package": "flags",
                "constants": [
                    { "name": "All", "value": 18446744073709551615 }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_integer_forms() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-5"), Some(-5));
        assert_eq!(parse_integer("0xFF"), Some(255));
        assert_eq!(parse_integer("0o17"), Some(15));
        assert_eq!(parse_integer("0b101"), Some(5));
        assert_eq!(parse_integer("1_000"), Some(1000));
        assert_eq!(parse_integer("-0x10"), Some(-16));
        assert_eq!(parse_integer("0x1_0000_0000_0000_0000"), None);
        assert_eq!(parse_integer("--1"), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_manifest_declarations() {
        let manifest = Manifest::from_json_str(MANIFEST).unwrap();
        let config = GeneratorConfig {
            trim_prefix: "Err".to_string(),
            ..Default::default()
        };
        let entry = manifest.find("MyError").unwrap();
        let decls = entry.declarations(IntegerKind::I32, &config).unwrap();

        assert_eq!(decls[0].trimmed_name, "NotFound");
        assert_eq!(decls[0].description, "missing");
        assert_eq!(decls[1].literal_text, "0x1");
        assert_eq!(decls[1].value(), 1);
        assert_eq!(decls[2].value(), -2);
        assert_eq!(decls[2].literal_text, "-2");
    }

    #[test]
    fn test_package_override_and_full_range() {
        let manifest = Manifest::from_json_str(MANIFEST).unwrap();
        let plan = manifest.plan("Flags", &GeneratorConfig::default()).unwrap();
        assert_eq!(plan.spec().package, "flags");
        assert_eq!(plan.name_of(u64::MAX as i128), "All");
    }

    #[test]
    fn test_unknown_type_is_empty() {
        let manifest = Manifest::from_json_str(MANIFEST).unwrap();
        let err = manifest.plan("Missing", &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GenError::EmptyDeclarationSet { .. }));
    }

    #[test]
    fn test_non_integer_underlying() {
        let json = r#"{"package": "p", "types": [{"name": "Ratio", "underlying": "f64", "constants": []}]}"#;
        let manifest = Manifest::from_json_str(json).unwrap();
        let err = manifest.plan("Ratio", &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GenError::NonIntegerUnderlyingType { .. }));
    }

    #[test]
    fn test_out_of_range_value() {
        let json = r#"{"package": "p", "types": [{"name": "Small", "underlying": "u8",
            "constants": [{"name": "Big", "value": 256}]}]}"#;
        let manifest = Manifest::from_json_str(json).unwrap();
        let err = manifest.plan("Small", &GeneratorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("`256`"));
        assert!(matches!(err, GenError::UnrepresentableValue { ref constant, .. } if constant == "Big"));
    }

    #[test]
    fn test_malformed_json() {
        let err = Manifest::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, GenError::Manifest(_)));
    }
}
