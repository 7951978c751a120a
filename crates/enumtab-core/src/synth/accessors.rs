//! Accessor `impl`, trait impls and the structured-error hook.

use askama::Template;
use serde::Serialize;

use crate::config::{CodeBase, GeneratorConfig};
use crate::declaration::IntegerKind;
use crate::error::GenResult;
use crate::plan::LookupPlan;

/// One parameter of the generated `oh_no` method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookParam {
    pub name: &'static str,
    pub ty: String,
}

/// The items of the structured-error crate the `oh_no` hook forwards to.
///
/// The constructor receives the code itself, the caller's parameters, and
/// the caller location between `source_info_type` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookSignature {
    /// Absolute crate path, e.g. `::ohno`.
    pub path: String,
    /// Return type of the hook.
    pub error_type: String,
    /// Constructor the hook forwards to.
    pub constructor: String,
    pub params: Vec<HookParam>,
    /// Constructor arguments, in order.
    pub arguments: Vec<String>,
}

impl HookSignature {
    pub const ERROR_TYPE: &'static str = "OhNoError";
    pub const CONSTRUCTOR: &'static str = "new";
    pub const EXTRA: &'static str = "Extra";
    pub const CAUSE: &'static str = "Cause";
    pub const SOURCE_INFO_TYPE: &'static str = "SourceInfoType";
    pub const TIMESTAMP: &'static str = "Timestamp";

    /// Signature of the hook forwarding to the crate at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let item = |name: &str| format!("{path}::{name}");
        let error_type = item(Self::ERROR_TYPE);

        let params = vec![
            HookParam {
                name: "message",
                ty: "&str".to_string(),
            },
            HookParam {
                name: "extra",
                ty: item(Self::EXTRA),
            },
            HookParam {
                name: "cause",
                ty: format!("::std::option::Option<{}>", item(Self::CAUSE)),
            },
            HookParam {
                name: "source_info_type",
                ty: item(Self::SOURCE_INFO_TYPE),
            },
            HookParam {
                name: "timestamp",
                ty: format!("::std::option::Option<{}>", item(Self::TIMESTAMP)),
            },
            HookParam {
                name: "timestamp_layout",
                ty: "&str".to_string(),
            },
        ];

        let arguments = [
            "*self",
            "message",
            "extra",
            "cause",
            "source_info_type",
            "::std::panic::Location::caller()",
            "timestamp",
            "timestamp_layout",
        ]
        .map(str::to_string)
        .to_vec();

        Self {
            constructor: format!("{error_type}::{}", Self::CONSTRUCTOR),
            error_type,
            path,
            params,
            arguments,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.hook_path())
    }
}

#[derive(Template)]
#[template(path = "header.txt", escape = "none")]
struct HeaderTemplate<'a> {
    invocation: &'a str,
}

#[derive(Template)]
#[template(path = "impl.txt", escape = "none")]
struct ImplTemplate<'a> {
    type_name: &'a str,
    package_literal: String,
    name_body: &'a str,
    description_body: &'a str,
    code_body: String,
    hook: Option<HookSignature>,
}

/// The "Code generated ... DO NOT EDIT." header of a generated file.
pub fn render_header(invocation: &str) -> GenResult<String> {
    let rendered = HeaderTemplate { invocation }.render()?;
    Ok(format!("{}\n", rendered.trim_end()))
}

pub(super) fn render_impl(
    plan: &LookupPlan,
    config: &GeneratorConfig,
    name_body: &str,
    description_body: &str,
) -> GenResult<String> {
    let template = ImplTemplate {
        type_name: plan.type_name(),
        package_literal: format!("{:?}", plan.spec().package),
        name_body,
        description_body,
        code_body: code_body(plan.spec().underlying, config.code_base),
        hook: config
            .extended_error
            .then(|| HookSignature::from_config(config)),
    };
    Ok(template.render()?)
}

/// Body of `code()`. Negative signed values render as prefix, `-`, digits.
fn code_body(kind: IntegerKind, base: CodeBase) -> String {
    if base == CodeBase::Decimal {
        return "        self.0.to_string()".to_string();
    }

    let pattern = format!("{}{}", base.prefix(), base.format_spec());
    if !kind.is_signed() {
        return format!("        ::std::format!(\"{pattern}\", self.0)");
    }

    let negative = format!("{}-{}", base.prefix(), base.format_spec());
    [
        "        let v = self.0 as i64;".to_string(),
        "        if v < 0 {".to_string(),
        format!("            ::std::format!(\"{negative}\", v.unsigned_abs())"),
        "        } else {".to_string(),
        format!("            ::std::format!(\"{pattern}\", v)"),
        "        }".to_string(),
    ]
    .join("\n")
}
