//! Constant declarations as handed over by the extraction step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// Integer primitive backing a generated newtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntegerKind {
    /// Primitive name as written in Rust source.
    pub fn rust_name(&self) -> &'static str {
        match self {
            IntegerKind::I8 => "i8",
            IntegerKind::I16 => "i16",
            IntegerKind::I32 => "i32",
            IntegerKind::I64 => "i64",
            IntegerKind::Isize => "isize",
            IntegerKind::U8 => "u8",
            IntegerKind::U16 => "u16",
            IntegerKind::U32 => "u32",
            IntegerKind::U64 => "u64",
            IntegerKind::Usize => "usize",
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            IntegerKind::I8
                | IntegerKind::I16
                | IntegerKind::I32
                | IntegerKind::I64
                | IntegerKind::Isize
        )
    }

    /// Width in bits. Pointer-sized kinds are treated as 64 bits, the widest
    /// value a declaration can carry.
    pub fn bits(&self) -> u32 {
        match self {
            IntegerKind::I8 | IntegerKind::U8 => 8,
            IntegerKind::I16 | IntegerKind::U16 => 16,
            IntegerKind::I32 | IntegerKind::U32 => 32,
            IntegerKind::I64 | IntegerKind::U64 | IntegerKind::Isize | IntegerKind::Usize => 64,
        }
    }

    /// Inclusive range of values this kind can hold.
    pub fn range(&self) -> (i128, i128) {
        let bits = self.bits();
        if self.is_signed() {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
        } else {
            (0, (1i128 << bits) - 1)
        }
    }

    pub fn contains(&self, value: i128) -> bool {
        let (lo, hi) = self.range();
        lo <= value && value <= hi
    }

    /// Parse an underlying type name, failing for anything that is not an
    /// integer primitive.
    pub fn parse_for(type_name: &str, underlying: &str) -> GenResult<Self> {
        underlying
            .parse()
            .map_err(|_| GenError::NonIntegerUnderlyingType {
                type_name: type_name.to_string(),
                underlying: underlying.to_string(),
            })
    }
}

impl FromStr for IntegerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "i8" => Ok(IntegerKind::I8),
            "i16" => Ok(IntegerKind::I16),
            "i32" => Ok(IntegerKind::I32),
            "i64" => Ok(IntegerKind::I64),
            "isize" => Ok(IntegerKind::Isize),
            "u8" => Ok(IntegerKind::U8),
            "u16" => Ok(IntegerKind::U16),
            "u32" => Ok(IntegerKind::U32),
            "u64" => Ok(IntegerKind::U64),
            "usize" => Ok(IntegerKind::Usize),
            other => Err(format!("not an integer primitive: {other}")),
        }
    }
}

impl fmt::Display for IntegerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_name())
    }
}

/// One named integer constant of the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantDeclaration {
    /// Name as declared; used by the exhaustiveness guard.
    pub original_name: String,
    /// Name with the configured prefix stripped; what lookups return.
    pub trimmed_name: String,
    /// Value stored as a bit pattern. `signed` says how to read it.
    pub raw_value: u64,
    pub signed: bool,
    /// Literal text used wherever the value appears in emitted code.
    pub literal_text: String,
    /// Trailing comment text, possibly empty.
    pub description: String,
}

impl ConstantDeclaration {
    /// Build a declaration from an already range-checked value.
    ///
    /// `literal_text` falls back to the decimal rendering of the value.
    pub fn new(
        original_name: impl Into<String>,
        value: i128,
        signed: bool,
        literal_text: Option<String>,
        description: impl Into<String>,
        trim_prefix: &str,
    ) -> Self {
        let original_name = original_name.into();
        let trimmed_name = original_name
            .strip_prefix(trim_prefix)
            .unwrap_or(&original_name)
            .to_string();
        Self {
            trimmed_name,
            original_name,
            raw_value: value as u64,
            signed,
            literal_text: literal_text.unwrap_or_else(|| value.to_string()),
            description: description.into(),
        }
    }

    /// Numeric value with the declared signedness applied.
    pub fn value(&self) -> i128 {
        if self.signed {
            self.raw_value as i64 as i128
        } else {
            self.raw_value as i128
        }
    }

    /// Literal as an operand: negative literals are parenthesized so they
    /// can follow a binary minus.
    pub fn operand(&self) -> String {
        if self.literal_text.starts_with('-') {
            format!("({})", self.literal_text)
        } else {
            self.literal_text.clone()
        }
    }
}
