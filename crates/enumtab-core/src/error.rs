//! Error types for the generation pipeline.

use thiserror::Error;

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenError>;

/// Errors that abort generation for the current invocation.
///
/// None of these are recoverable: the input is static, so re-running
/// without fixing it reproduces the same fault.
#[derive(Debug, Error)]
pub enum GenError {
    /// No constants were found for the requested type.
    #[error("no values defined for type {type_name}")]
    EmptyDeclarationSet { type_name: String },

    /// The type's underlying representation is not a 64-bit-or-smaller integer.
    #[error("can't handle non-integer underlying type `{underlying}` of type {type_name}")]
    NonIntegerUnderlyingType {
        type_name: String,
        underlying: String,
    },

    /// A constant's value does not fit the underlying integer type.
    #[error("value `{value}` of constant {constant} does not fit {underlying} (type {type_name})")]
    UnrepresentableValue {
        type_name: String,
        constant: String,
        value: String,
        underlying: String,
    },

    /// A configuration option is out of its supported range.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The declaration manifest is not valid JSON for the expected schema.
    #[error("malformed declaration manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A fixed-shape template failed to render.
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),

    /// Writing a lookup body failed.
    #[error("code emission failed: {0}")]
    Emit(#[from] std::fmt::Error),
}

impl GenError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an empty declaration set error for a type.
    pub fn empty(type_name: impl Into<String>) -> Self {
        Self::EmptyDeclarationSet {
            type_name: type_name.into(),
        }
    }
}
