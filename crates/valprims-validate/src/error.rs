use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Reason code carried by a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// A `multiple` node received something other than an array.
    NotArray,
    /// An object node received something other than a mapping.
    NotObject,
    /// A declared, non-optional field resolved to absent.
    Required,
    /// The input carried a key the object node does not declare.
    Unexpected,
    /// The named rule rejected the value.
    Rule(String),
}

impl Reason {
    /// Machine-readable code: the variant name, or the rule name.
    pub fn code(&self) -> &str {
        match self {
            Reason::NotArray => "NotArray",
            Reason::NotObject => "NotObject",
            Reason::Required => "Required",
            Reason::Unexpected => "Unexpected",
            Reason::Rule(name) => name,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Shape, presence, unexpected-key or rule failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("field '{field}' rejected: {reason}")]
pub struct ValidationError {
    /// Field name, or the rule name for rule failures.
    pub field: String,
    /// Offending value; `None` when the value was absent.
    pub value: Option<Value>,
    pub reason: Reason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, value: Option<Value>, reason: Reason) -> Self {
        Self {
            field: field.into(),
            value,
            reason,
        }
    }
}

/// A leaf type predicate rejected the value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("field '{field}' is not a valid {type_name}")]
pub struct InvalidTypeError {
    pub field: String,
    pub value: Value,
    /// Name of the rejecting type descriptor.
    pub type_name: String,
}

/// Errors raised by the interpreter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidateError {
    /// Generic validation failure.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Wrong type for the declared type descriptor.
    #[error("invalid type: {0}")]
    InvalidType(#[from] InvalidTypeError),

    /// A leaf node has no type descriptor.
    #[error("schema error: leaf field '{field}' has no type descriptor")]
    MissingType { field: String },

    /// A named rule is not in the rule registry.
    #[error("schema error: unknown rule '{rule}'")]
    UnknownRule { rule: String },
}

impl ValidateError {
    /// Field (or rule) the error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidateError::Validation(err) => &err.field,
            ValidateError::InvalidType(err) => &err.field,
            ValidateError::MissingType { field } => field,
            ValidateError::UnknownRule { rule } => rule,
        }
    }

    /// Reason code for diagnostics.
    pub fn reason_code(&self) -> &str {
        match self {
            ValidateError::Validation(err) => err.reason.code(),
            ValidateError::InvalidType(_) => "InvalidType",
            ValidateError::MissingType { .. } => "MissingType",
            ValidateError::UnknownRule { .. } => "UnknownRule",
        }
    }

    /// True for errors caused by the input rather than by the schema.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ValidateError::Validation(_) | ValidateError::InvalidType(_)
        )
    }

    /// Structured form for machine-readable responses.
    pub fn diagnostic(&self) -> Diagnostic {
        let (kind, value) = match self {
            ValidateError::Validation(err) => ("validation", err.value.clone()),
            ValidateError::InvalidType(err) => ("invalid_type", Some(err.value.clone())),
            ValidateError::MissingType { .. } | ValidateError::UnknownRule { .. } => {
                ("schema", None)
            }
        };
        Diagnostic {
            kind,
            field: self.field().to_string(),
            value,
            reason: self.reason_code().to_string(),
        }
    }
}

/// Serializable rendering of a [`ValidateError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// `validation`, `invalid_type` or `schema`.
    pub kind: &'static str,
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, ValidateError>;
