/// Errors that can occur while building schema nodes from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema node names a type that is not registered.
    #[error("unknown type '{name}' at {path}")]
    UnknownType { name: String, path: String },

    /// A `validate` entry is neither `true` nor an argument array.
    #[error("invalid rule '{rule}' at {path}: {reason}")]
    InvalidRule {
        rule: String,
        path: String,
        reason: String,
    },

    /// The schema node could not be decoded.
    #[error("invalid schema node at {path}: {message}")]
    InvalidNode { path: String, message: String },

    /// Nesting exceeds the configured maximum depth.
    #[error("schema nesting too deep at {path} (max {max})")]
    TooDeep { path: String, max: usize },

    /// The schema document is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
