/// Errors that can occur while validating requests or loading routes.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// A request map failed validation.
    #[error("request validation error: {0}")]
    Validate(#[from] valprims_validate::ValidateError),

    /// A route declaration contains an invalid schema.
    #[error("schema error: {0}")]
    Schema(#[from] valprims_schema::SchemaError),

    /// A route file could not be loaded.
    #[error("failed to load route: {0}")]
    LoadFailed(String),

    /// A route document is not valid JSON.
    #[error("route is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// No route registered under the given id.
    #[error("no route registered for '{0}'")]
    UnknownRoute(String),
}

pub type Result<T> = std::result::Result<T, RequestError>;
