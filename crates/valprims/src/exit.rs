use std::fmt;
use std::io;
use std::path::Path;

use valprims_request::RequestError;
use valprims_schema::SchemaError;
use valprims_validate::ValidateError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const CONFIG_INVALID: i32 = 78;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn read_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

/// Every schema error is a configuration defect.
pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    CliError::new(CONFIG_INVALID, format!("{context}: {err}"))
}

pub fn validate_error(context: &str, err: ValidateError) -> CliError {
    let code = if err.is_input_error() {
        DATA_INVALID
    } else {
        CONFIG_INVALID
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn request_error(context: &str, err: RequestError) -> CliError {
    match err {
        RequestError::Validate(err) => validate_error(context, err),
        RequestError::Schema(err) => schema_error(context, err),
        RequestError::InvalidJson(_) => CliError::new(CONFIG_INVALID, format!("{context}: {err}")),
        RequestError::UnknownRoute(_) => CliError::new(USAGE, format!("{context}: {err}")),
        RequestError::LoadFailed(_) => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}
