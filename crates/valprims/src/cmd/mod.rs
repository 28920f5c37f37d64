use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod describe;
pub mod request;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one value against a schema node file.
    Check(CheckArgs),
    /// Validate query, body and params against a route file.
    Request(RequestArgs),
    /// Print the accepted body and query shape of routes.
    Describe(DescribeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Request(args) => request::run(args, format),
        Command::Describe(args) => describe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema node file (JSON).
    pub schema: PathBuf,
    /// JSON value to validate.
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub value: Option<String>,
    /// Raw string value to validate.
    #[arg(long, conflicts_with_all = ["value", "file"])]
    pub text: Option<String>,
    /// Read the JSON value from a file.
    #[arg(long, conflicts_with_all = ["value", "text"])]
    pub file: Option<PathBuf>,
    /// Field name used in error reports.
    #[arg(long, default_value = "value")]
    pub name: String,
    /// Maximum schema nesting depth.
    #[arg(long, env = "VALPRIMS_MAX_DEPTH")]
    pub max_depth: Option<usize>,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Route declaration file (JSON).
    pub route: PathBuf,
    /// Raw query map (JSON).
    #[arg(long)]
    pub query: Option<String>,
    /// Raw body (JSON).
    #[arg(long)]
    pub body: Option<String>,
    /// Raw path parameters (JSON).
    #[arg(long)]
    pub params: Option<String>,
    /// Key the validated query is stored under.
    #[arg(long, default_value = "query")]
    pub query_key: String,
    /// Key the validated body is stored under.
    #[arg(long, default_value = "body")]
    pub body_key: String,
    /// Key the validated params are stored under.
    #[arg(long, default_value = "params")]
    pub params_key: String,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Route file, or a directory of `*.route.json` files.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a JSON argument, mapping syntax errors to a usage failure.
pub(crate) fn parse_json_arg(flag: &str, raw: &str) -> CliResult<serde_json::Value> {
    serde_json::from_str(raw).map_err(|err| {
        crate::exit::CliError::new(crate::exit::USAGE, format!("invalid JSON for --{flag}: {err}"))
    })
}
