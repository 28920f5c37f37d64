mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "valprims", version, about = "Parameter validation CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "VALPRIMS_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "valprims",
            "check",
            "schema.json",
            "--value",
            "{\"id\":\"1\"}",
            "--name",
            "body",
        ])
        .expect("check args should parse");

        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn rejects_conflicting_value_args() {
        let err = Cli::try_parse_from([
            "valprims",
            "check",
            "schema.json",
            "--value",
            "1",
            "--text",
            "1",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_request_subcommand_with_keys() {
        let cli = Cli::try_parse_from([
            "valprims",
            "request",
            "users.route.json",
            "--query",
            "{}",
            "--query-key",
            "validQuery",
            "--format",
            "json",
        ])
        .expect("request args should parse");
        match cli.command {
            Command::Request(args) => assert_eq!(args.query_key, "validQuery"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
