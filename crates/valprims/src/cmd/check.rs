use serde_json::Value;
use valprims_schema::{LoaderConfig, SchemaLoader};
use valprims_validate::{validate_value, ValidationContext};

use crate::cmd::{parse_json_arg, CheckArgs};
use crate::exit::{read_file, schema_error, validate_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_checked, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let ctx = ValidationContext::with_builtins();

    let mut config = LoaderConfig::default();
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    let schema = read_file(&args.schema)?;
    let node = SchemaLoader::with_config(ctx.types(), config)
        .load_str(&schema)
        .map_err(|err| schema_error(&args.schema.display().to_string(), err))?;

    let input = read_input(&args)?;
    tracing::debug!(name = %args.name, present = input.is_some(), "checking value");

    match validate_value(&node, &ctx, &args.name, input.as_ref()) {
        Ok(value) => {
            print_checked(&args.name, Ok(value.as_ref()), format);
            Ok(SUCCESS)
        }
        Err(err) if err.is_input_error() => {
            print_checked(&args.name, Err(&err.diagnostic()), format);
            Ok(DATA_INVALID)
        }
        Err(err) => Err(validate_error("check", err)),
    }
}

/// No input flag means the value is absent.
fn read_input(args: &CheckArgs) -> CliResult<Option<Value>> {
    if let Some(raw) = &args.value {
        return parse_json_arg("value", raw).map(Some);
    }
    if let Some(text) = &args.text {
        return Ok(Some(Value::String(text.clone())));
    }
    if let Some(path) = &args.file {
        let raw = read_file(path)?;
        return parse_json_arg("file", &raw).map(Some);
    }
    Ok(None)
}
