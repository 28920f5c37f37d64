use std::sync::Arc;

use valprims_request::{AdapterConfig, RequestParts, RequestValidator, RouteValidation};
use valprims_schema::SchemaLoader;
use valprims_validate::ValidationContext;

use crate::cmd::{parse_json_arg, RequestArgs};
use crate::exit::{read_file, request_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_request, OutputFormat};

pub fn run(args: RequestArgs, format: OutputFormat) -> CliResult<i32> {
    let ctx = Arc::new(ValidationContext::with_builtins());
    let context = args.route.display().to_string();

    let raw_route = read_file(&args.route)?;
    let route = RouteValidation::load_str(&SchemaLoader::new(ctx.types()), &raw_route)
        .map_err(|err| request_error(&context, err))?;

    let mut req = RequestParts::new();
    if let Some(raw) = &args.query {
        req = req.with_query(parse_json_arg("query", raw)?);
    }
    if let Some(raw) = &args.body {
        req = req.with_body(parse_json_arg("body", raw)?);
    }
    if let Some(raw) = &args.params {
        req = req.with_params(parse_json_arg("params", raw)?);
    }

    let config = AdapterConfig {
        query_key: args.query_key,
        body_key: args.body_key,
        params_key: args.params_key,
    };
    let validator = RequestValidator::with_config(ctx, config);

    match validator.validate_request(&route, &mut req) {
        Ok(()) => {
            print_request(&req.validated, None, format);
            Ok(SUCCESS)
        }
        Err(valprims_request::RequestError::Validate(err)) if err.is_input_error() => {
            print_request(&req.validated, Some(&err.diagnostic()), format);
            Ok(DATA_INVALID)
        }
        Err(err) => Err(request_error("request", err)),
    }
}
