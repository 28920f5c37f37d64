use valprims_request::{describe_route, RouteDoc, RouteTable, RouteValidation};
use valprims_schema::{SchemaLoader, TypeRegistry};

use crate::cmd::DescribeArgs;
use crate::exit::{read_file, request_error, CliResult, SUCCESS};
use crate::output::{print_route_docs, OutputFormat};

pub fn run(args: DescribeArgs, format: OutputFormat) -> CliResult<i32> {
    let types = TypeRegistry::with_builtins();
    let context = args.path.display().to_string();

    let docs: Vec<(String, RouteDoc)> = if args.path.is_dir() {
        let table = RouteTable::from_directory(&args.path, &types)
            .map_err(|err| request_error(&context, err))?;
        let mut docs = Vec::new();
        for id in table.ids() {
            let route = table.route(id).map_err(|err| request_error(&context, err))?;
            docs.push((id.to_string(), describe_route(route)));
        }
        docs
    } else {
        let raw = read_file(&args.path)?;
        let route = RouteValidation::load_str(&SchemaLoader::new(&types), &raw)
            .map_err(|err| request_error(&context, err))?;
        vec![(route_name(&args.path), describe_route(&route))]
    };

    tracing::debug!(routes = docs.len(), "describing routes");
    print_route_docs(&docs, format);
    Ok(SUCCESS)
}

fn route_name(path: &std::path::Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_name
        .strip_suffix(".route.json")
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name.as_str())
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn route_name_strips_known_suffixes() {
        assert_eq!(route_name(Path::new("/tmp/users.route.json")), "users");
        assert_eq!(route_name(Path::new("orders.json")), "orders");
        assert_eq!(route_name(Path::new("plain")), "plain");
    }
}
