use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::{Map, Value};
use valprims_request::{DocRow, RouteDoc};
use valprims_validate::Diagnostic;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

const CHECK_SCHEMA_ID: &str = "https://schemas.3leaps.dev/valprims/cli/v1/check-result.schema.json";
const REQUEST_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/valprims/cli/v1/request-result.schema.json";
const ROUTE_DOC_SCHEMA_ID: &str = "https://schemas.3leaps.dev/valprims/cli/v1/route-doc.schema.json";

#[derive(Serialize)]
struct CheckOutput<'a> {
    schema_id: &'a str,
    valid: bool,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a Diagnostic>,
}

#[derive(Serialize)]
struct RequestOutput<'a> {
    schema_id: &'a str,
    valid: bool,
    validated: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a Diagnostic>,
}

#[derive(Serialize)]
struct RouteDocOutput<'a> {
    schema_id: &'a str,
    route: &'a str,
    #[serde(flatten)]
    doc: &'a RouteDoc,
}

/// Print the outcome of a single value check. `Ok(None)` means the value
/// resolved to absent.
pub fn print_checked(name: &str, result: Result<Option<&Value>, &Diagnostic>, format: OutputFormat) {
    let (value, error) = match result {
        Ok(value) => (value, None),
        Err(diag) => (None, Some(diag)),
    };
    match format {
        OutputFormat::Json => {
            let out = CheckOutput {
                schema_id: CHECK_SCHEMA_ID,
                valid: error.is_none(),
                name,
                value,
                error,
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["NAME", "VALID", "VALUE", "ERROR"]);
            table.add_row(vec![
                name.to_string(),
                error.is_none().to_string(),
                value.map(Value::to_string).unwrap_or_else(|| "-".to_string()),
                error.map(describe_diagnostic).unwrap_or_else(|| "-".to_string()),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match error {
            Some(diag) => println!("{name}: invalid ({})", describe_diagnostic(diag)),
            None => println!(
                "{name}: ok {}",
                value.map(Value::to_string).unwrap_or_else(|| "<absent>".to_string())
            ),
        },
        OutputFormat::Raw => {
            if let Some(value) = value {
                print_raw(value.to_string().as_bytes());
            }
        }
    }
}

/// Print validated request maps, or the diagnostic of the rejected one.
pub fn print_request(
    validated: &Map<String, Value>,
    error: Option<&Diagnostic>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = RequestOutput {
                schema_id: REQUEST_SCHEMA_ID,
                valid: error.is_none(),
                validated,
                error,
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["KEY", "VALUE"]);
            for (key, value) in validated {
                table.add_row(vec![key.clone(), value.to_string()]);
            }
            if let Some(diag) = error {
                table.add_row(vec!["<error>".to_string(), describe_diagnostic(diag)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (key, value) in validated {
                println!("{key} = {value}");
            }
            if let Some(diag) = error {
                println!("rejected: {}", describe_diagnostic(diag));
            }
        }
        OutputFormat::Raw => {
            print_raw(Value::Object(validated.clone()).to_string().as_bytes());
        }
    }
}

/// Print the documentation of one or more routes.
pub fn print_route_docs(docs: &[(String, RouteDoc)], format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            for (route, doc) in docs {
                let out = RouteDocOutput {
                    schema_id: ROUTE_DOC_SCHEMA_ID,
                    route,
                    doc,
                };
                println!("{}", to_json(&out));
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["ROUTE", "FIELD", "TYPE", "REQUIRED", "DEFAULT", "RULES"]);
            for (route, row) in doc_rows(docs) {
                table.add_row(vec![
                    route.to_string(),
                    row.path.clone(),
                    row.type_name.clone(),
                    row.required.to_string(),
                    row.default
                        .as_ref()
                        .map(Value::to_string)
                        .unwrap_or_else(|| "-".to_string()),
                    row.rules.join(","),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (route, row) in doc_rows(docs) {
                let required = if row.required { "required" } else { "optional" };
                println!("{route} {} {} {required}", row.path, row.type_name);
            }
        }
    }
}

fn doc_rows(docs: &[(String, RouteDoc)]) -> Vec<(&str, DocRow)> {
    let mut rows = Vec::new();
    for (route, doc) in docs {
        if let Some(body) = &doc.body {
            rows.extend(body.rows("body").into_iter().map(|row| (route.as_str(), row)));
        }
        if let Some(query) = &doc.query {
            rows.extend(query.rows("query").into_iter().map(|row| (route.as_str(), row)));
        }
    }
    rows
}

fn describe_diagnostic(diag: &Diagnostic) -> String {
    format!("{} at '{}': {}", diag.kind, diag.field, diag.reason)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
