use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("valprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: valprims");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("build_target: {}", env!("VALPRIMS_BUILD_TARGET"));
    println!(
        "rustc: {}",
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "features: request={}, cli=true",
        cfg!(feature = "request")
    );
    println!(
        "builtin_types: {}",
        valprims_schema::TypeRegistry::with_builtins().names().join(",")
    );
    println!(
        "builtin_rules: {}",
        valprims_validate::RuleRegistry::with_builtins().names().join(",")
    );

    Ok(SUCCESS)
}
