use rolemeta_runtime::Registry;

use super::catalog_loader::load_catalog;
use super::run_common::{GeneratorArgs, exit_with_error};

pub struct CheckArgs {
    pub generator: GeneratorArgs,
}

pub fn run(args: CheckArgs) {
    let handlers = execute(&args).unwrap_or_else(|msg| exit_with_error(&msg));
    tracing::info!(handlers, "catalog is valid");
    // Silent on success (like cargo check)
}

/// Generate every handler and build the dispatch registry from them.
/// Returns the number of registered handlers.
pub fn execute(args: &CheckArgs) -> Result<usize, String> {
    let config = args.generator.config()?;
    let catalog = load_catalog(&args.generator.catalog_path)?;
    let registry = Registry::build(&catalog, &config).map_err(|e| e.to_string())?;
    Ok(registry.len())
}
