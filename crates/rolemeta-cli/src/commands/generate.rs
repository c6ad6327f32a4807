use std::fs;
use std::path::PathBuf;

use rolemeta_gen::Generation;

use super::run_common::{GeneratorArgs, exit_with_error, run_generation};

pub struct GenerateArgs {
    pub generator: GeneratorArgs,
    pub output: Option<PathBuf>,
    pub runtime_path: String,
    pub header: Option<String>,
}

pub fn run(args: GenerateArgs) {
    let generation = execute(&args).unwrap_or_else(|msg| exit_with_error(&msg));

    let Some(path) = &args.output else {
        print!("{}", generation.module_source);
        return;
    };
    if let Err(e) = fs::write(path, &generation.module_source) {
        exit_with_error(&format!("failed to write '{}': {}", path.display(), e));
    }
    tracing::info!(
        path = %path.display(),
        handlers = generation.len(),
        "wrote handler module"
    );
}

pub fn execute(args: &GenerateArgs) -> Result<Generation, String> {
    let mut config = args
        .generator
        .config()?
        .runtime_path(args.runtime_path.as_str());
    if let Some(header) = &args.header {
        config = config.header(header.as_str());
    }
    run_generation(&args.generator, &config)
}
