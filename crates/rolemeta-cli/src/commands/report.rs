use rolemeta_core::Colors;
use rolemeta_gen::render_report;

use super::run_common::{GeneratorArgs, exit_with_error, run_generation};

pub struct ReportArgs {
    pub generator: GeneratorArgs,
    pub color: bool,
}

pub fn run(args: ReportArgs) {
    let report = execute(&args).unwrap_or_else(|msg| exit_with_error(&msg));
    print!("{}", report);
}

pub fn execute(args: &ReportArgs) -> Result<String, String> {
    let config = args.generator.config()?.colored(args.color);
    let generation = run_generation(&args.generator, &config)?;
    Ok(render_report(&generation, config.colors()))
}
