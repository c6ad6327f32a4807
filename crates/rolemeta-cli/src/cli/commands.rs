//! Command builders for the CLI.
//!
//! Generation-shaping flags (container shapes, template) are shared by every
//! command, so `check` and `report` see the same handlers `generate` emits.

use clap::Command;

use super::args::*;

fn with_generator_args(cmd: Command) -> Command {
    cmd.arg(catalog_path_arg())
        .arg(template_arg())
        .arg(list_type_arg())
        .arg(set_type_arg())
        .arg(map_type_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("rolemeta")
        .about("Role handler generation for node-type catalogs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(generate_command())
        .subcommand(report_command())
        .subcommand(check_command())
}

/// Generate the handler module.
pub fn generate_command() -> Command {
    let cmd = Command::new("generate")
        .about("Generate role handlers for a catalog")
        .after_help(
            r#"EXAMPLES:
  rolemeta generate catalog.json                    # module to stdout
  rolemeta generate catalog.json -o src/handlers.rs
  rolemeta generate catalog.json --runtime-path crate::runtime
  cat catalog.json | rolemeta generate -"#,
        )
        .arg(output_file_arg())
        .arg(runtime_path_arg())
        .arg(header_arg());

    with_generator_args(cmd)
}

/// Print the concept report.
pub fn report_command() -> Command {
    let cmd = Command::new("report")
        .about("List generated handlers with their accessors")
        .after_help(
            r#"EXAMPLES:
  rolemeta report catalog.json
  rolemeta report catalog.json --color never"#,
        )
        .arg(color_arg());

    with_generator_args(cmd)
}

/// Validate a catalog.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Validate a catalog without writing anything")
        .after_help(
            r#"EXAMPLES:
  rolemeta check catalog.json                      # silent on success
  rolemeta check catalog.json --template h.tmpl    # also validate a template"#,
        );

    with_generator_args(cmd)
}
