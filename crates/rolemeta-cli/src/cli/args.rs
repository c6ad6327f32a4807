//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Catalog file (positional, `-` for stdin).
pub fn catalog_path_arg() -> Arg {
    Arg::new("catalog_path")
        .value_name("CATALOG")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Node-type catalog (JSON), or - for stdin")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to file")
}

/// Path generated code imports the runtime from (--runtime-path).
pub fn runtime_path_arg() -> Arg {
    Arg::new("runtime_path")
        .long("runtime-path")
        .value_name("PATH")
        .default_value(rolemeta_gen::config::DEFAULT_RUNTIME_PATH)
        .help("Module path of the runtime crate in generated code")
}

/// Header line of the generated module (--header).
pub fn header_arg() -> Arg {
    Arg::new("header")
        .long("header")
        .value_name("TEXT")
        .help("First line of the generated module")
}

/// Custom handler template (--template).
pub fn template_arg() -> Arg {
    Arg::new("template")
        .long("template")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Handler template file (replaces the built-in one)")
}

/// Extra list container names (--list-type).
pub fn list_type_arg() -> Arg {
    Arg::new("list_type")
        .long("list-type")
        .value_name("NAME")
        .action(ArgAction::Append)
        .help("Also treat NAME<T> as a list container")
}

/// Extra set container names (--set-type).
pub fn set_type_arg() -> Arg {
    Arg::new("set_type")
        .long("set-type")
        .value_name("NAME")
        .action(ArgAction::Append)
        .help("Also treat NAME<T> as a set container")
}

/// Extra map container names (--map-type).
pub fn map_type_arg() -> Arg {
    Arg::new("map_type")
        .long("map-type")
        .value_name("NAME")
        .action(ArgAction::Append)
        .help("Also treat NAME<K, V> as a map container")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Verbosity level (-v for info, -vv for debug, -vvv for trace)")
}
