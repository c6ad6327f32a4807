//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::generate::GenerateArgs;
use crate::commands::report::ReportArgs;
use crate::commands::run_common::GeneratorArgs;

/// Flags shared by every command.
pub struct GeneratorParams {
    pub catalog_path: PathBuf,
    pub template: Option<PathBuf>,
    pub list_types: Vec<String>,
    pub set_types: Vec<String>,
    pub map_types: Vec<String>,
}

impl GeneratorParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            catalog_path: m
                .get_one::<PathBuf>("catalog_path")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("-")),
            template: m.get_one::<PathBuf>("template").cloned(),
            list_types: get_many(m, "list_type"),
            set_types: get_many(m, "set_type"),
            map_types: get_many(m, "map_type"),
        }
    }
}

impl From<GeneratorParams> for GeneratorArgs {
    fn from(p: GeneratorParams) -> Self {
        Self {
            catalog_path: p.catalog_path,
            template: p.template,
            list_types: p.list_types,
            set_types: p.set_types,
            map_types: p.map_types,
        }
    }
}

pub struct GenerateParams {
    pub generator: GeneratorParams,
    pub output: Option<PathBuf>,
    pub runtime_path: String,
    pub header: Option<String>,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            generator: GeneratorParams::from_matches(m),
            output: m.get_one::<PathBuf>("output").cloned(),
            runtime_path: m
                .get_one::<String>("runtime_path")
                .cloned()
                .unwrap_or_else(|| rolemeta_gen::config::DEFAULT_RUNTIME_PATH.to_string()),
            header: m.get_one::<String>("header").cloned(),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            generator: p.generator.into(),
            output: p.output,
            runtime_path: p.runtime_path,
            header: p.header,
        }
    }
}

pub struct ReportParams {
    pub generator: GeneratorParams,
    pub color: ColorChoice,
}

impl ReportParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            generator: GeneratorParams::from_matches(m),
            color: parse_color(m),
        }
    }
}

impl From<ReportParams> for ReportArgs {
    fn from(p: ReportParams) -> Self {
        Self {
            generator: p.generator.into(),
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub generator: GeneratorParams,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            generator: GeneratorParams::from_matches(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            generator: p.generator.into(),
        }
    }
}

/// Default log filter for a `-v` count.
pub fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn get_many(m: &ArgMatches, id: &str) -> Vec<String> {
    m.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
