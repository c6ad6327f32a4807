//! Shared logic for every command: configuration and the generation run.

use std::path::PathBuf;

use rolemeta_gen::{ContainerShapes, Generation, GeneratorConfig, Metamodel, generate};

use super::catalog_loader::{load_catalog, read_file};

pub struct GeneratorArgs {
    pub catalog_path: PathBuf,
    pub template: Option<PathBuf>,
    pub list_types: Vec<String>,
    pub set_types: Vec<String>,
    pub map_types: Vec<String>,
}

impl GeneratorArgs {
    /// Generator configuration from the shared flags, on top of the defaults.
    pub fn config(&self) -> Result<GeneratorConfig, String> {
        let mut shapes = ContainerShapes::default();
        for name in &self.list_types {
            shapes = shapes.list(name.as_str());
        }
        for name in &self.set_types {
            shapes = shapes.set(name.as_str());
        }
        for name in &self.map_types {
            shapes = shapes.map(name.as_str());
        }

        let mut config = GeneratorConfig::new().shapes(shapes);
        if let Some(path) = &self.template {
            config = config.handler_template(read_file(path)?);
        }
        Ok(config)
    }
}

/// Load the catalog, validate it and generate every handler.
pub fn run_generation(args: &GeneratorArgs, config: &GeneratorConfig) -> Result<Generation, String> {
    let catalog = load_catalog(&args.catalog_path)?;
    let metamodel =
        Metamodel::build(&catalog, config.container_shapes()).map_err(|e| e.to_string())?;
    generate(&metamodel, config).map_err(|e| e.to_string())
}

pub fn exit_with_error(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(1);
}
