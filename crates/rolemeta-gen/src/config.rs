//! Generator settings.

use rolemeta_core::Colors;

use crate::classify::ContainerShapes;
use crate::error::GenerateError;
use crate::template::{HANDLER_TEMPLATE, Template};

/// First line of every generated module.
pub const DEFAULT_HEADER: &str = "// @generated by rolemeta. Do not edit.";

/// Crate path the generated module imports its runtime items from.
pub const DEFAULT_RUNTIME_PATH: &str = "rolemeta_runtime";

/// Configuration for a generation run.
///
/// Built with consuming setters:
///
/// ```
/// use rolemeta_gen::GeneratorConfig;
/// let config = GeneratorConfig::new().runtime_path("crate::handlers");
/// assert_eq!(config.runtime_path_str(), "crate::handlers");
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    header: String,
    runtime_path: String,
    shapes: ContainerShapes,
    colors: Colors,
    handler_template: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            shapes: ContainerShapes::default(),
            colors: Colors::OFF,
            handler_template: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    pub fn shapes(mut self, shapes: ContainerShapes) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn colored(mut self, enabled: bool) -> Self {
        self.colors = Colors::new(enabled);
        self
    }

    /// Replace the built-in handler skeleton.
    pub fn handler_template(mut self, text: impl Into<String>) -> Self {
        self.handler_template = Some(text.into());
        self
    }

    pub fn header_str(&self) -> &str {
        &self.header
    }

    pub fn runtime_path_str(&self) -> &str {
        &self.runtime_path
    }

    pub fn container_shapes(&self) -> &ContainerShapes {
        &self.shapes
    }

    pub fn colors(&self) -> Colors {
        self.colors
    }

    /// Parse the configured handler skeleton.
    pub fn parse_handler_template(&self) -> Result<Template, GenerateError> {
        let text = self.handler_template.as_deref().unwrap_or(HANDLER_TEMPLATE);
        Template::parse(text).map_err(GenerateError::Template)
    }
}
