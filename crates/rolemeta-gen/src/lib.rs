//! Role handler generator.
//!
//! Pipeline, leaves first:
//! - `classify` - container-kind classification and value-type normalization
//! - `metamodel` - catalog validation, field descriptors, root declaring types
//! - `template` - handler skeleton substitution
//! - `synth` - handler synthesis and module assembly
//! - `report` - human-readable concept report
//!
//! Generation is an all-or-nothing batch: [`generate`] either returns a
//! complete [`Generation`] or an error, never a partial handler set.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod classify;
pub mod config;
mod error;
pub mod metamodel;
pub mod report;
pub mod synth;
pub mod template;

#[cfg(test)]
pub mod test_utils;

pub use classify::{Classification, ContainerKind, ContainerShapes, classify};
pub use config::GeneratorConfig;
pub use error::{GenerateError, IllegalContainerKind, TemplateError};
pub use metamodel::{FieldDescriptor, Metamodel, NodeTypeId, NodeTypeInfo};
pub use report::render_report;
pub use synth::{Generation, HandlerArtifact, HandlerParams, generate};
pub use template::{Param, Template};

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
