//! Handler synthesis.
//!
//! One handler per root descriptor, rendered from the handler skeleton, then
//! assembled into a single module followed by a handler table in the
//! deterministic introspection order.

use std::collections::{BTreeSet, HashSet};

use rolemeta_core::Role;
use rolemeta_core::utils::to_pascal_case;

use crate::Result;
use crate::classify::ContainerKind;
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::metamodel::{FieldDescriptor, Metamodel, NodeTypeId};
use crate::template::{Param, Template};

/// Substitution values for one handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerParams {
    pub handler_name: String,
    pub getter_name: String,
    /// Absent for read-only roles; drops the setter section.
    pub setter_name: Option<String>,
    /// Role as a `Role` variant name, e.g. `TypeArgument`.
    pub role: String,
    /// Owner type as a path, e.g. `code::Invocation`.
    pub target_type: String,
    pub handler_family: String,
    pub value_type: String,
}

impl HandlerParams {
    pub fn from_descriptor(desc: &FieldDescriptor, handler_name: String) -> Self {
        Self {
            handler_name,
            getter_name: desc.getter.clone(),
            setter_name: desc.setter.clone(),
            role: to_pascal_case(desc.role.name()),
            target_type: desc.owner_name.replace('.', "::"),
            handler_family: desc.kind.handler_family().to_string(),
            value_type: desc.value_type.to_string(),
        }
    }

    pub fn get(&self, param: Param) -> Option<&str> {
        match param {
            Param::HandlerName => Some(&self.handler_name),
            Param::GetterName => Some(&self.getter_name),
            Param::SetterName => self.setter_name.as_deref(),
            Param::Role => Some(&self.role),
            Param::TargetType => Some(&self.target_type),
            Param::HandlerFamily => Some(&self.handler_family),
            Param::ValueType => Some(&self.value_type),
        }
    }
}

/// One synthesized handler.
#[derive(Clone, Debug)]
pub struct HandlerArtifact {
    pub params: HandlerParams,
    pub role: Role,
    pub kind: ContainerKind,
    /// Root declaring type the handler is bound to.
    pub owner: NodeTypeId,
    pub owner_name: String,
    /// Rendered handler unit.
    pub source: String,
}

impl HandlerArtifact {
    pub fn name(&self) -> &str {
        &self.params.handler_name
    }

    pub fn is_mutable(&self) -> bool {
        self.params.setter_name.is_some()
    }
}

/// Complete output of a generation run.
#[derive(Clone, Debug)]
pub struct Generation {
    /// Root descriptors, in handler order.
    pub descriptors: Vec<FieldDescriptor>,
    /// Handlers, parallel to `descriptors`.
    pub artifacts: Vec<HandlerArtifact>,
    pub module_source: String,
}

impl Generation {
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn artifact(&self, owner_name: &str, role: Role) -> Option<&HandlerArtifact> {
        self.artifacts
            .iter()
            .find(|a| a.owner_name == owner_name && a.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, &HandlerArtifact)> {
        self.descriptors.iter().zip(&self.artifacts)
    }
}

#[derive(Default)]
struct HandlerNames {
    used_names: HashSet<String>,
}

impl HandlerNames {
    fn unique_name(&mut self, desc: &FieldDescriptor) -> String {
        let base = format!(
            "{}{}RoleHandler",
            to_pascal_case(&desc.owner_name),
            to_pascal_case(desc.role.name())
        );
        if self.used_names.insert(base.clone()) {
            return base;
        }

        let mut counter = 2;
        loop {
            let name = format!("{}{}", base, counter);
            if self.used_names.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }
}

/// Synthesize handlers for every root descriptor of `metamodel`.
///
/// All-or-nothing: the first failure aborts the batch and no handler of this
/// run is returned.
pub fn generate(metamodel: &Metamodel, config: &GeneratorConfig) -> Result<Generation> {
    let template = config.parse_handler_template()?;
    let roots = metamodel.introspect();

    let mut names = HandlerNames::default();
    let mut artifacts = Vec::with_capacity(roots.len());
    for desc in &roots {
        let artifact = synthesize(&template, desc, names.unique_name(desc))?;
        tracing::debug!(
            handler = %artifact.name(),
            owner = %desc.owner_name,
            role = %desc.role,
            kind = %desc.kind,
            mutable = artifact.is_mutable(),
            "synthesized handler"
        );
        artifacts.push(artifact);
    }

    let module_source = assemble_module(config, &artifacts);
    tracing::info!(
        handlers = artifacts.len(),
        types = metamodel.len(),
        "generated role handlers"
    );

    Ok(Generation {
        descriptors: roots.into_iter().cloned().collect(),
        artifacts,
        module_source,
    })
}

fn synthesize(
    template: &Template,
    desc: &FieldDescriptor,
    handler_name: String,
) -> Result<HandlerArtifact> {
    let params = HandlerParams::from_descriptor(desc, handler_name);
    let source = template.render(&params).map_err(|source| {
        tracing::warn!(
            handler = %params.handler_name,
            error = %source,
            "handler generation aborted"
        );
        GenerateError::GenerationAborted {
            handler: params.handler_name.clone(),
            source,
        }
    })?;

    Ok(HandlerArtifact {
        role: desc.role,
        kind: desc.kind,
        owner: desc.owner,
        owner_name: desc.owner_name.clone(),
        params,
        source,
    })
}

fn assemble_module(config: &GeneratorConfig, artifacts: &[HandlerArtifact]) -> String {
    let mut imports: BTreeSet<&str> = [
        "ContainerKind",
        "FieldValue",
        "HandlerDecl",
        "Role",
        "RoleHandler",
    ]
    .into_iter()
    .collect();
    for artifact in artifacts {
        imports.insert(artifact.kind.handler_family());
        if artifact.is_mutable() {
            imports.insert("AccessError");
        }
    }
    let imports: Vec<&str> = imports.into_iter().collect();

    let mut out = String::new();
    out.push_str(&format!("{}\n\n", config.header_str()));
    out.push_str(&format!(
        "use {}::{{{}}};\n",
        config.runtime_path_str(),
        imports.join(", ")
    ));

    for artifact in artifacts {
        out.push('\n');
        out.push_str(&artifact.source);
    }

    out.push_str("\n/// Every generated handler, ordered by role name then root type name.\n");
    if artifacts.is_empty() {
        out.push_str("pub static ROLE_HANDLERS: &[HandlerDecl] = &[];\n");
        return out;
    }
    out.push_str("pub static ROLE_HANDLERS: &[HandlerDecl] = &[\n");
    for artifact in artifacts {
        let p = &artifact.params;
        out.push_str(&format!(
            "    HandlerDecl::new({:?}, {:?}, Role::{}, ContainerKind::{:?}, {:?}, {}),\n",
            p.handler_name,
            artifact.owner_name,
            p.role,
            artifact.kind,
            p.value_type,
            artifact.is_mutable()
        ));
    }
    out.push_str("];\n");
    out
}
