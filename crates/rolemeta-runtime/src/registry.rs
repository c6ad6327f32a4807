//! Handler registry: (node type, role) -> handler.
//!
//! Handlers are stored once per (root declaring type, role). Resolution uses
//! the metamodel's precomputed root pointer and falls back to walking the
//! supertypes (depth-first, declaration order) for tables that bind a role
//! below its root.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use rolemeta_core::{RawCatalog, Role};
use rolemeta_gen::{Generation, GeneratorConfig, Metamodel, NodeTypeId, generate};

use crate::error::{AccessError, RebuildError};
use crate::family::{HandlerDecl, OwnedHandlerDecl};
use crate::handler::Handler;

/// Immutable dispatch table for one catalog.
#[derive(Debug)]
pub struct Registry {
    metamodel: Metamodel,
    handlers: Vec<Handler>,
    by_root: HashMap<(NodeTypeId, Role), usize>,
}

impl Registry {
    /// Build from the artifacts of a generation run over `metamodel`.
    pub fn from_generation(
        metamodel: Metamodel,
        generation: &Generation,
    ) -> Result<Self, AccessError> {
        let decls = generation.artifacts.iter().map(OwnedHandlerDecl::from);
        Self::from_owned_decls(metamodel, decls)
    }

    /// Build from a generated `ROLE_HANDLERS` table.
    pub fn from_decls(metamodel: Metamodel, decls: &[HandlerDecl]) -> Result<Self, AccessError> {
        Self::from_owned_decls(metamodel, decls.iter().map(OwnedHandlerDecl::from))
    }

    fn from_owned_decls(
        metamodel: Metamodel,
        decls: impl IntoIterator<Item = OwnedHandlerDecl>,
    ) -> Result<Self, AccessError> {
        let mut handlers = Vec::new();
        let mut by_root = HashMap::new();
        for decl in decls {
            let target = metamodel
                .type_id(&decl.owner)
                .ok_or_else(|| AccessError::UnknownNodeType(decl.owner.clone()))?;
            // First binding wins, matching introspection dedup.
            if by_root.contains_key(&(target, decl.role)) {
                continue;
            }
            by_root.insert((target, decl.role), handlers.len());
            handlers.push(Handler::new(decl, target));
        }

        tracing::info!(
            handlers = handlers.len(),
            types = metamodel.len(),
            "built handler registry"
        );
        Ok(Self {
            metamodel,
            handlers,
            by_root,
        })
    }

    /// Validate `catalog`, generate handlers and build the registry.
    pub fn build(catalog: &RawCatalog, config: &GeneratorConfig) -> Result<Self, RebuildError> {
        let metamodel = Metamodel::build(catalog, config.container_shapes())?;
        let generation = generate(&metamodel, config)?;
        Ok(Self::from_generation(metamodel, &generation)?)
    }

    pub fn metamodel(&self) -> &Metamodel {
        &self.metamodel
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler applicable to `role` on nodes of `node_type`.
    pub fn resolve(&self, node_type: NodeTypeId, role: Role) -> Result<&Handler, AccessError> {
        if let Some(root) = self.metamodel.root_declaring_type(node_type, role)
            && let Some(&index) = self.by_root.get(&(root, role))
        {
            return Ok(&self.handlers[index]);
        }

        std::iter::once(node_type)
            .chain(self.metamodel.ancestors(node_type).iter().copied())
            .find_map(|ty| self.by_root.get(&(ty, role)))
            .map(|&index| &self.handlers[index])
            .ok_or_else(|| AccessError::HandlerNotFound {
                role,
                node_type: self.metamodel.type_name(node_type).to_string(),
            })
    }

    pub fn resolve_by_name(&self, type_name: &str, role: Role) -> Result<&Handler, AccessError> {
        let node_type = self
            .metamodel
            .type_id(type_name)
            .ok_or_else(|| AccessError::UnknownNodeType(type_name.to_string()))?;
        self.resolve(node_type, role)
    }
}

/// Process-wide slot holding the current registry.
///
/// Readers take a snapshot with [`SharedRegistry::load`]; a rebuild either
/// publishes a complete new registry or leaves the current one in place.
#[derive(Default)]
pub struct SharedRegistry {
    current: ArcSwapOption<Registry>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Option<Arc<Registry>> {
        self.current.load_full()
    }

    pub fn publish(&self, registry: Registry) -> Arc<Registry> {
        let registry = Arc::new(registry);
        self.current.store(Some(Arc::clone(&registry)));
        tracing::info!(handlers = registry.len(), "published handler registry");
        registry
    }

    /// Regenerate from `catalog` and publish the result.
    pub fn rebuild(
        &self,
        catalog: &RawCatalog,
        config: &GeneratorConfig,
    ) -> Result<Arc<Registry>, RebuildError> {
        match Registry::build(catalog, config) {
            Ok(registry) => Ok(self.publish(registry)),
            Err(err) => {
                tracing::warn!(error = %err, "registry rebuild failed, keeping current registry");
                Err(err)
            }
        }
    }
}
