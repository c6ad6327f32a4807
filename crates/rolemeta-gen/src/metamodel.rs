//! Metamodel introspection.
//!
//! Validates a catalog and flattens its inheritance lattice into explicit
//! tables:
//! - one [`FieldDescriptor`] per declared (type, role) field
//! - per type, the roles it has (declared or inherited) with a precomputed
//!   pointer to each role's *root declaring type*
//!
//! The root declaring type of a role, seen from type `T`, is the most general
//! type in `T`'s lineage that declares the role. Types that merely inherit a
//! role share their ancestor's descriptor and therefore its handler.

use std::collections::HashMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rolemeta_core::{RawCatalog, Role, TypeRef};

use crate::classify::{ContainerKind, ContainerShapes, classify};
use crate::error::GenerateError;

/// Index of a node type, assigned in catalog order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeTypeId(u32);

impl NodeTypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Field of one node type tagged with a role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub role: Role,
    pub kind: ContainerKind,
    /// Type as declared in the catalog (may mention type variables).
    pub declared_type: TypeRef,
    /// Normalized type for the handler family (see [`crate::classify`]).
    pub value_type: TypeRef,
    pub owner: NodeTypeId,
    pub owner_name: String,
    pub getter: String,
    pub setter: Option<String>,
    /// Most general type in the owner's lineage declaring `role`.
    pub root: NodeTypeId,
}

impl FieldDescriptor {
    pub fn is_mutable(&self) -> bool {
        self.setter.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct NodeTypeInfo {
    pub name: String,
    /// Direct supertypes in declaration order.
    pub supertypes: Vec<NodeTypeId>,
    pub type_params: Vec<String>,
    /// Declared fields: role -> index into the descriptor table.
    declared: IndexMap<Role, usize>,
    /// All roles of the type (declared first, then inherited in depth-first
    /// declaration order) with their root declaring type.
    roles: IndexMap<Role, NodeTypeId>,
    /// Proper ancestors, depth-first in declaration order, without repeats.
    ancestors: Vec<NodeTypeId>,
}

impl NodeTypeInfo {
    pub fn declares(&self, role: Role) -> bool {
        self.declared.contains_key(&role)
    }
}

/// Flattened, validated view of a catalog.
#[derive(Clone, Debug)]
pub struct Metamodel {
    types: Vec<NodeTypeInfo>,
    by_name: HashMap<String, NodeTypeId>,
    descriptors: Vec<FieldDescriptor>,
}

impl Metamodel {
    /// Validate `catalog` and build the metamodel.
    ///
    /// Fails on duplicate or unknown type names, inheritance cycles, a role
    /// declared twice by one type, malformed field types and illegal
    /// container shapes.
    pub fn build(catalog: &RawCatalog, shapes: &ContainerShapes) -> Result<Self, GenerateError> {
        let mut by_name = HashMap::with_capacity(catalog.types.len());
        for (i, raw) in catalog.types.iter().enumerate() {
            if by_name
                .insert(raw.name.clone(), NodeTypeId(i as u32))
                .is_some()
            {
                return Err(GenerateError::DuplicateNodeType(raw.name.clone()));
            }
        }

        let mut types = Vec::with_capacity(catalog.types.len());
        for raw in &catalog.types {
            let mut supertypes = Vec::with_capacity(raw.supertypes.len());
            for sup in &raw.supertypes {
                let id = by_name
                    .get(sup)
                    .copied()
                    .ok_or_else(|| GenerateError::UnknownSupertype {
                        ty: raw.name.clone(),
                        supertype: sup.clone(),
                    })?;
                supertypes.push(id);
            }
            types.push(NodeTypeInfo {
                name: raw.name.clone(),
                supertypes,
                type_params: raw.type_params.clone(),
                declared: IndexMap::new(),
                roles: IndexMap::new(),
                ancestors: Vec::new(),
            });
        }

        check_acyclic(&types)?;
        for i in 0..types.len() {
            types[i].ancestors = collect_ancestors(&types, NodeTypeId(i as u32));
        }

        let mut descriptors = Vec::new();
        for (i, raw) in catalog.types.iter().enumerate() {
            let owner = NodeTypeId(i as u32);
            for field in &raw.fields {
                let declared = field.parse_type(&raw.type_params).map_err(|source| {
                    GenerateError::TypeSyntax {
                        ty: raw.name.clone(),
                        role: field.role,
                        source,
                    }
                })?;
                let class = classify(shapes, &declared).map_err(|source| {
                    GenerateError::IllegalContainerKind {
                        ty: raw.name.clone(),
                        role: field.role,
                        source,
                    }
                })?;

                let info = &mut types[i];
                if info.declared.contains_key(&field.role) {
                    return Err(GenerateError::DuplicateRole {
                        ty: raw.name.clone(),
                        role: field.role,
                    });
                }
                info.declared.insert(field.role, descriptors.len());
                descriptors.push(FieldDescriptor {
                    role: field.role,
                    kind: class.kind,
                    declared_type: class.declared,
                    value_type: class.value_type,
                    owner,
                    owner_name: raw.name.clone(),
                    getter: field.getter.clone(),
                    setter: field.setter.clone(),
                    // Patched below once every type's declarations are known.
                    root: owner,
                });
            }
        }

        for i in 0..types.len() {
            let roles = resolve_roles(&types, NodeTypeId(i as u32));
            types[i].roles = roles;
        }
        for desc in &mut descriptors {
            desc.root = types[desc.owner.index()].roles[&desc.role];
        }

        Ok(Self {
            types,
            by_name,
            descriptors,
        })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_id(&self, name: &str) -> Option<NodeTypeId> {
        self.by_name.get(name).copied()
    }

    /// # Panics
    /// Panics if `id` was not created by this metamodel.
    pub fn node_type(&self, id: NodeTypeId) -> &NodeTypeInfo {
        &self.types[id.index()]
    }

    pub fn type_name(&self, id: NodeTypeId) -> &str {
        &self.node_type(id).name
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeTypeId, &NodeTypeInfo)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, info)| (NodeTypeId(i as u32), info))
    }

    pub fn supertypes(&self, id: NodeTypeId) -> &[NodeTypeId] {
        &self.node_type(id).supertypes
    }

    /// Proper ancestors of `id`, depth-first in declaration order.
    pub fn ancestors(&self, id: NodeTypeId) -> &[NodeTypeId] {
        &self.node_type(id).ancestors
    }

    /// Whether `sub` is `sup` or inherits from it.
    pub fn is_subtype(&self, sub: NodeTypeId, sup: NodeTypeId) -> bool {
        sub == sup || self.ancestors(sub).contains(&sup)
    }

    /// Roles of `id`, declared ones first, then inherited ones.
    pub fn roles_of(&self, id: NodeTypeId) -> impl Iterator<Item = Role> + '_ {
        self.node_type(id).roles.keys().copied()
    }

    pub fn has_role(&self, id: NodeTypeId, role: Role) -> bool {
        self.node_type(id).roles.contains_key(&role)
    }

    pub fn root_declaring_type(&self, id: NodeTypeId, role: Role) -> Option<NodeTypeId> {
        self.node_type(id).roles.get(&role).copied()
    }

    /// Descriptor of the field `owner` declares for `role`, if it declares one.
    pub fn descriptor(&self, owner: NodeTypeId, role: Role) -> Option<&FieldDescriptor> {
        self.node_type(owner)
            .declared
            .get(&role)
            .map(|&i| &self.descriptors[i])
    }

    /// Every declared field, in catalog order.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Root descriptors: one per (role, root declaring type), first
    /// occurrence wins, sorted by role name then root type name.
    ///
    /// The order is total, so an unchanged catalog always yields the same
    /// sequence.
    pub fn introspect(&self) -> Vec<&FieldDescriptor> {
        let mut seen: IndexSet<(NodeTypeId, Role)> = IndexSet::new();
        for info in &self.types {
            for (&role, &root) in &info.roles {
                seen.insert((root, role));
            }
        }

        let mut roots: Vec<&FieldDescriptor> = seen
            .into_iter()
            .filter_map(|(root, role)| self.descriptor(root, role))
            .collect();
        roots.sort_by(|a, b| {
            a.role
                .name()
                .cmp(b.role.name())
                .then_with(|| a.owner_name.cmp(&b.owner_name))
        });

        tracing::debug!(
            types = self.types.len(),
            fields = self.descriptors.len(),
            roots = roots.len(),
            "introspected catalog"
        );
        roots
    }
}

fn check_acyclic(types: &[NodeTypeInfo]) -> Result<(), GenerateError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    fn visit(
        types: &[NodeTypeInfo],
        marks: &mut [Mark],
        id: NodeTypeId,
    ) -> Result<(), GenerateError> {
        match marks[id.index()] {
            Mark::Done => return Ok(()),
            Mark::Active => {
                return Err(GenerateError::InheritanceCycle(
                    types[id.index()].name.clone(),
                ));
            }
            Mark::New => {}
        }
        marks[id.index()] = Mark::Active;
        for &sup in &types[id.index()].supertypes {
            visit(types, marks, sup)?;
        }
        marks[id.index()] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::New; types.len()];
    for i in 0..types.len() {
        visit(types, &mut marks, NodeTypeId(i as u32))?;
    }
    Ok(())
}

fn collect_ancestors(types: &[NodeTypeInfo], id: NodeTypeId) -> Vec<NodeTypeId> {
    fn walk(types: &[NodeTypeInfo], id: NodeTypeId, out: &mut IndexSet<NodeTypeId>) {
        for &sup in &types[id.index()].supertypes {
            if out.insert(sup) {
                walk(types, sup, out);
            }
        }
    }

    let mut out = IndexSet::new();
    walk(types, id, &mut out);
    out.into_iter().collect()
}

/// Role table of `id`: every role in its lineage mapped to the root
/// declaring type.
///
/// The root is the first declaring type (self, then ancestors depth-first)
/// none of whose own ancestors declare the role. In a diamond where two
/// unrelated branches both introduce a role, the branch listed first wins.
fn resolve_roles(types: &[NodeTypeInfo], id: NodeTypeId) -> IndexMap<Role, NodeTypeId> {
    let lineage: Vec<NodeTypeId> = std::iter::once(id)
        .chain(types[id.index()].ancestors.iter().copied())
        .collect();

    let mut roles = IndexMap::new();
    for &ty in &lineage {
        for &role in types[ty.index()].declared.keys() {
            if roles.contains_key(&role) {
                continue;
            }
            let root = lineage
                .iter()
                .copied()
                .filter(|&t| types[t.index()].declares(role))
                .find(|&t| {
                    !types[t.index()]
                        .ancestors
                        .iter()
                        .any(|&a| types[a.index()].declares(role))
                })
                .unwrap_or(ty);
            roles.insert(role, root);
        }
    }
    roles
}
