//! C4: the scope resolver (spec §4.4).
//!
//! Walks an ancestry root-to-leaf, enlarging the running [`NodeScope`] at
//! each construct that introduces bindings, and writes every node it visits
//! into a `delta` map the caller merges into its own [`ScopeById`] only on
//! success — a node the walk never reaches never enters `delta`, so a
//! thrown [`InvariantError`] midway leaves the caller's cache untouched.
//!
//! Attribute-index layout for the multi-child constructs below (e.g. "the
//! `let` body sits at attribute 3") follows the grammar's own shape and is
//! not restated per call site; see the constants just below `enlarge_scope`.

use crate::scope_item::{NodeScope, ScopeById, ScopeItem};
use pq_common::{Interner, InvariantError};
use pq_syntax::{AstKind, AstPayload, ConstantKind, NodeId, NodeIdMapCollection, XorNode};

const EACH_BODY_ATTR: u32 = 1;
const FUNCTION_PARAMETER_LIST_ATTR: u32 = 0;
const FUNCTION_BODY_ATTR: u32 = 3;
const LET_BINDINGS_ATTR: u32 = 1;
const LET_BODY_ATTR: u32 = 3;
const RECORD_FIELDS_ATTR: u32 = 1;
const SECTION_MEMBERS_ATTR: u32 = 3;
const PAIR_VALUE_ATTR: u32 = 2;
const SECTION_MEMBER_KEY_ATTR: u32 = 1;
const SECTION_MEMBER_VALUE_ATTR: u32 = 3;

/// What [`resolve_ancestry_scope`] hands back: the scope visible at the
/// ancestry's own leaf, plus every node-to-scope mapping it computed along
/// the way (spec §4.4's `delta_scope`).
#[derive(Debug, Clone, Default)]
pub struct ScopeResolution {
    pub node_scope: NodeScope,
    pub delta: ScopeById,
}

/// C4. `ancestry` must be ordered leaf-to-root (as [`NodeIdMapCollection::ancestry`] returns it).
pub fn resolve_ancestry_scope(
    ancestry: &[XorNode],
    map: &NodeIdMapCollection,
    given: &ScopeById,
    interner: &mut Interner,
) -> Result<ScopeResolution, InvariantError> {
    let _span = tracing::span!(tracing::Level::DEBUG, "resolve_ancestry_scope", ancestry_len = ancestry.len()).entered();
    if ancestry.is_empty() {
        return Ok(ScopeResolution::default());
    }
    let mut delta = ScopeById::default();
    let mut current_scope = NodeScope::default();
    for idx in (0..ancestry.len()).rev() {
        let node = &ancestry[idx];
        let id = node.id();
        let entering_scope = if let Some(cached) = delta.get(&id) {
            tracing::trace!(node_id = id.raw(), "scope cache hit (delta)");
            cached.clone()
        } else if let Some(cached) = given.get(&id) {
            tracing::trace!(node_id = id.raw(), "scope cache hit (given)");
            cached.clone()
        } else {
            current_scope.clone()
        };
        delta.insert(id, entering_scope.clone());
        current_scope = entering_scope;
        if idx == 0 {
            break;
        }
        let child = &ancestry[idx - 1];
        current_scope = enlarge_scope(node, child, idx, ancestry, &current_scope, map, interner)?;
    }
    let node_scope = delta.get(&ancestry[0].id()).cloned().unwrap_or_default();
    Ok(ScopeResolution { node_scope, delta })
}

fn enlarge_scope(
    node: &XorNode,
    child: &XorNode,
    idx: usize,
    ancestry: &[XorNode],
    scope: &NodeScope,
    map: &NodeIdMapCollection,
    interner: &mut Interner,
) -> Result<NodeScope, InvariantError> {
    let child_attr = child.attribute_index();
    match node.kind() {
        AstKind::EachExpression if child_attr == Some(EACH_BODY_ATTR) => {
            let mut scope = scope.clone();
            scope.insert(interner.intern("_"), ScopeItem::Each { id: node.id(), body: child.id() });
            Ok(scope)
        }
        AstKind::FunctionExpression if child_attr == Some(FUNCTION_BODY_ATTR) => {
            let mut scope = scope.clone();
            if let Some(params) = map.child_by_attribute_index(node.id(), FUNCTION_PARAMETER_LIST_ATTR, None)? {
                for param in gather_parameters(map, params.id())? {
                    scope.insert(
                        interner.intern(&param.name),
                        ScopeItem::Parameter {
                            id: param.id,
                            is_optional: param.is_optional,
                            is_nullable: param.is_nullable,
                            primitive: param.primitive,
                        },
                    );
                }
            }
            Ok(scope)
        }
        AstKind::LetExpression if child_attr == Some(LET_BODY_ATTR) => {
            let mut scope = scope.clone();
            if let Some(list) = map.child_by_attribute_index(node.id(), LET_BINDINGS_ATTR, None)? {
                for binding in gather_pairs(map, list.id(), AstKind::IdentifierPairedExpression)? {
                    scope.insert(
                        interner.intern(&binding.key),
                        ScopeItem::KeyValuePair { id: binding.pair_id, recursive: false, value: binding.value },
                    );
                }
            }
            Ok(scope)
        }
        AstKind::LetExpression if child_attr == Some(LET_BINDINGS_ATTR) => {
            enlarge_pair_container(node, idx, ancestry, scope, map, interner, LET_BINDINGS_ATTR, AstKind::IdentifierPairedExpression)
        }
        AstKind::RecordExpression | AstKind::RecordLiteral if child_attr == Some(RECORD_FIELDS_ATTR) => {
            enlarge_pair_container(node, idx, ancestry, scope, map, interner, RECORD_FIELDS_ATTR, AstKind::GeneralizedIdentifierPairedExpression)
        }
        AstKind::Section if child_attr == Some(SECTION_MEMBERS_ATTR) => enlarge_section(node, idx, ancestry, scope, map, interner),
        _ => Ok(scope.clone()),
    }
}

struct PairBinding {
    pair_id: NodeId,
    key: String,
    value: Option<NodeId>,
}

fn enlarge_pair_container(
    node: &XorNode,
    idx: usize,
    ancestry: &[XorNode],
    scope: &NodeScope,
    map: &NodeIdMapCollection,
    interner: &mut Interner,
    list_attr: u32,
    pair_kind: AstKind,
) -> Result<NodeScope, InvariantError> {
    let mut scope = scope.clone();
    let Some(list) = map.child_by_attribute_index(node.id(), list_attr, None)? else {
        return Ok(scope);
    };
    let bindings = gather_pairs(map, list.id(), pair_kind)?;
    let active = bindings.iter().find(|b| ancestry[..idx].iter().any(|n| n.id() == b.pair_id)).map(|b| b.pair_id);
    for binding in &bindings {
        scope.insert(
            interner.intern(&binding.key),
            ScopeItem::KeyValuePair { id: binding.pair_id, recursive: active == Some(binding.pair_id), value: binding.value },
        );
    }
    Ok(scope)
}

fn enlarge_section(
    node: &XorNode,
    idx: usize,
    ancestry: &[XorNode],
    scope: &NodeScope,
    map: &NodeIdMapCollection,
    interner: &mut Interner,
) -> Result<NodeScope, InvariantError> {
    let mut scope = scope.clone();
    let Some(list) = map.child_by_attribute_index(node.id(), SECTION_MEMBERS_ATTR, None)? else {
        return Ok(scope);
    };
    let members = gather_section_members(map, list.id())?;
    let active = members.iter().find(|m| ancestry[..idx].iter().any(|n| n.id() == m.pair_id)).map(|m| m.pair_id);
    for member in &members {
        scope.insert(
            interner.intern(&member.key),
            ScopeItem::SectionMember { id: member.pair_id, recursive: active == Some(member.pair_id), value: member.value },
        );
    }
    Ok(scope)
}

/// Walks an `ArrayWrapper<Csv<pair_kind>>`'s consecutively attribute-indexed
/// `Csv` children, unwrapping each to its element and then to its key/value.
fn gather_pairs(map: &NodeIdMapCollection, list_wrapper_id: NodeId, pair_kind: AstKind) -> Result<Vec<PairBinding>, InvariantError> {
    let mut bindings = Vec::new();
    let mut index = 0u32;
    while let Some(csv) = map.child_by_attribute_index(list_wrapper_id, index, Some(&[AstKind::Csv]))? {
        if let Some(pair) = map.child_by_attribute_index(csv.id(), 0, Some(&[pair_kind]))?
            && let Some(key_node) = map.child_by_attribute_index(pair.id(), 0, None)?
        {
            let key = identifier_literal(map, key_node.id())?;
            let value = map.child_by_attribute_index(pair.id(), PAIR_VALUE_ATTR, None)?.map(|v| v.id());
            bindings.push(PairBinding { pair_id: pair.id(), key, value });
        }
        index += 1;
    }
    Ok(bindings)
}

fn gather_section_members(map: &NodeIdMapCollection, wrapper_id: NodeId) -> Result<Vec<PairBinding>, InvariantError> {
    let mut bindings = Vec::new();
    let mut index = 0u32;
    while let Some(member) = map.child_by_attribute_index(wrapper_id, index, Some(&[AstKind::SectionMember]))? {
        if let Some(key_node) = map.child_by_attribute_index(member.id(), SECTION_MEMBER_KEY_ATTR, None)? {
            let key = identifier_literal(map, key_node.id())?;
            let value = map.child_by_attribute_index(member.id(), SECTION_MEMBER_VALUE_ATTR, None)?.map(|v| v.id());
            bindings.push(PairBinding { pair_id: member.id(), key, value });
        }
        index += 1;
    }
    Ok(bindings)
}

struct ParamInfo {
    id: NodeId,
    name: String,
    is_optional: bool,
    is_nullable: bool,
    primitive: Option<ConstantKind>,
}

fn gather_parameters(map: &NodeIdMapCollection, param_list_wrapper_id: NodeId) -> Result<Vec<ParamInfo>, InvariantError> {
    let mut params = Vec::new();
    let mut index = 0u32;
    while let Some(csv) = map.child_by_attribute_index(param_list_wrapper_id, index, Some(&[AstKind::Csv]))? {
        if let Some(param) = map.child_by_attribute_index(csv.id(), 0, Some(&[AstKind::Parameter]))?
            && let Some(name_node) = map.child_by_attribute_index(param.id(), 1, Some(&[AstKind::Identifier]))?
        {
            let is_optional = map.child_by_attribute_index(param.id(), 0, None)?.is_some();
            let name = identifier_literal(map, name_node.id())?;
            let (is_nullable, primitive) = match map.child_by_attribute_index(param.id(), 2, None)? {
                Some(as_node) => extract_nullable_primitive(map, as_node.id())?,
                None => (false, None),
            };
            params.push(ParamInfo { id: param.id(), name, is_optional, is_nullable, primitive });
        }
        index += 1;
    }
    Ok(params)
}

fn extract_nullable_primitive(map: &NodeIdMapCollection, as_node_id: NodeId) -> Result<(bool, Option<ConstantKind>), InvariantError> {
    let Some(type_node) = map.child_by_attribute_index(as_node_id, 1, None)? else {
        return Ok((false, None));
    };
    match type_node.kind() {
        AstKind::NullablePrimitiveType | AstKind::NullableType => {
            let inner = map.child_by_attribute_index(type_node.id(), 1, Some(&[AstKind::PrimitiveType]))?;
            let primitive = match inner {
                Some(p) => extract_primitive_constant(map, p.id())?,
                None => None,
            };
            Ok((true, primitive))
        }
        AstKind::PrimitiveType => Ok((false, extract_primitive_constant(map, type_node.id())?)),
        _ => Ok((false, None)),
    }
}

fn extract_primitive_constant(map: &NodeIdMapCollection, primitive_type_id: NodeId) -> Result<Option<ConstantKind>, InvariantError> {
    let Some(constant) = map.child_by_attribute_index(primitive_type_id, 0, Some(&[AstKind::Constant]))? else {
        return Ok(None);
    };
    let xor = map.get(constant.id()).ok_or_else(|| InvariantError::node_not_found(constant.id().raw()))?;
    let ast = xor.as_ast().ok_or_else(|| InvariantError::new("primitive type constant must be an AST node"))?;
    match &ast.payload {
        AstPayload::Constant(kind) => Ok(Some(*kind)),
        _ => Ok(None),
    }
}

fn identifier_literal(map: &NodeIdMapCollection, id: NodeId) -> Result<String, InvariantError> {
    let xor = map.get(id).ok_or_else(|| InvariantError::node_not_found(id.raw()))?;
    let ast = xor.as_ast().ok_or_else(|| InvariantError::new("identifier slot is not yet an AST node"))?;
    match &ast.payload {
        AstPayload::Identifier { literal, .. } => Ok(literal.clone()),
        _ => Err(InvariantError::unexpected_kind("Identifier payload", id.raw())),
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
