//! The type inspector (C5, spec §4.5): a bottom-up, memoised recursive
//! evaluator over the hybrid tree.
//!
//! Structured the way `tsz-checker::type_computation`'s `CheckerState`
//! dispatches by AST kind through one big method, and the two-map
//! (`given`/`delta`) cache strategy mirrors both that module's lazy type
//! environment and `pq-scope::resolver`'s own `given_scope`/`delta` split —
//! a thrown [`InvariantError`] never touches the caller's persistent cache,
//! only the in-flight delta this call built.
//!
//! Identifier typing drives scope resolution on demand (`Ctx::scope_of`)
//! rather than requiring the caller to have already resolved scope for
//! every node this pass touches: a node anywhere in the tree may need its
//! own lexical scope to type an `Identifier` nested arbitrarily deep inside
//! it, not just the single active-node ancestry C4 resolves per call.

use rustc_hash::FxHashMap;

use pq_common::error::ErrorDetail;
use pq_common::{Atom, Interner, InvariantError};
use pq_scope::{DereferenceOutcome, ScopeById, ScopeItem};
use pq_syntax::{AstKind, AstPayload, ConstantKind, LiteralKind, NodeId, NodeIdMapCollection, OperatorKind, XorNode};

use crate::binop::{apply_binop, BinOp};
use crate::primitive::Primitive;
use crate::type_value::{FieldMap, FunctionParameterType, FunctionSignature, Type};
use crate::union::{field_map_of, is_concatenable_extended, union_types};

/// The persistent, caller-owned cache `Ctx::type_of` reads `given` from and
/// writes its delta into (spec §4.5: "every computed type is stored in the
/// delta map and merged into `type_by_id` on success").
pub type TypeById = FxHashMap<NodeId, Type>;

/// What [`inspect_type`] hands back: the queried node's type, plus every
/// node-to-type mapping computed along the way, plus any lexical scope
/// entries resolved on demand while dereferencing identifiers underneath it.
#[derive(Debug, Clone, Default)]
pub struct TypeResolution {
    pub node_type: Type,
    pub type_delta: TypeById,
    pub scope_delta: ScopeById,
    pub stats: TypeInspectionStats,
}

/// A snapshot of how much work one [`inspect_type`]/[`inspect_scope_item_type`]
/// call did against the caches, mirroring `tsz-binder::state::ResolutionStats`
/// (counts broken down by which tier satisfied the lookup). Useful for a host
/// to report inspection performance; it has no effect on the inspection
/// result itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeInspectionStats {
    /// Types resolved without recomputation, from this call's own delta.
    pub delta_hits: u64,
    /// Types resolved without recomputation, from the caller's persistent cache.
    pub given_hits: u64,
    /// Types that had to be computed from the hybrid tree.
    pub misses: u64,
}

impl TypeInspectionStats {
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.delta_hits + self.given_hits + self.misses
    }
}

const FUNCTION_PARAMETER_LIST_ATTR: u32 = 0;
const FUNCTION_BODY_ATTR: u32 = 3;
const FUNCTION_RETURN_TYPE_ATTR: u32 = 2;
const RECORD_FIELDS_ATTR: u32 = 1;
const PAIR_VALUE_ATTR: u32 = 2;
const SECTION_MEMBER_VALUE_ATTR: u32 = 3;

/// C5. Computes `id`'s type against the given caches, returning it together
/// with everything newly computed along the way. The caller merges
/// `type_delta`/`scope_delta` into its own persistent maps only on success,
/// exactly as C4's resolver does (spec §4.4/§4.5's shared two-map strategy).
pub fn inspect_type(
    id: NodeId,
    map: &NodeIdMapCollection,
    given_scope: &ScopeById,
    given_type: &TypeById,
    interner: &mut Interner,
) -> Result<TypeResolution, InvariantError> {
    let mut ctx = Ctx {
        map,
        given_scope,
        scope_delta: ScopeById::default(),
        given_type,
        type_delta: TypeById::default(),
        interner,
        depth: 0,
        stats: TypeInspectionStats::default(),
    };
    let node_type = ctx.type_of(id)?;
    Ok(TypeResolution {
        node_type,
        type_delta: ctx.type_delta,
        scope_delta: ctx.scope_delta,
        stats: ctx.stats,
    })
}

/// Computes a single [`ScopeItem`]'s type directly — spec §4.5.4's
/// "identifier dereferencing, type side" half, factored out so the
/// orchestrator (C9) can build the `scope_type` map for every name in a
/// [`pq_scope::NodeScope`] without round-tripping through an `Identifier`
/// node for each one.
pub fn inspect_scope_item_type(
    item: &ScopeItem,
    map: &NodeIdMapCollection,
    given_scope: &ScopeById,
    given_type: &TypeById,
    interner: &mut Interner,
) -> Result<TypeResolution, InvariantError> {
    let mut ctx = Ctx {
        map,
        given_scope,
        scope_delta: ScopeById::default(),
        given_type,
        type_delta: TypeById::default(),
        interner,
        depth: 0,
        stats: TypeInspectionStats::default(),
    };
    let node_type = ctx.type_of_scope_item(item)?;
    Ok(TypeResolution {
        node_type,
        type_delta: ctx.type_delta,
        scope_delta: ctx.scope_delta,
        stats: ctx.stats,
    })
}

struct Ctx<'a> {
    map: &'a NodeIdMapCollection,
    given_scope: &'a ScopeById,
    scope_delta: ScopeById,
    given_type: &'a TypeById,
    type_delta: TypeById,
    interner: &'a mut Interner,
    stats: TypeInspectionStats,
    depth: usize,
}

impl<'a> Ctx<'a> {
    fn type_of(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        if let Some(cached) = self.type_delta.get(&id) {
            tracing::trace!(node_id = id.raw(), "type cache hit (delta)");
            self.stats.delta_hits += 1;
            return Ok(cached.clone());
        }
        if let Some(cached) = self.given_type.get(&id) {
            tracing::trace!(node_id = id.raw(), "type cache hit (given)");
            self.stats.given_hits += 1;
            self.type_delta.insert(id, cached.clone());
            return Ok(cached.clone());
        }
        self.stats.misses += 1;
        self.depth += 1;
        if self.depth > pq_common::limits::MAX_TYPE_RECURSION_DEPTH {
            self.depth -= 1;
            return Err(InvariantError::recursion_limit_exceeded(pq_common::limits::MAX_TYPE_RECURSION_DEPTH));
        }
        let xor = self.map.get(id).ok_or_else(|| InvariantError::node_not_found(id.raw()));
        let result = xor.and_then(|xor| self.compute_type(&xor));
        self.depth -= 1;
        let computed = result?;
        self.type_delta.insert(id, computed.clone());
        Ok(computed)
    }

    /// Resolves the scope visible at `id`, computing it via `pq-scope` on a
    /// cache miss and folding the resolver's own delta into ours. Mirrors
    /// `type_of`'s given/delta check, but for the scope cache instead.
    fn scope_of(&mut self, id: NodeId) -> Result<pq_scope::NodeScope, InvariantError> {
        if let Some(cached) = self.scope_delta.get(&id) {
            return Ok(cached.clone());
        }
        if let Some(cached) = self.given_scope.get(&id) {
            self.scope_delta.insert(id, cached.clone());
            return Ok(cached.clone());
        }
        let ancestry = self.map.ancestry(id)?;
        let resolution = pq_scope::resolve_ancestry_scope(&ancestry, self.map, self.given_scope, self.interner)?;
        for (node_id, scope) in resolution.delta {
            self.scope_delta.entry(node_id).or_insert(scope);
        }
        Ok(resolution.node_scope)
    }

    fn child(&self, parent: NodeId, index: u32) -> Result<Option<XorNode>, InvariantError> {
        self.map.child_by_attribute_index(parent, index, None)
    }

    fn child_type(&mut self, parent: NodeId, index: u32) -> Result<Type, InvariantError> {
        match self.child(parent, index)? {
            Some(child) => self.type_of(child.id()),
            None => Ok(Type::Unknown),
        }
    }

    fn compute_type(&mut self, xor: &XorNode) -> Result<Type, InvariantError> {
        match xor {
            XorNode::Context(ctx) => match &ctx.promoted_ast {
                Some(promoted) => self.compute_ast_type(promoted),
                None => Ok(Type::Unknown),
            },
            XorNode::Ast(ast) => self.compute_ast_type(ast),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn compute_ast_type(&mut self, ast: &pq_syntax::AstNode) -> Result<Type, InvariantError> {
        let id = ast.id;

        if ast.kind.is_binary_like() {
            return self.binary_like_type(id);
        }

        match ast.kind {
            AstKind::AsExpression => self.child_type(id, 2),
            AstKind::SectionMember => self.child_type(id, SECTION_MEMBER_VALUE_ATTR),
            AstKind::AsType
            | AstKind::AsNullablePrimitiveType
            | AstKind::EachExpression
            | AstKind::FieldTypeSpecification
            | AstKind::OtherwiseExpression
            | AstKind::ParenthesizedExpression
            | AstKind::TypePrimaryType => self.child_type(id, 1),
            AstKind::Csv | AstKind::MetadataExpression => self.child_type(id, 0),
            AstKind::NullableType | AstKind::NullablePrimitiveType => {
                let inner = self.child_type(id, 1)?;
                Ok(make_nullable(inner))
            }
            AstKind::ListExpression | AstKind::ListLiteral => Ok(Type::DefinedList(self.list_elements(id)?)),
            AstKind::RecordExpression | AstKind::RecordLiteral => Ok(Type::DefinedRecord(self.record_fields(id, AstKind::GeneralizedIdentifierPairedExpression)?)),
            AstKind::IfExpression => self.if_expression_type(id),
            AstKind::ErrorHandlingExpression => self.error_handling_type(id),
            AstKind::ErrorRaisingExpression | AstKind::ItemAccessExpression => Ok(Type::any()),
            AstKind::IsExpression | AstKind::IsNullablePrimitiveType => Ok(Type::primitive(Primitive::Logical, false)),
            AstKind::NotImplementedExpression => Ok(Type::None),
            AstKind::LetExpression => self.child_type(id, 3),
            AstKind::Constant => match &ast.payload {
                AstPayload::Constant(kind) => Ok(self.constant_primitive(*kind)),
                _ => Ok(Type::Unknown),
            },
            AstKind::LiteralExpression => match &ast.payload {
                AstPayload::Literal(LiteralKind::Null) => Ok(Type::primitive(Primitive::Null, true)),
                AstPayload::Literal(LiteralKind::True | LiteralKind::False) => Ok(Type::primitive(Primitive::Logical, false)),
                AstPayload::Literal(LiteralKind::Number) => Ok(Type::primitive(Primitive::Number, false)),
                AstPayload::Literal(LiteralKind::Text) => Ok(Type::primitive(Primitive::Text, false)),
                _ => Ok(Type::Unknown),
            },
            AstKind::PrimitiveType => self.primitive_type_type(id),
            AstKind::RangeExpression => self.range_expression_type(id),
            AstKind::UnaryExpression => self.unary_expression_type(id),
            AstKind::RecursivePrimaryExpression => self.recursive_primary_type(id),
            AstKind::InvokeExpression => self.invoke_expression_type(id),
            AstKind::FieldSelector => self.field_selector_type(id),
            AstKind::FieldProjection => self.field_projection_type(id),
            AstKind::FieldSpecification => match self.child(id, 2)? {
                Some(spec) => self.type_of(spec.id()),
                None => Ok(Type::any()),
            },
            AstKind::FunctionExpression => self.function_expression_type(id),
            AstKind::FunctionType => self.function_type_type(id),
            AstKind::RecordType => Ok(Type::RecordType(self.field_specification_list_at(id, 1)?)),
            AstKind::TableType => self.table_type_type(id),
            AstKind::ListType => Ok(Type::ListType(Box::new(self.child_type(id, 1)?))),
            AstKind::Identifier | AstKind::IdentifierExpression => self.identifier_type(id, ast.kind),
            _ => Ok(Type::Unknown),
        }
    }

    fn binary_like_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let left = self.child_type(id, 0)?;
        let Some(op_node) = self.child(id, 1)? else {
            return Ok(Type::Unknown);
        };
        let op_kind = self.operator_kind(&op_node)?;
        let Some(bin_op) = BinOp::from_operator_kind(op_kind) else {
            return Err(InvariantError::new("a binary-like node's operator slot named a unary-only operator").with_detail(ErrorDetail::NodeId(op_node.id().raw())));
        };
        let right_type = match self.child(id, 2)? {
            Some(right) => Some(self.type_of(right.id())?),
            None => None,
        };
        // `&` on a record/table/list takes the structural union (spec
        // §4.5.2's "special case") instead of the primitive lookup table.
        // Routes here whenever *either* side is a structurally-known shape
        // (spec §4.5.3 rows 2/3: "exactly one extended" / "both extended");
        // two bare `record`/`table` primitives on both sides (row 1, "both
        // unextended") instead stay on the ordinary `BinOpLookup` path
        // below, which now carries that row directly.
        if matches!(bin_op, BinOp::Concatenate) && (is_concatenable_extended(&left) || right_type.as_ref().is_some_and(is_concatenable_extended)) {
            return Ok(match right_type.as_ref() {
                Some(right) => union_types(&left, right),
                None => Type::Unknown,
            });
        }
        Ok(apply_binop(bin_op, &left, right_type.as_ref()))
    }

    fn operator_kind(&self, xor: &XorNode) -> Result<OperatorKind, InvariantError> {
        let ast = xor.as_ast().ok_or_else(|| InvariantError::new("operator slot is not yet an AST node"))?;
        match &ast.payload {
            AstPayload::Operator(kind) => Ok(*kind),
            _ => Err(InvariantError::unexpected_kind("Operator payload", xor.id().raw())),
        }
    }

    /// `ConstantKind::Null` maps to the dedicated [`Type::None`] bottom
    /// instance (spec §4.5: "maps to the `None` instance per the source") —
    /// distinct from `LiteralExpression`'s `null` value literal, which types
    /// as nullable [`Primitive::Null`] instead (spec §3.6 lists `None` and
    /// `Null` as separate primitives; only the keyword *constant* collapses
    /// to the bottom type here).
    fn constant_primitive(&self, kind: ConstantKind) -> Type {
        if matches!(kind, ConstantKind::Null) {
            return Type::None;
        }
        let primitive = Primitive::from_constant_kind(kind);
        let nullable = matches!(kind, ConstantKind::Any);
        Type::primitive(primitive, nullable)
    }

    fn primitive_type_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let Some(constant) = self.child(id, 0)? else {
            return Ok(Type::Unknown);
        };
        let ast = constant.as_ast().ok_or_else(|| InvariantError::new("PrimitiveType's constant slot is not yet an AST node"))?;
        match &ast.payload {
            AstPayload::Constant(kind) => Ok(self.constant_primitive(*kind)),
            _ => Err(InvariantError::unexpected_kind("Constant payload", constant.id().raw())),
        }
    }

    fn range_expression_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let left = self.child_type(id, 0)?;
        let right = self.child_type(id, 2)?;
        if matches!(left, Type::None) || matches!(right, Type::None) {
            return Ok(Type::None);
        }
        if matches!(left, Type::Unknown) || matches!(right, Type::Unknown) {
            return Ok(Type::Unknown);
        }
        if is_nonnullable_number(&left) && is_nonnullable_number(&right) {
            return Ok(Type::primitive(Primitive::Number, false));
        }
        Ok(Type::None)
    }

    fn unary_expression_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let Some(op_node) = self.child(id, 0)? else {
            return Ok(Type::Unknown);
        };
        let op_kind = self.operator_kind(&op_node)?;
        let operand = self.child_type(id, 1)?;
        if matches!(operand, Type::Unknown) {
            return Ok(Type::Unknown);
        }
        let legal = match (&operand, op_kind) {
            (Type::Primitive(p), OperatorKind::UnaryPlus | OperatorKind::UnaryMinus) => p.primitive == Primitive::Number,
            (Type::Primitive(p), OperatorKind::Not) => p.primitive == Primitive::Logical,
            _ => false,
        };
        Ok(if legal { operand } else { Type::None })
    }

    fn recursive_primary_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let head_type = self.child_type(id, 0)?;
        if matches!(head_type, Type::None | Type::Unknown) {
            return Ok(head_type);
        }
        let Some(wrapper) = self.child(id, 1)? else {
            return Ok(head_type);
        };
        let mut running = head_type;
        let mut index = 0u32;
        while let Some(tail) = self.map.child_by_attribute_index(wrapper.id(), index, None)? {
            running = self.type_of(tail.id())?;
            index += 1;
        }
        Ok(running)
    }

    fn invoke_expression_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let callee = self.map.recursive_expression_previous_sibling(id)?;
        let callee_type = self.type_of(callee.id())?;
        Ok(match &callee_type {
            t if t.is_any() => Type::any(),
            Type::Unknown => Type::Unknown,
            Type::DefinedFunction(signature) => (*signature.return_type).clone(),
            Type::FunctionType(_) => Type::any(),
            Type::Primitive(p) if p.primitive == Primitive::Function => Type::any(),
            _ => Type::None,
        })
    }

    fn field_selector_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let sibling = self.map.recursive_expression_previous_sibling(id)?;
        let subject = self.type_of(sibling.id())?;
        let Some(content) = self.map.wrapped_content(id)? else {
            return Ok(Type::Unknown);
        };
        let field = self.identifier_atom(content.id())?;
        Ok(selector_type(&subject, field))
    }

    fn field_projection_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let sibling = self.map.recursive_expression_previous_sibling(id)?;
        let subject = self.type_of(sibling.id())?;
        let Some(wrapper) = self.map.wrapped_content(id)? else {
            return Ok(Type::Unknown);
        };
        let names = self.projection_names(wrapper.id())?;
        Ok(projection_type(&subject, &names))
    }

    fn projection_names(&mut self, wrapper_id: NodeId) -> Result<Vec<Atom>, InvariantError> {
        let mut names = Vec::new();
        let mut index = 0u32;
        while let Some(csv) = self.map.child_by_attribute_index(wrapper_id, index, Some(&[AstKind::Csv]))? {
            if let Some(name_node) = self.map.child_by_attribute_index(csv.id(), 0, None)? {
                names.push(self.identifier_atom(name_node.id())?);
            }
            index += 1;
        }
        Ok(names)
    }

    fn if_expression_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let condition = self.child_type(id, 1)?;
        if matches!(condition, Type::Unknown) {
            return Ok(Type::Unknown);
        }
        let valid = condition.is_any()
            || matches!(&condition, Type::Primitive(p) if p.primitive == Primitive::Logical)
            || matches!(&condition, Type::AnyUnion(members) if members.iter().all(|m| m.is_any() || matches!(m, Type::Primitive(p) if p.primitive == Primitive::Logical)));
        if !valid {
            return Ok(Type::None);
        }
        let true_branch = self.child_type(id, 3)?;
        let false_branch = self.child_type(id, 5)?;
        Ok(flatten_union(vec![true_branch, false_branch]))
    }

    fn error_handling_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let body = self.child_type(id, 1)?;
        let other = match self.child(id, 2)? {
            Some(otherwise) => self.type_of(otherwise.id())?,
            None => Type::primitive(Primitive::Record, false),
        };
        Ok(flatten_union(vec![body, other]))
    }

    fn list_elements(&mut self, list_id: NodeId) -> Result<Vec<Type>, InvariantError> {
        let mut elements = Vec::new();
        let Some(wrapper) = self.map.wrapped_content(list_id)? else {
            return Ok(elements);
        };
        let mut index = 0u32;
        while let Some(csv) = self.map.child_by_attribute_index(wrapper.id(), index, Some(&[AstKind::Csv]))? {
            if let Some(element) = self.map.child_by_attribute_index(csv.id(), 0, None)? {
                elements.push(self.type_of(element.id())?);
            }
            index += 1;
        }
        Ok(elements)
    }

    /// `RecordExpression`/`RecordLiteral`'s field list sits directly at
    /// [`RECORD_FIELDS_ATTR`] with no further `wrapped_content` hop (the
    /// same convention `pq_scope::resolver::enlarge_pair_container` reads
    /// from), unlike `FieldSpecificationList`, which is itself a
    /// bracket-wrapped node (see `field_specification_list_at`).
    fn record_fields(&mut self, record_id: NodeId, pair_kind: AstKind) -> Result<FieldMap, InvariantError> {
        let mut fields = FieldMap::new(false);
        let Some(list) = self.child(record_id, RECORD_FIELDS_ATTR)? else {
            return Ok(fields);
        };
        let mut index = 0u32;
        while let Some(csv) = self.map.child_by_attribute_index(list.id(), index, Some(&[AstKind::Csv]))? {
            if let Some(pair) = self.map.child_by_attribute_index(csv.id(), 0, Some(&[pair_kind]))?
                && let Some(key_node) = self.map.child_by_attribute_index(pair.id(), 0, None)?
            {
                let key = self.identifier_atom(key_node.id())?;
                let value_type = match self.map.child_by_attribute_index(pair.id(), PAIR_VALUE_ATTR, None)? {
                    Some(value) => self.type_of(value.id())?,
                    None => Type::Unknown,
                };
                fields.fields.insert(key, value_type);
            }
            index += 1;
        }
        Ok(fields)
    }

    fn field_specification_list_at(&mut self, parent_id: NodeId, attr: u32) -> Result<FieldMap, InvariantError> {
        match self.child(parent_id, attr)? {
            Some(list) => self.field_specification_list(list.id()),
            None => Ok(FieldMap::new(false)),
        }
    }

    fn field_specification_list(&mut self, list_id: NodeId) -> Result<FieldMap, InvariantError> {
        let mut fields = FieldMap::new(false);
        let Some(wrapper) = self.map.wrapped_content(list_id)? else {
            return Ok(fields);
        };
        let mut index = 0u32;
        while let Some(csv) = self.map.child_by_attribute_index(wrapper.id(), index, Some(&[AstKind::Csv]))? {
            if let Some(spec) = self.map.child_by_attribute_index(csv.id(), 0, Some(&[AstKind::FieldSpecification]))?
                && let Some(name_node) = self.map.child_by_attribute_index(spec.id(), 1, None)?
            {
                let name = self.identifier_atom(name_node.id())?;
                let field_type = self.type_of(spec.id())?;
                fields.fields.insert(name, field_type);
            }
            index += 1;
        }
        Ok(fields)
    }

    fn function_expression_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let parameters = match self.child(id, FUNCTION_PARAMETER_LIST_ATTR)? {
            Some(list) => self.function_parameters(list.id())?,
            None => Vec::new(),
        };
        let declared = match self.child(id, FUNCTION_RETURN_TYPE_ATTR)? {
            Some(node) => self.type_of(node.id())?,
            None => Type::any(),
        };
        let body = self.child_type(id, FUNCTION_BODY_ATTR)?;
        let return_type = reconcile_return_type(&declared, &body);
        Ok(Type::DefinedFunction(FunctionSignature {
            parameters,
            return_type: Box::new(return_type),
        }))
    }

    fn function_parameters(&mut self, param_list_wrapper_id: NodeId) -> Result<Vec<FunctionParameterType>, InvariantError> {
        let mut parameters = Vec::new();
        let mut index = 0u32;
        while let Some(csv) = self.map.child_by_attribute_index(param_list_wrapper_id, index, Some(&[AstKind::Csv]))? {
            if let Some(param) = self.map.child_by_attribute_index(csv.id(), 0, Some(&[AstKind::Parameter]))?
                && let Some(name_node) = self.map.child_by_attribute_index(param.id(), 1, Some(&[AstKind::Identifier]))?
            {
                let is_optional = self.map.child_by_attribute_index(param.id(), 0, None)?.is_some();
                let name = self.identifier_atom(name_node.id())?;
                let (is_nullable, parameter_type) = match self.map.child_by_attribute_index(param.id(), 2, None)? {
                    Some(as_node) => {
                        let parameter_type = self.type_of(as_node.id())?;
                        let nullable = matches!(&parameter_type, Type::Primitive(p) if p.is_nullable);
                        (nullable, parameter_type)
                    }
                    None => (false, Type::any()),
                };
                parameters.push(FunctionParameterType {
                    name,
                    parameter_type,
                    is_optional,
                    is_nullable,
                });
            }
            index += 1;
        }
        Ok(parameters)
    }

    fn function_type_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let parameters = match self.child(id, FUNCTION_PARAMETER_LIST_ATTR)? {
            Some(list) => self.function_parameters(list.id())?,
            None => Vec::new(),
        };
        let return_type = self.child_type(id, FUNCTION_RETURN_TYPE_ATTR)?;
        Ok(Type::FunctionType(FunctionSignature {
            parameters,
            return_type: Box::new(return_type),
        }))
    }

    fn table_type_type(&mut self, id: NodeId) -> Result<Type, InvariantError> {
        let Some(content) = self.child(id, 1)? else {
            return Ok(Type::TableType(FieldMap::new(false)));
        };
        if content.kind() == AstKind::FieldSpecificationList {
            return Ok(Type::TableType(self.field_specification_list(content.id())?));
        }
        let inner_type = self.type_of(content.id())?;
        let fields = field_map_of(&inner_type).cloned().unwrap_or_else(|| FieldMap::new(true));
        Ok(Type::PrimaryExpressionTable(fields))
    }

    fn identifier_type(&mut self, id: NodeId, kind: AstKind) -> Result<Type, InvariantError> {
        let (literal, is_inclusive) = self.identifier_literal_and_flag(id, kind)?;
        let scope = self.scope_of(id)?;
        let outcome = pq_scope::dereference_identifier(&literal, is_inclusive, &scope, self.map, self.interner)?;
        match outcome {
            DereferenceOutcome::Undefined => Ok(Type::Unknown),
            DereferenceOutcome::Cycle => Ok(Type::any()),
            DereferenceOutcome::Resolved(item) if item.recursive() => Ok(Type::any()),
            DereferenceOutcome::Resolved(item) => self.type_of_scope_item(&item),
        }
    }

    fn type_of_scope_item(&mut self, item: &ScopeItem) -> Result<Type, InvariantError> {
        match item {
            ScopeItem::Each { body, .. } => self.type_of(*body),
            ScopeItem::KeyValuePair { value, .. } | ScopeItem::SectionMember { value, .. } => match value {
                Some(value_id) => self.type_of(*value_id),
                None => Ok(Type::Unknown),
            },
            ScopeItem::Parameter { is_nullable, primitive, .. } => Ok(match primitive {
                Some(kind) => Type::primitive(Primitive::from_constant_kind(*kind), *is_nullable),
                None => Type::any(),
            }),
            ScopeItem::Undefined { .. } => Ok(Type::Unknown),
        }
    }

    fn identifier_literal_and_flag(&self, id: NodeId, kind: AstKind) -> Result<(String, bool), InvariantError> {
        let target_id = match kind {
            AstKind::Identifier => id,
            AstKind::IdentifierExpression => self
                .map
                .child_by_attribute_index(id, 1, Some(&[AstKind::Identifier]))?
                .ok_or_else(|| InvariantError::new("IdentifierExpression missing its Identifier child").with_detail(ErrorDetail::NodeId(id.raw())))?
                .id(),
            _ => return Err(InvariantError::unexpected_kind("Identifier or IdentifierExpression", id.raw())),
        };
        let xor = self.map.get(target_id).ok_or_else(|| InvariantError::node_not_found(target_id.raw()))?;
        let ast = xor.as_ast().ok_or_else(|| InvariantError::new("identifier slot is not yet an AST node"))?;
        match &ast.payload {
            AstPayload::Identifier { literal, is_inclusive } => Ok((literal.clone(), *is_inclusive)),
            _ => Err(InvariantError::unexpected_kind("Identifier payload", target_id.raw())),
        }
    }

    fn identifier_atom(&mut self, id: NodeId) -> Result<Atom, InvariantError> {
        let xor = self.map.get(id).ok_or_else(|| InvariantError::node_not_found(id.raw()))?;
        let ast = xor.as_ast().ok_or_else(|| InvariantError::new("identifier slot is not yet an AST node"))?;
        match &ast.payload {
            AstPayload::Identifier { literal, .. } => Ok(self.interner.intern(literal)),
            _ => Err(InvariantError::unexpected_kind("Identifier payload", id.raw())),
        }
    }
}

fn is_nonnullable_number(value: &Type) -> bool {
    matches!(value, Type::Primitive(p) if p.primitive == Primitive::Number && !p.is_nullable)
}

fn make_nullable(value: Type) -> Type {
    match value {
        Type::Primitive(p) => Type::primitive(p.primitive, true),
        other => other,
    }
}

/// Flattens one level of nested `AnyUnion`s and dedups members by
/// structural equality (spec §3.6/§8: "`AnyUnion.members` contains no
/// members with the same kind/extended-kind/nullable triple when
/// deduplicated" — full structural equality is a stronger condition that
/// implies this). Collapses to the single member, or `Unknown`, when the
/// result isn't a genuine multi-way union.
fn flatten_union(parts: Vec<Type>) -> Type {
    let mut members = Vec::new();
    for part in parts {
        match part {
            Type::AnyUnion(inner) => members.extend(inner),
            other => members.push(other),
        }
    }
    let mut deduped: Vec<Type> = Vec::new();
    for member in members {
        if !deduped.contains(&member) {
            deduped.push(member);
        }
    }
    match deduped.len() {
        0 => Type::Unknown,
        1 => deduped.swap_remove(0),
        _ => Type::AnyUnion(deduped),
    }
}

/// §4.5.1's selector column. `opt` (the `?` suffix) doesn't change the
/// outcome in this lattice: a missing field on a closed shape already
/// degrades to [`Type::None`], whose `is_subtype_of` rule makes it
/// assignable only into a nullable slot — exactly what `opt`'s "produce
/// `null` instead of failing" behaviour means here, so there is no second
/// bottom value to pick between.
fn selector_type(subject: &Type, field: Atom) -> Type {
    if subject.is_any() {
        return Type::any();
    }
    match subject {
        Type::Unknown => Type::Unknown,
        Type::Primitive(p) if p.primitive == Primitive::Record || p.primitive == Primitive::Table => Type::any(),
        Type::DefinedRecord(fields) | Type::DefinedTable(fields) | Type::RecordType(fields) | Type::TableType(fields) | Type::PrimaryExpressionTable(fields) => {
            match fields.fields.get(&field) {
                Some(field_type) => field_type.clone(),
                None if fields.is_open => Type::any(),
                None => Type::None,
            }
        }
        _ => Type::None,
    }
}

/// §4.5.1's projection column.
fn projection_type(subject: &Type, names: &[Atom]) -> Type {
    if subject.is_any() {
        let mut record = FieldMap::new(false);
        let mut table = FieldMap::new(false);
        for &name in names {
            record.fields.insert(name, Type::any());
            table.fields.insert(name, Type::any());
        }
        return Type::AnyUnion(vec![Type::DefinedRecord(record), Type::DefinedTable(table)]);
    }
    match subject {
        Type::Unknown => Type::Unknown,
        Type::Primitive(p) if p.primitive == Primitive::Record => open_projection(names, Type::DefinedRecord),
        Type::Primitive(p) if p.primitive == Primitive::Table => open_projection(names, Type::DefinedTable),
        Type::DefinedRecord(fields) => project_like(fields, names, Type::DefinedRecord),
        Type::DefinedTable(fields) => project_like(fields, names, Type::DefinedTable),
        Type::RecordType(fields) => project_like(fields, names, Type::RecordType),
        Type::TableType(fields) => project_like(fields, names, Type::TableType),
        Type::PrimaryExpressionTable(fields) => project_like(fields, names, Type::PrimaryExpressionTable),
        _ => Type::None,
    }
}

fn open_projection(names: &[Atom], make: impl Fn(FieldMap) -> Type) -> Type {
    let mut fields = FieldMap::new(false);
    for &name in names {
        fields.fields.insert(name, Type::any());
    }
    make(fields)
}

fn project_like(fields: &FieldMap, names: &[Atom], make: impl Fn(FieldMap) -> Type) -> Type {
    if !fields.is_open {
        for &name in names {
            if !fields.fields.contains_key(&name) {
                return Type::None;
            }
        }
    }
    let mut projected = FieldMap::new(false);
    for &name in names {
        let field_type = fields.fields.get(&name).cloned().unwrap_or(Type::Unknown);
        projected.fields.insert(name, field_type);
    }
    make(projected)
}

/// "Same kind" for the purposes of `FunctionExpression`'s declared-vs-body
/// reconciliation: two primitives agree only if they name the same
/// primitive; everything else agrees by variant alone.
fn same_kind(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Primitive(x), Type::Primitive(y)) => x.primitive == y.primitive,
        _ => std::mem::discriminant(a) == std::mem::discriminant(b),
    }
}

/// spec §4.5's `FunctionExpression` reconciliation rule, applied in the
/// order the prose lists it.
fn reconcile_return_type(declared: &Type, body: &Type) -> Type {
    if declared.is_any() {
        return body.clone();
    }
    if let Type::AnyUnion(members) = body {
        if members.iter().all(|member| member.is_any() || same_kind(member, declared)) {
            return body.clone();
        }
    }
    if !same_kind(declared, body) && !matches!(body, Type::Unknown) {
        return Type::None;
    }
    if matches!(body, Type::Unknown) {
        return declared.clone();
    }
    body.clone()
}

#[cfg(test)]
#[path = "../tests/inspector_tests.rs"]
mod tests;
