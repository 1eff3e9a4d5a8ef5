//! The invoke-expression inspector (C8, spec §4.8): finds the innermost
//! enclosing call at the caret, its callee name, argument count, and the
//! ordinal of the argument the caret currently sits in.
//!
//! Grounded in `tsz-checker`'s call-site argument resolution (the same
//! "walk outward until the nearest call, then read off its `Csv` position"
//! shape `tsz-checker::class_type`'s overload resolution uses to figure out
//! which parameter a given argument expression corresponds to), adapted to
//! this core's hybrid-tree ancestry instead of a bound call-expression node.

use pq_common::InvariantError;
use pq_syntax::{AstKind, AstPayload, NodeId, NodeIdMapCollection, XorNode};

use crate::active_node::ActiveNode;

/// What C8 reports about the call the caret is currently inside (spec
/// §6.3's `invoke_expression` result field).
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeExpression {
    pub id: NodeId,
    /// The callee's identifier literal, `@`-prefixed if the reference was
    /// inclusive. `None` when the call's head isn't a plain identifier
    /// (e.g. `(a, b) => a + b)(1, 2)`).
    pub name: Option<String>,
    pub num_args: u32,
    pub arg_ordinal: u32,
}

/// C8. `None` means the caret is not inside any call's argument list.
pub fn locate_invoke_expression(active: &ActiveNode, map: &NodeIdMapCollection) -> Result<Option<InvokeExpression>, InvariantError> {
    let Some(invoke_pos) = active.ancestry.iter().position(|node| node.kind() == AstKind::InvokeExpression) else {
        return Ok(None);
    };
    let invoke = &active.ancestry[invoke_pos];

    let name = callee_name(invoke, map)?;
    let num_args = count_arguments(invoke.id(), map)?;
    let arg_ordinal = active.ancestry[..invoke_pos]
        .iter()
        .find(|node| node.kind() == AstKind::Csv)
        .and_then(XorNode::attribute_index)
        .unwrap_or(0);

    Ok(Some(InvokeExpression {
        id: invoke.id(),
        name,
        num_args,
        arg_ordinal,
    }))
}

/// The callee name, if the invoke is the 0-th element of a
/// `RecursivePrimaryExpression`'s tail and that expression's head is an
/// `IdentifierExpression` (spec §4.8).
fn callee_name(invoke: &XorNode, map: &NodeIdMapCollection) -> Result<Option<String>, InvariantError> {
    if invoke.attribute_index() != Some(0) {
        return Ok(None);
    }
    let Some(wrapper) = map.parent_of(invoke.id())? else { return Ok(None) };
    if wrapper.kind() != AstKind::ArrayWrapper {
        return Ok(None);
    }
    let Some(recursive_primary) = map.parent_of(wrapper.id())? else { return Ok(None) };
    if recursive_primary.kind() != AstKind::RecursivePrimaryExpression {
        return Ok(None);
    }
    let Some(head) = map.child_by_attribute_index(recursive_primary.id(), 0, Some(&[AstKind::IdentifierExpression]))? else {
        return Ok(None);
    };
    let Some(identifier) = map.child_by_attribute_index(head.id(), 1, Some(&[AstKind::Identifier]))? else {
        return Ok(None);
    };
    let Some(ast) = identifier.as_ast() else { return Ok(None) };
    match &ast.payload {
        AstPayload::Identifier { literal, is_inclusive } => {
            let name = if *is_inclusive { format!("@{literal}") } else { literal.clone() };
            Ok(Some(name))
        }
        _ => Ok(None),
    }
}

/// The number of `Csv`-wrapped elements in the invocation's argument
/// `ArrayWrapper` (spec §4.8's "argument count").
fn count_arguments(invoke_id: NodeId, map: &NodeIdMapCollection) -> Result<u32, InvariantError> {
    let Some(wrapper) = map.wrapped_content(invoke_id)? else { return Ok(0) };
    let mut count = 0u32;
    while map.child_by_attribute_index(wrapper.id(), count, Some(&[AstKind::Csv]))?.is_some() {
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
#[path = "../tests/invoke_expression_tests.rs"]
mod tests;
