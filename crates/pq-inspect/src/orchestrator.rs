//! The orchestrator (C9, spec §4.9): the single entry point that wires
//! every inspection component together, owning the shared caches each
//! component's own given/delta split reads from and writes into.
//!
//! Grounded in `tsz-lsp`'s request-handling entry points, which sit at the
//! same "top of the stack, wires binder+checker+scope_finder together
//! behind one call" position this crate occupies over `pq-scope`/`pq-types`.
//! Each result field fails independently (spec §6.3/§7: "an invariant
//! breach in one component does not corrupt the others") — a component
//! that throws only poisons its own slot; the shared caches are extended
//! only by components that actually succeeded.

use rustc_hash::FxHashMap;

use pq_common::{Atom, CancellationError, CommonSettings, CoreError, Interner, Position};
use pq_scope::{NodeScope, ScopeById};
use pq_syntax::{NodeIdMapCollection, ParseError};
use pq_types::{Type, TypeById};

use crate::active_node::{locate_active_node, ActiveNode};
use crate::autocomplete::{autocomplete, Autocomplete};
use crate::expected_type::expected_type;
use crate::invoke_expression::{locate_invoke_expression, InvokeExpression};

/// The persistent, caller-owned state an inspection call reads its `given`
/// caches from and folds its deltas back into on success (spec §3.7/§5:
/// "the orchestrator owns them and may pass them into a subsequent request
/// on the same document for reuse"). `interner` is kept alongside the two
/// caches rather than created fresh per call: the scope/type maps key on
/// `Atom`s it hands out, so reusing the same interner across calls on one
/// document is what makes cache reuse sound — a fresh interner would mint
/// different atoms for the same identifier text and silently desync the
/// caches from the names they're meant to key.
#[derive(Debug, Default)]
pub struct InspectionCaches {
    pub scope_by_id: ScopeById,
    pub type_by_id: TypeById,
    pub interner: Interner,
}

impl InspectionCaches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Every name in scope at the active node, mapped to its inferred type
/// (spec §6.3's `scope_type` field). `Name` is represented as the same
/// `Atom` the scope map itself keys on, so a caller already holding a
/// `NodeScope` can look a name up in both maps with the same key.
pub type ScopeTypeMap = FxHashMap<Atom, Type>;

/// Everything one inspection call produces (spec §6.3). Any parser error
/// the caller supplied is threaded through unexamined, alongside whatever
/// the core could still infer from the hybrid tree the parser produced up
/// to that error (spec §7).
#[derive(Debug, Clone)]
pub struct Inspection {
    pub active_node: Result<Option<ActiveNode>, CoreError>,
    pub autocomplete: Result<Autocomplete, CoreError>,
    pub invoke_expression: Result<Option<InvokeExpression>, CoreError>,
    pub node_scope: Result<Option<NodeScope>, CoreError>,
    pub scope_type: Result<Option<ScopeTypeMap>, CoreError>,
    pub expected_type: Result<Option<Type>, CoreError>,
    pub parse_error: Option<ParseError>,
}

/// C9. Dispatches to C3, then in order to C8, C4, C5, C6/C7, per spec
/// §4.9's data-flow order. If the active node is `Missing` (including when
/// the document has no leaves at all, or the locator itself throws), every
/// downstream field except `node_scope`/`scope_type` falls back to the
/// expression-position default spec §4.9 names; the scope-dependent fields
/// have nothing to resolve without an active node and stay `Ok(None)`.
pub fn inspect(settings: &CommonSettings, map: &NodeIdMapCollection, parse_error: Option<ParseError>, position: Position, caches: &mut InspectionCaches) -> Inspection {
    let _span = tracing::span!(tracing::Level::DEBUG, "inspect", line = position.line_number, column = position.line_code_unit).entered();

    if let Err(cancelled) = settings.check_cancellation() {
        tracing::debug!("inspection cancelled before any component ran");
        return cancelled_inspection(cancelled, parse_error);
    }

    let active_node = locate_active_node(position, map).map_err(CoreError::from);
    if let Err(err) = &active_node {
        tracing::debug!(error = %err, "active-node locator raised an invariant");
    }
    let active_ref: Option<&ActiveNode> = active_node.as_ref().ok().and_then(Option::as_ref);

    let invoke_expression = match active_ref {
        Some(active) => locate_invoke_expression(active, map).map_err(CoreError::from),
        None => Ok(None),
    };

    let (node_scope, scope_type) = match active_ref {
        Some(active) => resolve_scope_and_types(active, map, settings, caches),
        None => (Ok(None), Ok(None)),
    };

    // Expected-type/autocomplete both have a well-defined expression-
    // position default (spec §4.9), so they never propagate a `None`
    // active node as a missing result the way the scope fields do.
    let expected_type_result: Result<Option<Type>, CoreError> = Ok(Some(active_ref.and_then(expected_type).unwrap_or_else(Type::any)));
    let autocomplete_result: Result<Autocomplete, CoreError> = Ok(autocomplete(active_ref));

    Inspection {
        active_node,
        autocomplete: autocomplete_result,
        invoke_expression,
        node_scope,
        scope_type,
        expected_type: expected_type_result,
        parse_error,
    }
}

fn cancelled_inspection(err: CancellationError, parse_error: Option<ParseError>) -> Inspection {
    let err = CoreError::from(err);
    Inspection {
        active_node: Err(err.clone()),
        autocomplete: Err(err.clone()),
        invoke_expression: Err(err.clone()),
        node_scope: Err(err.clone()),
        scope_type: Err(err.clone()),
        expected_type: Err(err),
        parse_error,
    }
}

/// C4 then C5's `scope_type` half (spec §4.9's "C4 ... then C5"): resolves
/// the active node's lexical scope, folds its delta into the persistent
/// cache, then types every name in that scope via
/// `pq_types::inspect_scope_item_type`, folding each of *those* deltas in
/// turn. A failure in either phase is packed into that phase's own result
/// slot without touching the other (spec §6.3's per-field isolation).
fn resolve_scope_and_types(
    active: &ActiveNode,
    map: &NodeIdMapCollection,
    settings: &CommonSettings,
    caches: &mut InspectionCaches,
) -> (Result<Option<NodeScope>, CoreError>, Result<Option<ScopeTypeMap>, CoreError>) {
    let scope_result = pq_scope::resolve_ancestry_scope(&active.ancestry, map, &caches.scope_by_id, &mut caches.interner);

    let resolution = match scope_result {
        Ok(resolution) => resolution,
        Err(err) => {
            let err = CoreError::from(err);
            return (Err(err.clone()), Err(err));
        }
    };

    for (id, scope) in &resolution.delta {
        caches.scope_by_id.entry(*id).or_insert_with(|| scope.clone());
    }
    let node_scope = resolution.node_scope.clone();

    let scope_type = type_every_name_in_scope(&node_scope, map, settings, caches).map(Some);

    (Ok(Some(node_scope)), scope_type)
}

/// Polls cancellation between each in-scope name (spec §5: "long recursions
/// ... must poll it between nodes") rather than only once at `inspect`'s own
/// entry — a record literal with many fields can make this loop the longest-
/// running part of a call even though no single `inspect_scope_item_type`
/// call recurses deeply. Preserves the `CancellationError`/`InvariantError`
/// distinction (spec §7) instead of collapsing a mid-loop cancellation into
/// a generic invariant failure.
fn type_every_name_in_scope(
    node_scope: &NodeScope,
    map: &NodeIdMapCollection,
    settings: &CommonSettings,
    caches: &mut InspectionCaches,
) -> Result<ScopeTypeMap, CoreError> {
    let mut types = ScopeTypeMap::default();
    for (&name, item) in node_scope {
        settings.check_cancellation()?;
        let resolution = pq_types::inspect_scope_item_type(item, map, &caches.scope_by_id, &caches.type_by_id, &mut caches.interner)?;
        for (id, ty) in resolution.type_delta {
            caches.type_by_id.entry(id).or_insert(ty);
        }
        for (id, scope) in resolution.scope_delta {
            caches.scope_by_id.entry(id).or_insert(scope);
        }
        types.insert(name, resolution.node_type);
    }
    Ok(types)
}
