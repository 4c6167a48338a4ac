//! Nested-change recursion (§4.5).
//!
//! After a matched pair is classified at its own level, the walker recurses
//! into `children` (members, parameters, type parameters) to surface
//! additions, removals and nested modifications - bounded by
//! `max_nesting_depth` and carrying an explicit ancestor chain for
//! `ApiChange.context.ancestors`.

use crate::checker::TypeChecker;
use crate::classifier::{classify_pair, target_for_kind};
use crate::matcher::match_children;
use crate::model::{
    AnalyzableNode, Action, ApiChange, ChangeContext, ChangeDescriptor, ChangeTag, Impact,
};

/// Options governing how deep and how aggressively the walker recurses.
#[derive(Clone, Debug)]
pub struct WalkOptions {
    pub include_nested_changes: bool,
    pub max_nesting_depth: usize,
    pub detect_parameter_reordering: bool,
    pub resolve_type_relationships: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            include_nested_changes: true,
            max_nesting_depth: 10,
            detect_parameter_reordering: true,
            resolve_type_relationships: true,
        }
    }
}

/// Build the full `ApiChange` for one matched top-level pair, including its
/// nested-change subtree.
pub fn build_change(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    checker: &dyn TypeChecker,
    options: &WalkOptions,
) -> ApiChange {
    build_change_at(old, new, checker, options, 0, &mut Vec::new())
}

fn build_change_at(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    checker: &dyn TypeChecker,
    options: &WalkOptions,
    depth: usize,
    ancestors: &mut Vec<String>,
) -> ApiChange {
    let classification = classify_pair(
        old,
        new,
        checker,
        options.detect_parameter_reordering,
        options.resolve_type_relationships,
    );

    let mut nested_changes = Vec::new();
    // Children are only comparable when both sides use the same
    // declaration's member representation (e.g. an `interface`'s
    // `Property` children); a type-like pair matched across kinds (§9
    // interface/type-alias equivalence) has already had its member shape
    // compared structurally in `classify_type_signature`, so walking
    // children here would just report a spurious remove/add for every
    // member.
    if options.include_nested_changes && depth < options.max_nesting_depth && old.kind == new.kind {
        ancestors.push(old.path.clone());
        nested_changes = walk_children(old, new, checker, options, depth + 1, ancestors);
        ancestors.pop();
    }

    let mut descriptor = classification.descriptor;
    if !nested_changes.is_empty() {
        descriptor = descriptor.tagged(ChangeTag::HasNestedChanges);
    }
    if depth > 0 {
        descriptor = descriptor.tagged(ChangeTag::IsNestedChange);
    }

    let context = ChangeContext {
        is_nested: depth > 0,
        depth,
        ancestors: ancestors.clone(),
        rename_confidence: None,
        old_type: Some(old.type_info.signature.clone()),
        new_type: Some(new.type_info.signature.clone()),
    };

    ApiChange {
        descriptor,
        path: old.path.clone(),
        node_kind: old.kind,
        old_location: old.location,
        new_location: new.location,
        old_node: Some(old.clone()),
        new_node: Some(new.clone()),
        nested_changes,
        context,
        explanation: classification.explanation,
    }
}

fn walk_children(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    checker: &dyn TypeChecker,
    options: &WalkOptions,
    depth: usize,
    ancestors: &mut Vec<String>,
) -> Vec<ApiChange> {
    let result = match_children(&old.children, &new.children);
    let mut changes = Vec::new();

    for removed in &result.removed {
        changes.push(child_added_or_removed(removed, Action::Removed, depth, ancestors));
    }
    for added in &result.added {
        changes.push(child_added_or_removed(added, Action::Added, depth, ancestors));
    }
    for (child_old, child_new) in &result.matched {
        let change = build_change_at(child_old, child_new, checker, options, depth, ancestors);
        // Equivalent modifications are still recorded when the child has
        // its own nested changes, so the has-nested-changes tag survives.
        if change.descriptor.impact != Some(Impact::Equivalent) || !change.nested_changes.is_empty() {
            changes.push(change);
        }
    }

    changes
}

fn child_added_or_removed(
    node: &AnalyzableNode,
    action: Action,
    depth: usize,
    ancestors: &[String],
) -> ApiChange {
    let target = target_for_kind(node.kind);
    let mut descriptor = ChangeDescriptor::new(target, action).tagged(ChangeTag::IsNestedChange);

    // A parameter's own optionality at the moment it's added/removed decides
    // whether it can break existing call sites (§8 S1/S2): an added
    // *required* parameter breaks every existing call, an added optional
    // one doesn't.
    if node.kind == crate::model::NodeKind::Parameter {
        let optional = node.has_modifier(crate::model::Modifier::Optional);
        let tag = match (action, optional) {
            (Action::Added, true) => ChangeTag::NowOptional,
            (Action::Added, false) => ChangeTag::NowRequired,
            (Action::Removed, true) => ChangeTag::WasOptional,
            (Action::Removed, false) => ChangeTag::WasRequired,
            _ => unreachable!("child_added_or_removed only called with Added/Removed"),
        };
        descriptor = descriptor.tagged(tag);
    }
    let explanation = match action {
        Action::Added => format!("`{}` was added", node.path),
        Action::Removed => format!("`{}` was removed", node.path),
        _ => unreachable!("child_added_or_removed only called with Added/Removed"),
    };

    let (old_node, new_node, old_location, new_location) = match action {
        Action::Added => (None, Some(node.clone()), None, node.location),
        Action::Removed => (Some(node.clone()), None, node.location, None),
        _ => unreachable!(),
    };

    ApiChange {
        descriptor,
        path: node.path.clone(),
        node_kind: node.kind,
        old_location,
        new_location,
        old_node,
        new_node,
        nested_changes: Vec::new(),
        context: ChangeContext {
            is_nested: true,
            depth,
            ancestors: ancestors.to_vec(),
            rename_confidence: None,
            old_type: None,
            new_type: None,
        },
        explanation,
    }
}
