//! Top-level module diff: match -> rename -> classify -> recurse (§4.3-4.5).
//!
//! `diff_modules` is the differ's single public entry point. Output
//! ordering is part of the contract (§5): renames, then removals (in
//! old-export iteration order), then additions (new-export order), then
//! modifications (old-export order).

use crate::checker::{StringSignatureChecker, TypeChecker};
use crate::matcher::{detect_renames, match_exports, DEFAULT_RENAME_THRESHOLD};
use crate::model::{
    Action, ApiChange, ChangeContext, ChangeDescriptor, ModuleAnalysis, Target,
};
use crate::walker::{build_change, WalkOptions};

/// Knobs matching §6 `diffOptions`.
#[derive(Clone, Debug)]
pub struct DiffOptions {
    pub rename_threshold: f64,
    pub include_nested_changes: bool,
    pub resolve_type_relationships: bool,
    pub max_nesting_depth: usize,
    pub detect_parameter_reordering: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            rename_threshold: DEFAULT_RENAME_THRESHOLD,
            include_nested_changes: true,
            resolve_type_relationships: true,
            max_nesting_depth: 10,
            detect_parameter_reordering: true,
        }
    }
}

/// Diff two module analyses, producing the change list in contractually
/// deterministic order. Uses [`StringSignatureChecker`] as the type
/// checker, which is the correct choice whenever `resolve_type_relationships`
/// is false or no richer checker is wired in.
pub fn diff_modules(
    old: &ModuleAnalysis,
    new: &ModuleAnalysis,
    options: &DiffOptions,
) -> Vec<ApiChange> {
    diff_modules_with_checker(old, new, options, &StringSignatureChecker)
}

/// Same as [`diff_modules`] but with an explicit [`TypeChecker`], for front
/// ends that can resolve real assignability relationships.
pub fn diff_modules_with_checker(
    old: &ModuleAnalysis,
    new: &ModuleAnalysis,
    options: &DiffOptions,
    checker: &dyn TypeChecker,
) -> Vec<ApiChange> {
    let match_result = match_exports(&old.exports, &new.exports);

    let walk_options = WalkOptions {
        include_nested_changes: options.include_nested_changes,
        max_nesting_depth: options.max_nesting_depth,
        detect_parameter_reordering: options.detect_parameter_reordering,
        resolve_type_relationships: options.resolve_type_relationships,
    };

    let renames = detect_renames(
        &match_result.removed,
        &match_result.added,
        options.rename_threshold,
    );
    let renamed_old: std::collections::HashSet<&str> =
        renames.iter().map(|r| r.old.path.as_str()).collect();
    let renamed_new: std::collections::HashSet<&str> =
        renames.iter().map(|r| r.new.path.as_str()).collect();

    let mut changes = Vec::new();

    // 1. Renames.
    for candidate in &renames {
        let mut change = build_change(candidate.old, candidate.new, checker, &walk_options);
        change.descriptor = ChangeDescriptor::new(Target::Export, Action::Renamed);
        change.path = candidate.new.path.clone();
        change.context = ChangeContext {
            is_nested: false,
            depth: 0,
            ancestors: Vec::new(),
            rename_confidence: Some(candidate.confidence),
            old_type: Some(candidate.old.type_info.signature.clone()),
            new_type: Some(candidate.new.type_info.signature.clone()),
        };
        change.explanation = format!(
            "`{}` was renamed to `{}` (confidence {:.2})",
            candidate.old.path, candidate.new.path, candidate.confidence
        );
        changes.push(change);
    }

    // 2. Removals (old-export iteration order), excluding renamed-away nodes.
    for removed in old.exports.iter() {
        if match_result.removed.iter().any(|n| n.path == removed.path)
            && !renamed_old.contains(removed.path.as_str())
        {
            changes.push(removal_change(removed));
        }
    }

    // 3. Additions (new-export iteration order), excluding rename targets.
    for added in new.exports.iter() {
        if match_result.added.iter().any(|n| n.path == added.path)
            && !renamed_new.contains(added.path.as_str())
        {
            changes.push(addition_change(added));
        }
    }

    // 4. Modifications (old-export iteration order).
    for old_export in old.exports.iter() {
        if let Some((_, new_export)) = match_result
            .matched
            .iter()
            .find(|(o, _)| o.path == old_export.path)
        {
            let change = build_change(old_export, new_export, checker, &walk_options);
            // Equivalent top-level changes are only recorded when they carry
            // nested changes (§4.5).
            if change.descriptor.impact != Some(crate::model::Impact::Equivalent)
                || !change.nested_changes.is_empty()
            {
                changes.push(change);
            }
        }
    }

    changes
}

fn removal_change(node: &crate::model::AnalyzableNode) -> ApiChange {
    ApiChange {
        descriptor: ChangeDescriptor::new(Target::Export, Action::Removed),
        path: node.path.clone(),
        node_kind: node.kind,
        old_location: node.location,
        new_location: None,
        old_node: Some(node.clone()),
        new_node: None,
        nested_changes: Vec::new(),
        context: ChangeContext::default(),
        explanation: format!("export `{}` was removed", node.path),
    }
}

fn addition_change(node: &crate::model::AnalyzableNode) -> ApiChange {
    ApiChange {
        descriptor: ChangeDescriptor::new(Target::Export, Action::Added),
        path: node.path.clone(),
        node_kind: node.kind,
        old_location: None,
        new_location: node.location,
        old_node: None,
        new_node: Some(node.clone()),
        nested_changes: Vec::new(),
        context: ChangeContext::default(),
        explanation: format!("export `{}` was added", node.path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalyzableNode, IndexMap, NodeKind, TypeInfo};

    fn analysis(nodes: Vec<AnalyzableNode>) -> ModuleAnalysis {
        let mut exports = IndexMap::new();
        for n in nodes {
            exports.insert(n);
        }
        ModuleAnalysis {
            exports,
            symbols: Default::default(),
            errors: Vec::new(),
        }
    }

    fn func(name: &str, sig: &str) -> AnalyzableNode {
        let mut n = AnalyzableNode::new(name, name, NodeKind::Function);
        n.type_info = TypeInfo::with_signature(sig);
        n
    }

    #[test]
    fn idempotent_diff_yields_no_changes() {
        let old = analysis(vec![func("greet", "(name: string) => string")]);
        let new = analysis(vec![func("greet", "(name: string) => string")]);
        let changes = diff_modules(&old, &new, &DiffOptions::default());
        assert!(changes.is_empty());
    }

    #[test]
    fn export_removed_is_reported() {
        let old = analysis(vec![func("a", "() => void"), func("b", "() => void")]);
        let new = analysis(vec![func("a", "() => void")]);
        let changes = diff_modules(&old, &new, &DiffOptions::default());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].descriptor.action, Action::Removed);
        assert_eq!(changes[0].path, "b");
    }

    #[test]
    fn export_added_is_reported() {
        let old = analysis(vec![func("a", "() => void")]);
        let new = analysis(vec![func("a", "() => void"), func("b", "() => void")]);
        let changes = diff_modules(&old, &new, &DiffOptions::default());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].descriptor.action, Action::Added);
    }

    #[test]
    fn ordering_is_renames_then_removals_then_additions_then_modifications() {
        let old = analysis(vec![
            func("fetchUser", "(id: string) => User"),
            func("onlyOld", "() => void"),
            func("changed", "() => number"),
        ]);
        let new = analysis(vec![
            func("getUser", "(id: string) => User"),
            func("onlyNew", "() => void"),
            func("changed", "() => string"),
        ]);
        let changes = diff_modules(&old, &new, &DiffOptions::default());

        let actions: Vec<_> = changes.iter().map(|c| c.descriptor.action).collect();
        assert_eq!(
            actions,
            vec![Action::Renamed, Action::Removed, Action::Added, Action::Modified]
        );
    }

    #[test]
    fn rename_monotonicity() {
        let old = analysis(vec![func("fetchUser", "(id: string) => User")]);
        let new = analysis(vec![func("getUser", "(id: string) => User")]);
        let changes = diff_modules(&old, &new, &DiffOptions::default());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].descriptor.action, Action::Renamed);
    }

    fn func_with_params(name: &str, params: &[(&str, &str)], ret: &str) -> AnalyzableNode {
        let mut n = AnalyzableNode::new(name, name, NodeKind::Function);
        n.type_info = TypeInfo::with_signature(format!(
            "({}) => {ret}",
            params
                .iter()
                .map(|(n, t)| format!("{n}: {t}"))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        for (pname, ptype) in params {
            let mut p = AnalyzableNode::new(format!("{name}.{pname}"), *pname, NodeKind::Parameter);
            p.type_info = TypeInfo::with_signature(*ptype);
            n.children.insert(p);
        }
        n
    }

    fn interface_with_member(name: &str, member: &str, ty: &str) -> AnalyzableNode {
        let mut node = AnalyzableNode::new(name, name, NodeKind::Interface);
        node.type_info = TypeInfo::with_signature(format!("interface {name}"));
        let mut prop = AnalyzableNode::new(format!("{name}.{member}"), member, NodeKind::Property);
        prop.type_info = TypeInfo::with_signature(ty);
        node.children.insert(prop);
        node
    }

    fn type_alias_object(name: &str, member: &str, ty: &str) -> AnalyzableNode {
        let mut node = AnalyzableNode::new(name, name, NodeKind::TypeAlias);
        node.type_info = TypeInfo::with_signature(format!("{{ {member}: {ty} }}"));
        node
    }

    #[test]
    fn resolve_type_relationships_flag_governs_interface_to_type_alias_equivalence() {
        let old = analysis(vec![interface_with_member("Config", "timeout", "number")]);
        let new = analysis(vec![type_alias_object("Config", "timeout", "number")]);

        let structural = diff_modules(&old, &new, &DiffOptions::default());
        assert!(structural.is_empty());

        let syntactic = diff_modules(
            &old,
            &new,
            &DiffOptions {
                resolve_type_relationships: false,
                ..DiffOptions::default()
            },
        );
        assert_eq!(syntactic.len(), 1);
        assert_eq!(syntactic[0].descriptor.action, Action::Modified);
    }

    #[test]
    fn detect_parameter_reordering_flag_governs_reorder_detection() {
        let old = analysis(vec![func_with_params(
            "f",
            &[("width", "number"), ("height", "number")],
            "void",
        )]);
        let new = analysis(vec![func_with_params(
            "f",
            &[("height", "number"), ("width", "number")],
            "void",
        )]);

        let with_detection = diff_modules(&old, &new, &DiffOptions::default());
        assert_eq!(with_detection.len(), 1);
        assert_eq!(with_detection[0].descriptor.action, Action::Reordered);

        let without_detection = diff_modules(
            &old,
            &new,
            &DiffOptions {
                detect_parameter_reordering: false,
                ..DiffOptions::default()
            },
        );
        assert!(without_detection
            .iter()
            .all(|c| c.descriptor.action != Action::Reordered));
    }
}
