//! Multi-dimensional change classification (§4.4).
//!
//! Given one matched `(old, new)` node pair, decide what happened to it.
//! Evaluation runs in the fixed order documented below; the first step
//! that produces a verdict wins and the remaining steps are skipped:
//! parameter reordering, type-parameter change, enum-member value,
//! type-signature change, modifier change, inheritance clause, deprecation
//! toggle, default-value change, then equivalent as the fallback.

use crate::checker::{split_top_level_union, TypeChecker};
use crate::model::{
    Aspect, ChangeDescriptor, ChangeTag, Impact, Modifier, NodeKind, ParameterInfo, Target,
    TypeParameterInfo,
};
use crate::param_analysis::{detect_parameter_reordering, ParameterOrderAnalysis};
use crate::model::AnalyzableNode;

/// Output of classifying one matched pair.
pub struct Classification {
    pub descriptor: ChangeDescriptor,
    pub explanation: String,
    pub parameter_analysis: Option<ParameterOrderAnalysis>,
}

/// Map a node kind to the `ChangeDescriptor` target vocabulary used when
/// classifying a change *about* that node.
pub fn target_for_kind(kind: NodeKind) -> Target {
    match kind {
        NodeKind::Function
        | NodeKind::Class
        | NodeKind::Interface
        | NodeKind::TypeAlias
        | NodeKind::Variable
        | NodeKind::Enum
        | NodeKind::Namespace => Target::Export,
        NodeKind::Property => Target::Property,
        NodeKind::Method | NodeKind::CallSignature => Target::Method,
        NodeKind::Parameter => Target::Parameter,
        NodeKind::TypeParameter => Target::TypeParameter,
        NodeKind::EnumMember => Target::EnumMember,
        NodeKind::IndexSignature => Target::IndexSignature,
        NodeKind::Getter | NodeKind::Setter => Target::Accessor,
        NodeKind::ConstructSignature => Target::Constructor,
    }
}

/// Classify a matched `(old, new)` pair. `checker` is consulted only by the
/// type-signature step (4); pass [`crate::checker::StringSignatureChecker`]
/// when no richer front end is available. `detect_reordering` mirrors
/// `diffOptions.detectParameterReordering` (§6) - when false, step 1 is
/// skipped entirely and a pure parameter shuffle falls through to the
/// type-signature step like any other signature change.
pub fn classify_pair(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    checker: &dyn TypeChecker,
    detect_reordering: bool,
    resolve_type_relationships: bool,
) -> Classification {
    let target = target_for_kind(old.kind);

    if old.kind.is_callable() && detect_reordering {
        if let Some(result) = classify_reordering(old, new, target) {
            return result;
        }
    }

    if let Some(result) = classify_type_parameters(old, new, target) {
        return result;
    }

    if old.kind == NodeKind::EnumMember {
        if let Some(result) = classify_enum_value(old, new) {
            return result;
        }
    }

    if let Some(result) = classify_type_signature(old, new, target, checker, resolve_type_relationships) {
        return result;
    }

    if let Some(result) = classify_modifiers(old, new, target) {
        return result;
    }

    if let Some(result) = classify_inheritance(old, new, target) {
        return result;
    }

    if let Some(result) = classify_deprecation(old, new, target) {
        return result;
    }

    if let Some(result) = classify_default_value(old, new, target) {
        return result;
    }

    Classification {
        descriptor: ChangeDescriptor::modified(target, Aspect::Type, Impact::Equivalent),
        explanation: format!("`{}` is unchanged", old.path),
        parameter_analysis: None,
    }
}

fn ordered_parameters(node: &AnalyzableNode) -> Vec<ParameterInfo> {
    node.children
        .iter()
        .filter(|c| c.kind == NodeKind::Parameter)
        .enumerate()
        .map(|(position, c)| ParameterInfo {
            name: c.name.clone(),
            type_name: c.type_info.signature.clone(),
            position,
            optional: c.has_modifier(Modifier::Optional),
            rest: c.has_modifier(Modifier::Rest),
        })
        .collect()
}

/// True when a callable's rendered signature changed only because its
/// parameter *count* changed - same return type, and every parameter that
/// survives is unchanged in name and type - so the delta is wholly
/// explained by the parameter(s) added or removed, not by anything else
/// about the callable itself.
fn signature_delta_is_parameter_count_only(old: &AnalyzableNode, new: &AnalyzableNode) -> bool {
    if return_type_suffix(&old.type_info.signature) != return_type_suffix(&new.type_info.signature) {
        return false;
    }

    let old_params = ordered_parameters(old);
    let new_params = ordered_parameters(new);
    if old_params.len() == new_params.len() {
        return false;
    }

    let (shorter, longer) = if old_params.len() < new_params.len() {
        (&old_params, &new_params)
    } else {
        (&new_params, &old_params)
    };
    shorter.iter().all(|p| {
        longer
            .iter()
            .any(|q| q.name == p.name && q.type_name == p.type_name)
    })
}

/// The `R` half of a rendered `"(...) => R"` call signature.
fn return_type_suffix(signature: &str) -> &str {
    signature.rsplit(" => ").next().unwrap_or(signature)
}

/// Step 1: parameter reordering for callable kinds.
fn classify_reordering(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    target: Target,
) -> Option<Classification> {
    let old_params = ordered_parameters(old);
    let new_params = ordered_parameters(new);
    let analysis = detect_parameter_reordering(&old_params, &new_params);
    if !analysis.has_reordering {
        return None;
    }

    let descriptor = ChangeDescriptor::new(Target::Parameter, crate::model::Action::Reordered);
    let explanation = format!(
        "`{}` parameters were reordered ({:?} confidence)",
        old.path, analysis.confidence
    );
    let _ = target; // the reorder target is always Parameter, regardless of owner kind.
    Some(Classification {
        descriptor,
        explanation,
        parameter_analysis: Some(analysis),
    })
}

/// Step 2: type-parameter list change (added/removed/constraint/default),
/// compared by name, first difference wins.
fn classify_type_parameters(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    _target: Target,
) -> Option<Classification> {
    let old_tps = &old.type_info.type_parameters;
    let new_tps = &new.type_info.type_parameters;
    if old_tps.is_empty() && new_tps.is_empty() {
        return None;
    }

    let find = |list: &[TypeParameterInfo], name: &str| list.iter().find(|t| t.name == name);

    for new_tp in new_tps {
        if find(old_tps, &new_tp.name).is_none() {
            let descriptor = ChangeDescriptor::new(Target::TypeParameter, crate::model::Action::Added)
                .with_tag(ChangeTag::AffectsTypeParameter);
            return Some(Classification {
                descriptor,
                explanation: format!(
                    "type parameter `{}` was added to `{}`",
                    new_tp.name, old.path
                ),
                parameter_analysis: None,
            });
        }
    }
    for old_tp in old_tps {
        if find(new_tps, &old_tp.name).is_none() {
            let descriptor =
                ChangeDescriptor::new(Target::TypeParameter, crate::model::Action::Removed)
                    .with_tag(ChangeTag::AffectsTypeParameter);
            return Some(Classification {
                descriptor,
                explanation: format!(
                    "type parameter `{}` was removed from `{}`",
                    old_tp.name, old.path
                ),
                parameter_analysis: None,
            });
        }
    }
    for old_tp in old_tps {
        let Some(new_tp) = find(new_tps, &old_tp.name) else {
            continue;
        };
        if old_tp.constraint != new_tp.constraint {
            let impact = match (&old_tp.constraint, &new_tp.constraint) {
                (None, Some(_)) => Impact::Narrowing,
                (Some(_), None) => Impact::Widening,
                _ => Impact::Undetermined,
            };
            let descriptor = ChangeDescriptor::modified(Target::TypeParameter, Aspect::Constraint, impact);
            return Some(Classification {
                descriptor,
                explanation: format!(
                    "type parameter `{}` on `{}` changed constraint ({:?} -> {:?})",
                    old_tp.name, old.path, old_tp.constraint, new_tp.constraint
                ),
                parameter_analysis: None,
            });
        }
    }
    for old_tp in old_tps {
        let Some(new_tp) = find(new_tps, &old_tp.name) else {
            continue;
        };
        if old_tp.default != new_tp.default {
            let impact = match (&old_tp.default, &new_tp.default) {
                (None, Some(_)) => Impact::Widening,
                (Some(_), None) => Impact::Narrowing,
                _ => Impact::Undetermined,
            };
            let descriptor = ChangeDescriptor::modified(Target::TypeParameter, Aspect::DefaultType, impact);
            return Some(Classification {
                descriptor,
                explanation: format!(
                    "type parameter `{}` on `{}` changed default ({:?} -> {:?})",
                    old_tp.name, old.path, old_tp.default, new_tp.default
                ),
                parameter_analysis: None,
            });
        }
    }

    None
}

/// Step 3: enum-member value change.
fn classify_enum_value(old: &AnalyzableNode, new: &AnalyzableNode) -> Option<Classification> {
    if old.type_info.signature == new.type_info.signature {
        return None;
    }
    let descriptor = ChangeDescriptor::modified(Target::EnumMember, Aspect::EnumValue, Impact::Unrelated);
    Some(Classification {
        descriptor,
        explanation: format!(
            "enum member `{}` value changed from `{}` to `{}`",
            old.path, old.type_info.signature, new.type_info.signature
        ),
        parameter_analysis: None,
    })
}

/// Step 4: type-signature comparison with union-aware impact.
fn classify_type_signature(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    target: Target,
    checker: &dyn TypeChecker,
    resolve_type_relationships: bool,
) -> Option<Classification> {
    let old_sig = &old.type_info.signature;
    let new_sig = &new.type_info.signature;

    // Open question (§9): replacing an `interface` with a structurally
    // identical `type` alias (or vice versa) is a source-text change but
    // not necessarily an API change. When `resolveTypeRelationships` is on
    // (the default), judge the two declaration forms by their member shape
    // rather than by keyword or rendered text; off, the raw signature
    // comparison below is syntactic and a keyword swap always registers.
    if resolve_type_relationships
        && old.kind != new.kind
        && is_type_like(old.kind)
        && is_type_like(new.kind)
        && structural_signature(old) == structural_signature(new)
    {
        return None;
    }

    if old_sig == new_sig {
        return None;
    }

    // A callable's rendered signature embeds its whole parameter list, so
    // adding or removing a parameter changes this string even though
    // nothing about the callable's *own* contract narrowed or widened -
    // the walker already reports that parameter as its own added/removed
    // child (§8 S1). Let that nested change carry the verdict instead of
    // also reporting a spurious top-level type-unrelated here.
    if old.kind.is_callable() && signature_delta_is_parameter_count_only(old, new) {
        return None;
    }

    let old_handle = crate::model::TypeHandle(old_sig.clone());
    let new_handle = crate::model::TypeHandle(new_sig.clone());
    let impact = type_signature_impact(&old_handle, &new_handle, checker);

    let descriptor = ChangeDescriptor::modified(target, Aspect::Type, impact);
    Some(Classification {
        descriptor,
        explanation: format!(
            "`{}` type changed from `{}` to `{}` ({:?})",
            old.path, old_sig, new_sig, impact
        ),
        parameter_analysis: None,
    })
}

fn type_signature_impact(
    old_handle: &crate::model::TypeHandle,
    new_handle: &crate::model::TypeHandle,
    checker: &dyn TypeChecker,
) -> Impact {
    let old_union = checker.decompose_union(old_handle);
    let new_union = checker.decompose_union(new_handle);

    match (old_union, new_union) {
        (Some(old_members), Some(new_members)) => {
            let old_set: std::collections::BTreeSet<String> =
                old_members.iter().map(|h| checker.stringify(h)).collect();
            let new_set: std::collections::BTreeSet<String> =
                new_members.iter().map(|h| checker.stringify(h)).collect();
            if old_set == new_set {
                Impact::Equivalent
            } else if old_set.is_subset(&new_set) {
                Impact::Widening
            } else if new_set.is_subset(&old_set) {
                Impact::Narrowing
            } else if old_set.is_disjoint(&new_set) {
                Impact::Unrelated
            } else {
                Impact::Undetermined
            }
        }
        (None, Some(new_members)) => {
            let old_str = checker.stringify(old_handle);
            if new_members.iter().any(|m| checker.stringify(m) == old_str) {
                Impact::Widening
            } else {
                Impact::Unrelated
            }
        }
        (Some(old_members), None) => {
            let new_str = checker.stringify(new_handle);
            if old_members.iter().any(|m| checker.stringify(m) == new_str) {
                Impact::Narrowing
            } else {
                Impact::Unrelated
            }
        }
        (None, None) => string_heuristic_impact(&old_handle.0, &new_handle.0),
    }
}

/// Declaration kinds whose member shape can be compared structurally
/// regardless of which keyword declared them (`interface` vs. `type`).
fn is_type_like(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Interface | NodeKind::TypeAlias | NodeKind::Class)
}

/// A kind-independent view of a type-like declaration's member shape: a
/// sorted `name: type` list, so an `interface` and a structurally
/// identical `type` alias hash the same even though one carries `Property`
/// children and the other's whole body lives in its own rendered signature
/// (§3 front-end asymmetry - interfaces get members as children with a
/// header-only top-level signature, type aliases don't).
fn structural_signature(node: &AnalyzableNode) -> String {
    let mut members: Vec<(String, String)> = if node.children.is_empty() {
        parse_object_literal_members(&node.type_info.signature)
    } else {
        node.children
            .iter()
            .filter(|c| c.kind == NodeKind::Property)
            .map(|c| (c.name.clone(), c.type_info.signature.clone()))
            .collect()
    };
    members.sort();
    members
        .into_iter()
        .map(|(name, ty)| format!("{name}: {ty}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Pull `name: type` pairs out of a rendered object-literal type body such
/// as `"{ timeout: number; retries?: number }"`. Depth-tracked the same way
/// [`split_top_level_union`] tracks `|` members, so nested braces/generics
/// in a member's own type don't get split on. Returns an empty list for
/// anything that isn't a brace-delimited object literal (e.g. a primitive
/// or union alias), which correctly fails the structural-equivalence check
/// against an interface.
fn parse_object_literal_members(rendered: &str) -> Vec<(String, String)> {
    let trimmed = rendered.trim();
    let Some(body) = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
    else {
        return Vec::new();
    };

    let mut depth: i32 = 0;
    let mut current = String::new();
    let mut fields = Vec::new();

    for ch in body.chars() {
        match ch {
            '<' | '(' | '{' | '[' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ')' | '}' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            ';' | ',' if depth == 0 => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        fields.push(tail.to_string());
    }

    fields
        .into_iter()
        .filter(|f| !f.is_empty())
        .filter_map(|field| {
            let (name, ty) = field.split_once(':')?;
            Some((name.trim().trim_end_matches('?').to_string(), ty.trim().to_string()))
        })
        .collect()
}

/// Fallback used when the checker has no richer information: `'|'`
/// membership as above, `?` presence change implies optionality
/// direction, else undetermined.
fn string_heuristic_impact(old_sig: &str, new_sig: &str) -> Impact {
    let old_union = split_top_level_union(old_sig);
    let new_union = split_top_level_union(new_sig);

    if old_union.is_some() || new_union.is_some() {
        let old_set: std::collections::BTreeSet<String> = old_union
            .unwrap_or_else(|| vec![old_sig.trim().to_string()])
            .into_iter()
            .collect();
        let new_set: std::collections::BTreeSet<String> = new_union
            .unwrap_or_else(|| vec![new_sig.trim().to_string()])
            .into_iter()
            .collect();
        return if old_set == new_set {
            Impact::Equivalent
        } else if old_set.is_subset(&new_set) {
            Impact::Widening
        } else if new_set.is_subset(&old_set) {
            Impact::Narrowing
        } else if old_set.is_disjoint(&new_set) {
            Impact::Unrelated
        } else {
            Impact::Undetermined
        };
    }

    let old_optional = old_sig.trim_end().ends_with('?');
    let new_optional = new_sig.trim_end().ends_with('?');
    if old_optional != new_optional {
        return if new_optional {
            Impact::Widening
        } else {
            Impact::Narrowing
        };
    }

    // Neither side is a union and neither carries an optionality marker:
    // two plain signatures that differ are disjoint types, not merely
    // undetermined (§4.4 step 4, S3).
    Impact::Unrelated
}

/// Step 5: modifier changes, fixed precedence: readonly, optional,
/// abstract, static, visibility.
fn classify_modifiers(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    target: Target,
) -> Option<Classification> {
    let readonly_old = old.has_modifier(Modifier::Readonly);
    let readonly_new = new.has_modifier(Modifier::Readonly);
    if readonly_old != readonly_new {
        let impact = if readonly_new {
            Impact::Narrowing
        } else {
            Impact::Widening
        };
        return Some(simple_modifier_change(old, target, Aspect::Readonly, impact));
    }

    let optional_old = old.has_modifier(Modifier::Optional);
    let optional_new = new.has_modifier(Modifier::Optional);
    if optional_old != optional_new {
        let (impact, tags): (Impact, Vec<ChangeTag>) = if optional_new {
            (Impact::Widening, vec![ChangeTag::WasRequired, ChangeTag::NowOptional])
        } else {
            (Impact::Narrowing, vec![ChangeTag::WasOptional, ChangeTag::NowRequired])
        };
        let descriptor = ChangeDescriptor::modified(target, Aspect::Optionality, impact).with_tags(tags);
        return Some(Classification {
            explanation: format!(
                "`{}` optionality changed ({} -> {})",
                old.path, optional_old, optional_new
            ),
            descriptor,
            parameter_analysis: None,
        });
    }

    let abstract_old = old.has_modifier(Modifier::Abstract);
    let abstract_new = new.has_modifier(Modifier::Abstract);
    if abstract_old != abstract_new {
        let impact = if abstract_new {
            Impact::Narrowing
        } else {
            Impact::Widening
        };
        return Some(simple_modifier_change(old, target, Aspect::Abstractness, impact));
    }

    let static_old = old.has_modifier(Modifier::Static);
    let static_new = new.has_modifier(Modifier::Static);
    if static_old != static_new {
        return Some(simple_modifier_change(old, target, Aspect::Staticness, Impact::Unrelated));
    }

    let visibility_old = visibility_rank(old);
    let visibility_new = visibility_rank(new);
    if visibility_old != visibility_new && visibility_new > visibility_old {
        return Some(simple_modifier_change(
            old,
            target,
            Aspect::Visibility,
            Impact::Undetermined,
        ));
    }

    None
}

fn simple_modifier_change(
    old: &AnalyzableNode,
    target: Target,
    aspect: Aspect,
    impact: Impact,
) -> Classification {
    Classification {
        descriptor: ChangeDescriptor::modified(target, aspect, impact),
        explanation: format!("`{}` {:?} changed ({:?})", old.path, aspect, impact),
        parameter_analysis: None,
    }
}

/// Higher rank = more restrictive. Used only to detect *tightening*.
fn visibility_rank(node: &AnalyzableNode) -> u8 {
    if node.has_modifier(Modifier::Private) {
        2
    } else if node.has_modifier(Modifier::Protected) {
        1
    } else {
        0
    }
}

/// Step 6: extends/implements clause changes. Element-wise ordering is
/// significant, so plain `Vec` equality is the comparison.
fn classify_inheritance(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    target: Target,
) -> Option<Classification> {
    if old.extends != new.extends {
        return Some(inheritance_change(old, target, Aspect::ExtendsClause, &old.extends, &new.extends));
    }
    if old.implements != new.implements {
        return Some(inheritance_change(
            old,
            target,
            Aspect::ImplementsClause,
            &old.implements,
            &new.implements,
        ));
    }
    None
}

fn inheritance_change(
    old: &AnalyzableNode,
    target: Target,
    aspect: Aspect,
    old_list: &[String],
    new_list: &[String],
) -> Classification {
    let impact = if old_list.is_empty() && !new_list.is_empty() {
        Impact::Narrowing
    } else if !old_list.is_empty() && new_list.is_empty() {
        Impact::Widening
    } else {
        Impact::Undetermined
    };
    Classification {
        descriptor: ChangeDescriptor::modified(target, aspect, impact),
        explanation: format!(
            "`{}` {:?} changed ({:?} -> {:?})",
            old.path, aspect, old_list, new_list
        ),
        parameter_analysis: None,
    }
}

/// Step 7: deprecation toggle.
fn classify_deprecation(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    target: Target,
) -> Option<Classification> {
    let old_dep = old.is_deprecated();
    let new_dep = new.is_deprecated();
    if old_dep == new_dep {
        return None;
    }
    let impact = if new_dep {
        Impact::Widening
    } else {
        Impact::Narrowing
    };
    Some(Classification {
        descriptor: ChangeDescriptor::modified(target, Aspect::Deprecation, impact),
        explanation: format!(
            "`{}` {} deprecated",
            old.path,
            if new_dep { "became" } else { "is no longer" }
        ),
        parameter_analysis: None,
    })
}

/// Step 8: default-value change, read off doc-comment-derived metadata
/// (`@defaultValue`/`@default`) rather than the type signature - gaining a
/// default widens (a caller may now omit the argument), losing one narrows.
fn classify_default_value(
    old: &AnalyzableNode,
    new: &AnalyzableNode,
    target: Target,
) -> Option<Classification> {
    let old_default = old.metadata.as_ref().and_then(|m| m.default_value.as_ref());
    let new_default = new.metadata.as_ref().and_then(|m| m.default_value.as_ref());
    if old_default == new_default {
        return None;
    }

    let (impact, tag) = match (old_default, new_default) {
        (None, Some(_)) => (Impact::Widening, ChangeTag::HasDefault),
        (Some(_), None) => (Impact::Narrowing, ChangeTag::HadDefault),
        _ => (Impact::Undetermined, ChangeTag::HasDefault),
    };
    let descriptor = ChangeDescriptor::modified(target, Aspect::DefaultValue, impact).with_tag(tag);
    Some(Classification {
        explanation: format!(
            "`{}` default value changed ({:?} -> {:?})",
            old.path, old_default, new_default
        ),
        descriptor,
        parameter_analysis: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::StringSignatureChecker;
    use crate::model::{AnalyzableNode, NodeKind, TypeInfo};

    fn function(path: &str, params: &[(&str, &str, bool)], ret: &str) -> AnalyzableNode {
        let mut node = AnalyzableNode::new(path, path, NodeKind::Function);
        node.type_info = TypeInfo::with_signature(format!(
            "({}) => {ret}",
            params
                .iter()
                .map(|(n, t, opt)| format!("{n}{}: {t}", if *opt { "?" } else { "" }))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        for (i, (name, ty, optional)) in params.iter().enumerate() {
            let mut p = AnalyzableNode::new(format!("{path}.{name}"), *name, NodeKind::Parameter);
            p.type_info = TypeInfo::with_signature(*ty);
            if *optional {
                p.modifiers.insert(Modifier::Optional);
            }
            let _ = i;
            node.children.insert(p);
        }
        node
    }

    #[test]
    fn scenario_s1_optional_parameter_added_is_widening() {
        let old = function("greet", &[("name", "string", false)], "string");
        let new = function(
            "greet",
            &[("name", "string", false), ("prefix", "string", true)],
            "string",
        );
        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        // An added optional parameter changes the rendered call-signature
        // string, but that delta is wholly explained by the parameter the
        // walker already reports as its own added child - the top-level
        // pairing itself must not also report a spurious type-unrelated
        // major here.
        assert_ne!(classification.descriptor.action, crate::model::Action::Reordered);
        assert_eq!(classification.descriptor.impact, Some(Impact::Equivalent));
    }

    #[test]
    fn parameter_type_change_alongside_add_still_reports_top_level_signature_change() {
        // Adding a parameter AND changing an existing one's type is not
        // explained by parameter count alone, so the top-level signature
        // step must still fire.
        let old = function("f", &[("a", "number", false)], "void");
        let new = function(
            "f",
            &[("a", "string", false), ("b", "string", true)],
            "void",
        );
        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.aspect, Some(Aspect::Type));
        assert_ne!(classification.descriptor.impact, Some(Impact::Equivalent));
    }

    #[test]
    fn scenario_s5_parameter_reordering_detected() {
        let old = function(
            "f",
            &[("width", "number", false), ("height", "number", false)],
            "void",
        );
        let new = function(
            "f",
            &[("height", "number", false), ("width", "number", false)],
            "void",
        );
        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.action, crate::model::Action::Reordered);
        assert_eq!(classification.descriptor.target, Target::Parameter);
    }

    #[test]
    fn reordering_detection_is_skipped_when_disabled() {
        let old = function(
            "f",
            &[("width", "number", false), ("height", "number", false)],
            "void",
        );
        let new = function(
            "f",
            &[("height", "number", false), ("width", "number", false)],
            "void",
        );
        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, false, true);
        assert_ne!(classification.descriptor.action, crate::model::Action::Reordered);
    }

    #[test]
    fn scenario_s3_property_type_narrowing_is_unrelated_for_disjoint_types() {
        let mut old = AnalyzableNode::new("Config.timeout", "timeout", NodeKind::Property);
        old.type_info = TypeInfo::with_signature("number");
        let mut new = AnalyzableNode::new("Config.timeout", "timeout", NodeKind::Property);
        new.type_info = TypeInfo::with_signature("string");

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.aspect, Some(Aspect::Type));
        assert_eq!(classification.descriptor.impact, Some(Impact::Unrelated));
    }

    #[test]
    fn scenario_s4_union_member_added_is_widening() {
        let mut old = AnalyzableNode::new("Status", "Status", NodeKind::TypeAlias);
        old.type_info = TypeInfo::with_signature("\"a\" | \"b\"");
        let mut new = AnalyzableNode::new("Status", "Status", NodeKind::TypeAlias);
        new.type_info = TypeInfo::with_signature("\"a\" | \"b\" | \"c\"");

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.impact, Some(Impact::Widening));
    }

    fn interface_with_member(path: &str, member: &str, ty: &str) -> AnalyzableNode {
        let mut node = AnalyzableNode::new(path, path, NodeKind::Interface);
        node.type_info = TypeInfo::with_signature(format!("interface {path}"));
        let mut prop = AnalyzableNode::new(format!("{path}.{member}"), member, NodeKind::Property);
        prop.type_info = TypeInfo::with_signature(ty);
        node.children.insert(prop);
        node
    }

    fn type_alias_object(path: &str, member: &str, ty: &str) -> AnalyzableNode {
        let mut node = AnalyzableNode::new(path, path, NodeKind::TypeAlias);
        node.type_info = TypeInfo::with_signature(format!("{{ {member}: {ty} }}"));
        node
    }

    #[test]
    fn interface_to_structurally_identical_type_alias_is_equivalent_by_default() {
        let old = interface_with_member("Config", "timeout", "number");
        let new = type_alias_object("Config", "timeout", "number");

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        // No step fires: the type-signature step treats the two
        // declarations as structurally equivalent and every later step
        // (modifiers, inheritance, deprecation, default value) also finds
        // nothing, so `classify_pair` reaches its "unchanged" fallback.
        assert_eq!(classification.descriptor.impact, Some(Impact::Equivalent));
        assert_eq!(classification.descriptor.aspect, Some(Aspect::Type));
    }

    #[test]
    fn interface_to_type_alias_is_reported_when_resolve_type_relationships_disabled() {
        let old = interface_with_member("Config", "timeout", "number");
        let new = type_alias_object("Config", "timeout", "number");

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, false);
        assert_eq!(classification.descriptor.aspect, Some(Aspect::Type));
    }

    #[test]
    fn interface_to_type_alias_with_different_members_is_still_a_change() {
        let old = interface_with_member("Config", "timeout", "number");
        let new = type_alias_object("Config", "timeout", "string");

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.aspect, Some(Aspect::Type));
    }

    #[test]
    fn scenario_s6_removed_deprecation_is_narrowing() {
        let mut old = AnalyzableNode::new("f", "f", NodeKind::Function);
        old.type_info = TypeInfo::with_signature("() => void");
        old.metadata = Some(crate::model::NodeMetadata {
            deprecated: true,
            deprecation_message: Some("use g".to_string()),
            default_value: None,
            release_tag: None,
        });
        let mut new = AnalyzableNode::new("f", "f", NodeKind::Function);
        new.type_info = TypeInfo::with_signature("() => void");

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.aspect, Some(Aspect::Deprecation));
        assert_eq!(classification.descriptor.impact, Some(Impact::Narrowing));
    }

    #[test]
    fn gaining_a_documented_default_is_widening() {
        let mut old = AnalyzableNode::new("f.timeout", "timeout", NodeKind::Parameter);
        old.type_info = TypeInfo::with_signature("number");
        let mut new = AnalyzableNode::new("f.timeout", "timeout", NodeKind::Parameter);
        new.type_info = TypeInfo::with_signature("number");
        new.metadata = Some(crate::model::NodeMetadata {
            deprecated: false,
            deprecation_message: None,
            default_value: Some("30".to_string()),
            release_tag: None,
        });

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.aspect, Some(Aspect::DefaultValue));
        assert_eq!(classification.descriptor.impact, Some(Impact::Widening));
        assert!(classification.descriptor.tags.contains(&ChangeTag::HasDefault));
    }

    #[test]
    fn losing_a_documented_default_is_narrowing() {
        let mut old = AnalyzableNode::new("f.timeout", "timeout", NodeKind::Parameter);
        old.type_info = TypeInfo::with_signature("number");
        old.metadata = Some(crate::model::NodeMetadata {
            deprecated: false,
            deprecation_message: None,
            default_value: Some("30".to_string()),
            release_tag: None,
        });
        let mut new = AnalyzableNode::new("f.timeout", "timeout", NodeKind::Parameter);
        new.type_info = TypeInfo::with_signature("number");

        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.aspect, Some(Aspect::DefaultValue));
        assert_eq!(classification.descriptor.impact, Some(Impact::Narrowing));
        assert!(classification.descriptor.tags.contains(&ChangeTag::HadDefault));
    }

    #[test]
    fn equivalent_when_nothing_changed() {
        let old = function("f", &[("a", "number", false)], "void");
        let new = function("f", &[("a", "number", false)], "void");
        let checker = StringSignatureChecker;
        let classification = classify_pair(&old, &new, &checker, true, true);
        assert_eq!(classification.descriptor.impact, Some(Impact::Equivalent));
    }
}
