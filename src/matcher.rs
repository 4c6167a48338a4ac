//! Node matching and rename detection (§4.3).

use crate::model::{AnalyzableNode, Children, IndexMap};
use crate::similarity::{name_similarity, signature_similarity};

/// Result of pairing two name-keyed node maps by exact name.
pub struct MatchResult<'a> {
    pub matched: Vec<(&'a AnalyzableNode, &'a AnalyzableNode)>,
    pub removed: Vec<&'a AnalyzableNode>,
    pub added: Vec<&'a AnalyzableNode>,
}

/// Pair nodes by exact name between two top-level export maps.
/// O(n) over the larger map.
pub fn match_exports<'a>(old: &'a IndexMap, new: &'a IndexMap) -> MatchResult<'a> {
    let mut matched = Vec::new();
    let mut removed = Vec::new();

    for old_node in old.iter() {
        match new.get(&old_node.name) {
            Some(new_node) => matched.push((old_node, new_node)),
            None => removed.push(old_node),
        }
    }

    let added = new
        .iter()
        .filter(|n| old.get(&n.name).is_none())
        .collect();

    MatchResult {
        matched,
        removed,
        added,
    }
}

/// Pair nodes by exact name between two children maps.
pub fn match_children<'a>(old: &'a Children, new: &'a Children) -> MatchResult<'a> {
    let mut matched = Vec::new();
    let mut removed = Vec::new();

    for old_node in old.iter() {
        match new.get(&old_node.name) {
            Some(new_node) => matched.push((old_node, new_node)),
            None => removed.push(old_node),
        }
    }

    let added = new
        .iter()
        .filter(|n| old.get(&n.name).is_none())
        .collect();

    MatchResult {
        matched,
        removed,
        added,
    }
}

/// A candidate or confirmed rename pairing.
#[derive(Clone, Debug)]
pub struct RenameCandidate<'a> {
    pub old: &'a AnalyzableNode,
    pub new: &'a AnalyzableNode,
    pub confidence: f64,
}

/// Default rename-acceptance threshold (§6 `diffOptions.renameThreshold`).
pub const DEFAULT_RENAME_THRESHOLD: f64 = 0.8;

/// Detect renames among `removed`/`added` nodes of the same kind.
///
/// Score (§4.3): `0.4 * name_similarity + 0.4 * signature_similarity +
/// 0.1 * modifier_jaccard + 0.1 * children_count_similarity`. Pairs scoring
/// at or above `threshold` are candidates; greedy selection then commits
/// the highest-scoring pairs first, skipping any endpoint already
/// committed, so the final result contains no node on either side twice.
pub fn detect_renames<'a>(
    removed: &[&'a AnalyzableNode],
    added: &[&'a AnalyzableNode],
    threshold: f64,
) -> Vec<RenameCandidate<'a>> {
    let mut candidates = Vec::new();

    for &old in removed {
        for &new in added {
            if old.kind != new.kind {
                continue;
            }
            let score = rename_score(old, new);
            if score >= threshold {
                candidates.push(RenameCandidate {
                    old,
                    new,
                    confidence: score,
                });
            }
        }
    }

    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut committed_old = std::collections::HashSet::new();
    let mut committed_new = std::collections::HashSet::new();
    let mut accepted = Vec::new();

    for candidate in candidates {
        let old_key = candidate.old.path.as_str();
        let new_key = candidate.new.path.as_str();
        if committed_old.contains(old_key) || committed_new.contains(new_key) {
            continue;
        }
        committed_old.insert(old_key);
        committed_new.insert(new_key);
        accepted.push(candidate);
    }

    accepted
}

fn rename_score(old: &AnalyzableNode, new: &AnalyzableNode) -> f64 {
    let name_term = name_similarity(&old.name, &new.name);
    let signature_term = signature_similarity(&old.type_info.signature, &new.type_info.signature);
    let modifier_term = jaccard(&old.modifiers, &new.modifiers);
    let children_term = children_count_similarity(old.children.len(), new.children.len());

    0.4 * name_term + 0.4 * signature_term + 0.1 * modifier_term + 0.1 * children_term
}

fn jaccard<T: Ord + Clone>(a: &std::collections::BTreeSet<T>, b: &std::collections::BTreeSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

fn children_count_similarity(a: usize, b: usize) -> f64 {
    if a == b {
        1.0
    } else if a == 0 || b == 0 {
        0.0
    } else {
        a.min(b) as f64 / a.max(b) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalyzableNode, IndexMap, Modifier, NodeKind, TypeInfo};

    fn node(path: &str, name: &str, kind: NodeKind, signature: &str) -> AnalyzableNode {
        let mut n = AnalyzableNode::new(path, name, kind);
        n.type_info = TypeInfo::with_signature(signature);
        n
    }

    #[test]
    fn match_exports_exact_name() {
        let mut old = IndexMap::new();
        old.insert(node("greet", "greet", NodeKind::Function, "(name: string) => string"));
        let mut new = IndexMap::new();
        new.insert(node("greet", "greet", NodeKind::Function, "(name: string) => string"));

        let result = match_exports(&old, &new);
        assert_eq!(result.matched.len(), 1);
        assert!(result.removed.is_empty());
        assert!(result.added.is_empty());
    }

    #[test]
    fn detect_renames_greedy_prefers_highest_score() {
        let old_a = node("fetchUser", "fetchUser", NodeKind::Function, "(id: string) => User");
        let new_a = node("getUser", "getUser", NodeKind::Function, "(id: string) => User");
        let new_b = node("getUserRecord", "getUserRecord", NodeKind::Function, "(id: string) => User");

        let removed = vec![&old_a];
        let added = vec![&new_a, &new_b];

        let renames = detect_renames(&removed, &added, 0.5);
        assert_eq!(renames.len(), 1);
        assert_eq!(renames[0].new.name, "getUser");
    }

    #[test]
    fn detect_renames_respects_kind() {
        let old_fn = node("Widget", "Widget", NodeKind::Function, "() => void");
        let new_class = node("Widget2", "Widget2", NodeKind::Class, "class Widget2 {}");
        let removed = vec![&old_fn];
        let added = vec![&new_class];
        assert!(detect_renames(&removed, &added, 0.1).is_empty());
    }
}
