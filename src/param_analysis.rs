//! Parameter-reordering detection (§4.2).
//!
//! Pure and language-independent: operates on `&[ParameterInfo]` only, no
//! analyzer or differ types involved, so it can be unit-tested in isolation
//! from the rest of the pipeline.

use crate::model::ParameterInfo;
use crate::similarity::name_similarity;

/// Confidence that a detected reordering is real rather than coincidental.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReorderConfidence {
    High,
    Medium,
}

/// Result of comparing two parameter lists for positional reordering.
#[derive(Clone, Debug)]
pub struct ParameterOrderAnalysis {
    pub has_reordering: bool,
    pub confidence: Option<ReorderConfidence>,
    /// `new[i]` was at `permutation[i]` in `old`, when a permutation exists.
    pub permutation: Option<Vec<usize>>,
    pub summary: String,
}

impl ParameterOrderAnalysis {
    fn no_reorder(summary: impl Into<String>) -> Self {
        Self {
            has_reordering: false,
            confidence: None,
            permutation: None,
            summary: summary.into(),
        }
    }
}

/// Detect whether `new` is a reordering of `old`'s parameters.
///
/// Preconditions (checked, not assumed): both lists non-empty, same length,
/// and the same multiset of types at matching positions under some
/// permutation. Any violation returns `has_reordering = false` with the
/// reason recorded in `summary` rather than panicking - reordering
/// detection is advisory, never a hard failure of the classifier.
pub fn detect_parameter_reordering(
    old: &[ParameterInfo],
    new: &[ParameterInfo],
) -> ParameterOrderAnalysis {
    if old.len() <= 1 || new.len() <= 1 {
        return ParameterOrderAnalysis::no_reorder("single-parameter");
    }
    if old.len() != new.len() {
        return ParameterOrderAnalysis::no_reorder("count-changed");
    }

    let permutation = match find_type_permutation(old, new) {
        Some(p) => p,
        None => return ParameterOrderAnalysis::no_reorder("types-differ"),
    };

    if permutation.iter().enumerate().all(|(i, &p)| i == p) {
        return ParameterOrderAnalysis::no_reorder("only-renames");
    }

    // Average name similarity at matching (identity) positions vs under the
    // detected permutation. A real reorder should look like an *obvious*
    // rename if read positionally, but consistent once un-shuffled.
    let identity_similarity = average_similarity(old, new, |i| i);
    let permuted_similarity = average_similarity(old, new, |i| permutation[i]);

    if identity_similarity < 0.5 && permuted_similarity > identity_similarity {
        let confidence = if permuted_similarity >= 0.9 && is_swap_or_cycle(&permutation) {
            Some(ReorderConfidence::High)
        } else if permuted_similarity >= 0.7 {
            Some(ReorderConfidence::Medium)
        } else {
            None
        };

        match confidence {
            Some(confidence) => ParameterOrderAnalysis {
                has_reordering: true,
                confidence: Some(confidence),
                permutation: Some(permutation),
                summary: "reordered".to_string(),
            },
            None => ParameterOrderAnalysis::no_reorder("low-rename-consistency"),
        }
    } else {
        ParameterOrderAnalysis::no_reorder("only-renames")
    }
}

/// Average `name_similarity(new[i], old[mapping(i)])` over all positions.
fn average_similarity(
    old: &[ParameterInfo],
    new: &[ParameterInfo],
    mapping: impl Fn(usize) -> usize,
) -> f64 {
    let n = new.len();
    if n == 0 {
        return 1.0;
    }
    let total: f64 = (0..n)
        .map(|i| name_similarity(&new[i].name, &old[mapping(i)].name))
        .sum();
    total / n as f64
}

/// Find a permutation `π` such that `new[i].type == old[π(i)].type` for
/// every position. Among the (possibly many) type-compatible assignments -
/// homogeneously-typed parameter lists make the type constraint alone
/// ambiguous - each `new[i]` is greedily paired with the unused, type-
/// compatible `old[j]` its name is *most* similar to. This is what lets a
/// same-typed swap (`f(width: number, height: number)` ->
/// `f(height: number, width: number)`, §8 S5) resolve to the genuine swap
/// instead of a spurious identity match, while still preferring identity
/// when nothing but the parameter name actually moved.
fn find_type_permutation(old: &[ParameterInfo], new: &[ParameterInfo]) -> Option<Vec<usize>> {
    let n = old.len();
    let mut used = vec![false; n];
    let mut permutation = vec![0usize; n];

    for i in 0..n {
        let candidate = (0..n)
            .filter(|&j| !used[j] && old[j].type_name == new[i].type_name)
            .max_by(|&a, &b| {
                let score_a = name_similarity(&new[i].name, &old[a].name);
                let score_b = name_similarity(&new[i].name, &old[b].name);
                // Ties prefer the identity slot so untouched parameters
                // never get spuriously permuted.
                score_a
                    .partial_cmp(&score_b)
                    .unwrap()
                    .then_with(|| (a == i).cmp(&(b == i)))
            })?;
        used[candidate] = true;
        permutation[i] = candidate;
    }

    Some(permutation)
}

/// True when the permutation is a single transposition (swap) or an
/// n-cycle, the shapes §4.2 considers high-confidence reorders.
fn is_swap_or_cycle(permutation: &[usize]) -> bool {
    let n = permutation.len();
    let mut visited = vec![false; n];
    let mut cycle_count = 0;

    for start in 0..n {
        if visited[start] || permutation[start] == start {
            continue;
        }
        let mut len = 0;
        let mut cur = start;
        while !visited[cur] {
            visited[cur] = true;
            cur = permutation[cur];
            len += 1;
        }
        if len > 0 {
            cycle_count += 1;
        }
    }

    cycle_count == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, type_name: &str, position: usize) -> ParameterInfo {
        ParameterInfo {
            name: name.to_string(),
            type_name: type_name.to_string(),
            position,
            optional: false,
            rest: false,
        }
    }

    #[test]
    fn detects_swap_with_high_confidence() {
        let old = vec![param("width", "number", 0), param("height", "number", 1)];
        let new = vec![param("height", "number", 0), param("width", "number", 1)];
        let result = detect_parameter_reordering(&old, &new);
        assert!(result.has_reordering);
        assert_eq!(result.confidence, Some(ReorderConfidence::High));
    }

    #[test]
    fn rejects_when_types_are_not_a_permutation() {
        let old = vec![param("a", "number", 0), param("b", "string", 1)];
        let new = vec![param("a", "number", 0), param("b", "boolean", 1)];
        let result = detect_parameter_reordering(&old, &new);
        assert!(!result.has_reordering);
        assert_eq!(result.summary, "types-differ");
    }

    #[test]
    fn rejects_single_parameter_rename() {
        let old = vec![param("name", "string", 0)];
        let new = vec![param("label", "string", 0)];
        let result = detect_parameter_reordering(&old, &new);
        assert!(!result.has_reordering);
        assert_eq!(result.summary, "single-parameter");
    }

    #[test]
    fn rejects_when_count_changed() {
        let old = vec![param("a", "number", 0)];
        let new = vec![param("a", "number", 0), param("b", "number", 1)];
        let result = detect_parameter_reordering(&old, &new);
        assert!(!result.has_reordering);
        assert_eq!(result.summary, "count-changed");
    }

    #[test]
    fn rejects_benign_rename_without_positional_shuffle() {
        let old = vec![
            param("userId", "number", 0),
            param("organizationId", "number", 1),
        ];
        let new = vec![
            param("userIdentifier", "number", 0),
            param("orgId", "number", 1),
        ];
        let result = detect_parameter_reordering(&old, &new);
        assert!(!result.has_reordering);
    }
}
