//! Pure, language-independent string-similarity utilities.
//!
//! Used by rename detection (§4.3) and by [`crate::param_analysis`] for
//! parameter-name comparisons. Nothing here touches the analyzer model -
//! these functions operate on plain strings so they stay trivially testable
//! and reusable across both purposes.

use crate::model::normalize_whitespace;

/// Classical Levenshtein distance with unit insert/delete/substitute costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut d = vec![vec![0; b_len + 1]; a_len + 1];

    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, val) in d[0].iter_mut().enumerate() {
        *val = j;
    }

    for (i, ca) in a.chars().enumerate() {
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            d[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(d[i][j + 1] + 1, d[i + 1][j] + 1),
                d[i][j] + cost,
            );
        }
    }

    d[a_len][b_len]
}

/// Plain edit-distance-normalized similarity in `[0, 1]`, with no special
/// casing. Used for signature comparison (§4.3), where `1.0`/`0.95` equality
/// shortcuts are applied by the caller before falling back to this.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let dist = edit_distance(a, b);
    let max_len = std::cmp::max(a.chars().count(), b.chars().count());
    if max_len == 0 {
        1.0
    } else {
        1.0 - (dist as f64 / max_len as f64)
    }
}

/// The rename detector's 0.4-weighted signature term: `1` if byte-equal,
/// `0.95` if equal once whitespace is normalized, else edit-distance
/// similarity.
pub fn signature_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if normalize_whitespace(a) == normalize_whitespace(b) {
        return 0.95;
    }
    string_similarity(a, b).max(0.0)
}

/// Name similarity per §4.2: `1` iff equal, `0.95` iff equal
/// case-insensitively, otherwise edit-distance similarity floored at `0`
/// with a prefix-abbreviation bonus: when one name is a non-trivial prefix
/// of the other, raise the score to at least `0.6`.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.eq_ignore_ascii_case(b) {
        return 0.95;
    }

    let base = string_similarity(a, b).max(0.0);

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let is_abbreviation = shorter.chars().count() >= 2
        && longer
            .to_lowercase()
            .starts_with(&shorter.to_lowercase());

    if is_abbreviation {
        base.max(0.6)
    } else {
        base
    }
}

/// How a name changed, in human terms - used to build explanation text and
/// to help the classifier distinguish a "rename" from "completely
/// different identifier, same kind" when scoring candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameChangeKind {
    Unchanged,
    CaseChangeOnly,
    AbbreviationExpansion,
    AbbreviationContraction,
    CompletelyDifferentName,
    MinorRewording,
}

/// Classify a name change given its precomputed similarity score.
pub fn interpret_name_change(old: &str, new: &str, score: f64) -> NameChangeKind {
    if old == new {
        return NameChangeKind::Unchanged;
    }
    if old.eq_ignore_ascii_case(new) {
        return NameChangeKind::CaseChangeOnly;
    }

    let old_len = old.chars().count();
    let new_len = new.chars().count();
    let old_lower = old.to_lowercase();
    let new_lower = new.to_lowercase();

    if new_len > old_len && new_lower.starts_with(&old_lower) {
        return NameChangeKind::AbbreviationExpansion;
    }
    if old_len > new_len && old_lower.starts_with(&new_lower) {
        return NameChangeKind::AbbreviationContraction;
    }

    if score >= 0.5 {
        NameChangeKind::MinorRewording
    } else {
        NameChangeKind::CompletelyDifferentName
    }
}
