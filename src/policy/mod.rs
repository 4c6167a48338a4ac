//! The declarative rule-based policy engine (§4.6).
//!
//! A [`Policy`] is an ordered list of [`Rule`]s plus a default
//! [`ReleaseType`]. Each rule is a conjunction of optional matchers over a
//! [`ChangeDescriptor`]; the first rule whose matchers all hold wins.
//! Authoring policies as plain data (rather than code) is what lets a
//! policy later be loaded from a config file or composed programmatically
//! (§9 design notes) without touching the engine itself.

pub mod builtin;

use crate::model::{Action, Aspect, ChangeDescriptor, ChangeTag, Impact, NodeKind, Target};
use std::cmp::Ordering;

/// The semver-flavored verdict a rule (or the policy default) assigns to a
/// single change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    // Ordered so that `max` over a `Vec<ReleaseType>` is the aggregate
    // verdict (§8 invariant 7): None < Patch < Minor < Major < Forbidden.
    None,
    Patch,
    Minor,
    Major,
    Forbidden,
}

impl ReleaseType {
    pub fn exit_code(self) -> i32 {
        match self {
            ReleaseType::None | ReleaseType::Patch => 0,
            ReleaseType::Minor => 1,
            ReleaseType::Major => 2,
            ReleaseType::Forbidden => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseType::Forbidden => "forbidden",
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
            ReleaseType::None => "none",
        }
    }
}

/// A single matcher clause. `None` means "wildcard, always matches".
#[derive(Clone, Debug, Default)]
pub struct RuleMatchers {
    pub target: Option<Target>,
    pub action: Option<Action>,
    pub aspect: Option<Aspect>,
    pub impact: Option<Impact>,
    pub has_tag: Option<ChangeTag>,
    pub not_tag: Option<ChangeTag>,
    pub node_kind: Option<NodeKind>,
    pub nested: Option<bool>,
}

/// One rule: all specified matchers must hold (AND) for it to fire.
pub struct Rule {
    pub name: &'static str,
    pub matchers: RuleMatchers,
    pub release_type: ReleaseType,
    pub rationale: &'static str,
}

impl Rule {
    fn matches(&self, descriptor: &ChangeDescriptor, node_kind: NodeKind, is_nested: bool) -> bool {
        let m = &self.matchers;
        opt_eq(m.target, descriptor.target)
            && opt_eq(m.action, descriptor.action)
            && opt_eq(m.aspect, descriptor.aspect)
            && opt_eq(m.impact, descriptor.impact)
            && m.has_tag.is_none_or(|t| descriptor.tags.contains(&t))
            && m.not_tag.is_none_or(|t| !descriptor.tags.contains(&t))
            && opt_eq(m.node_kind, node_kind)
            && m.nested.is_none_or(|n| n == is_nested)
    }
}

fn opt_eq<T: PartialEq>(want: Option<T>, have: T) -> bool {
    want.is_none_or(|w| w == have)
}

/// Ordered rule list plus default verdict. Evaluation is first-match-wins;
/// a change that matches no rule gets `default`.
pub struct Policy {
    pub name: &'static str,
    pub rules: Vec<Rule>,
    pub default: ReleaseType,
}

/// The result of classifying one change against a policy.
pub struct RuleMatch {
    pub release_type: ReleaseType,
    pub matched_rule: Option<&'static str>,
    pub rationale: &'static str,
}

impl Policy {
    /// Evaluate one descriptor. `node_kind`/`is_nested` come from the
    /// owning `ApiChange`.
    pub fn classify(&self, descriptor: &ChangeDescriptor, node_kind: NodeKind, is_nested: bool) -> RuleMatch {
        for rule in &self.rules {
            if rule.matches(descriptor, node_kind, is_nested) {
                return RuleMatch {
                    release_type: rule.release_type,
                    matched_rule: Some(rule.name),
                    rationale: rule.rationale,
                };
            }
        }
        RuleMatch {
            release_type: self.default,
            matched_rule: None,
            rationale: "no rule matched; policy default applied",
        }
    }
}

/// Aggregate verdict: maximum severity over all per-change verdicts (§4.6,
/// §8 invariant 7). An empty change list aggregates to `none`.
pub fn aggregate(release_types: impl IntoIterator<Item = ReleaseType>) -> ReleaseType {
    release_types
        .into_iter()
        .max_by(|a, b| a.cmp(b))
        .unwrap_or(ReleaseType::None)
}

/// `Ordering` helper kept for call sites that want an explicit comparator
/// instead of relying on `Ord`.
pub fn compare_severity(a: ReleaseType, b: ReleaseType) -> Ordering {
    a.cmp(&b)
}
