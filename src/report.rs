//! Report assembler (§4.7): buckets classified changes by release type and
//! computes the summary stats the JSON schema and CLI exit code both read.
//!
//! Classification happens once per change, recursively including nested
//! changes, so a change whose own descriptor is `equivalent` at the top
//! level (it only exists to carry nested member changes) still lets its
//! nested verdicts bubble into the overall aggregate.

use crate::model::ApiChange;
use crate::policy::{aggregate, Policy, ReleaseType};
use serde::Serialize;

/// One change plus the verdict a policy assigned it, with its nested
/// changes classified the same way.
#[derive(Clone, Debug)]
pub struct Classification {
    pub change: ApiChange,
    pub release_type: ReleaseType,
    pub matched_rule: Option<&'static str>,
    pub rationale: &'static str,
    pub nested: Vec<Classification>,
}

impl Classification {
    /// Depth-first flattening, mirroring [`ApiChange::flatten`] - used to
    /// fold nested verdicts into the overall aggregate.
    pub fn flatten(&self) -> Vec<&Classification> {
        let mut out = vec![self];
        for n in &self.nested {
            out.extend(n.flatten());
        }
        out
    }
}

fn classify_change(policy: &Policy, change: &ApiChange) -> Classification {
    let is_nested = change.context.is_nested;
    let m = policy.classify(&change.descriptor, change.node_kind, is_nested);
    let nested = change
        .nested_changes
        .iter()
        .map(|n| classify_change(policy, n))
        .collect();
    Classification {
        change: change.clone(),
        release_type: m.release_type,
        matched_rule: m.matched_rule,
        rationale: m.rationale,
        nested,
    }
}

/// Per-severity counts over top-level changes. `total` is the top-level
/// change count (§8 invariant 2), not the flattened count including nested
/// changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub forbidden: usize,
    pub major: usize,
    pub minor: usize,
    pub patch: usize,
    pub none: usize,
}

impl Stats {
    fn bump(&mut self, release_type: ReleaseType) {
        self.total += 1;
        match release_type {
            ReleaseType::Forbidden => self.forbidden += 1,
            ReleaseType::Major => self.major += 1,
            ReleaseType::Minor => self.minor += 1,
            ReleaseType::Patch => self.patch += 1,
            ReleaseType::None => self.none += 1,
        }
    }
}

/// The assembled report: overall verdict, stats, and every top-level change
/// with its classification (and its nested changes', recursively).
#[derive(Clone, Debug)]
pub struct Report {
    pub release_type: ReleaseType,
    pub stats: Stats,
    pub classifications: Vec<Classification>,
}

impl Report {
    /// Top-level classifications whose own verdict is `release_type`, in
    /// differ order - the grouping the JSON `changes` object and the text/
    /// markdown renderers both iterate over.
    pub fn bucket(&self, release_type: ReleaseType) -> Vec<&Classification> {
        self.classifications
            .iter()
            .filter(|c| c.release_type == release_type)
            .collect()
    }
}

/// Classify every change against `policy` and assemble the report.
pub fn assemble(changes: &[ApiChange], policy: &Policy) -> Report {
    let classifications: Vec<Classification> =
        changes.iter().map(|c| classify_change(policy, c)).collect();

    let mut stats = Stats::default();
    for c in &classifications {
        stats.bump(c.release_type);
    }

    let all_release_types = classifications
        .iter()
        .flat_map(|c| c.flatten())
        .map(|c| c.release_type);
    let release_type = aggregate(all_release_types);

    Report {
        release_type,
        stats,
        classifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Action, ChangeContext, ChangeDescriptor, ChangeTag, NodeKind, Target,
    };
    use crate::policy::builtin::semver_default;

    fn change(descriptor: ChangeDescriptor, path: &str, nested: Vec<ApiChange>) -> ApiChange {
        let has_nested = !nested.is_empty();
        ApiChange {
            descriptor: if has_nested {
                descriptor.with_tag(ChangeTag::HasNestedChanges)
            } else {
                descriptor
            },
            path: path.to_string(),
            node_kind: NodeKind::Class,
            old_location: None,
            new_location: None,
            old_node: None,
            new_node: None,
            nested_changes: nested,
            context: ChangeContext::default(),
            explanation: String::new(),
        }
    }

    #[test]
    fn stats_total_counts_top_level_only() {
        let changes = vec![
            change(ChangeDescriptor::new(Target::Export, Action::Added), "a", Vec::new()),
            change(ChangeDescriptor::new(Target::Export, Action::Removed), "b", Vec::new()),
        ];
        let report = assemble(&changes, &semver_default());
        assert_eq!(report.stats.total, 2);
    }

    #[test]
    fn nested_severity_bubbles_into_overall_aggregate() {
        let nested_major = change(
            ChangeDescriptor::new(Target::Method, Action::Removed).tagged(ChangeTag::IsNestedChange),
            "Widget.render",
            Vec::new(),
        );
        let outer = change(
            crate::model::ChangeDescriptor::modified(
                Target::Export,
                crate::model::Aspect::Type,
                crate::model::Impact::Equivalent,
            ),
            "Widget",
            vec![nested_major],
        );
        let report = assemble(&[outer], &semver_default());
        assert_eq!(report.release_type, ReleaseType::Major);
        // the outer change itself is equivalent, so it still buckets under
        // whatever its own (non-major) verdict is, not under major.
        assert!(report.bucket(ReleaseType::Major).is_empty());
    }

    #[test]
    fn bucket_returns_changes_matching_release_type() {
        let changes = vec![change(
            ChangeDescriptor::new(Target::Export, Action::Removed),
            "gone",
            Vec::new(),
        )];
        let report = assemble(&changes, &semver_default());
        let major = report.bucket(ReleaseType::Major);
        assert_eq!(major.len(), 1);
        assert_eq!(major[0].change.path, "gone");
    }
}
