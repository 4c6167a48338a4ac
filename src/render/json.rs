//! The stable JSON report (§6). This is the literal schema downstream
//! tooling parses, so field names and nesting are pinned with
//! `#[serde(rename_all = "camelCase")]` rather than left to derive defaults.

use serde::Serialize;

use crate::model::{Action, Aspect, Impact, NodeKind, Position, SourceRange, Target};
use crate::policy::ReleaseType;
use crate::report::{Classification, Report};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PositionJson {
    line: usize,
    column: usize,
}

impl From<Position> for PositionJson {
    fn from(p: Position) -> Self {
        Self {
            line: p.line,
            column: p.column,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationJson {
    start: PositionJson,
    end: PositionJson,
}

impl From<SourceRange> for LocationJson {
    fn from(r: SourceRange) -> Self {
        Self {
            start: r.start.into(),
            end: r.end.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangeJson {
    path: String,
    change_kind: String,
    target: Target,
    action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect: Option<Aspect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    impact: Option<Impact>,
    node_kind: NodeKind,
    release_type: ReleaseType,
    explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_location: Option<LocationJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_location: Option<LocationJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    nested_changes: Vec<ChangeJson>,
}

fn change_json(classification: &Classification) -> ChangeJson {
    let change = &classification.change;
    ChangeJson {
        path: change.path.clone(),
        change_kind: change.descriptor.change_kind(),
        target: change.descriptor.target,
        action: change.descriptor.action,
        aspect: change.descriptor.aspect,
        impact: change.descriptor.impact,
        node_kind: change.node_kind,
        release_type: classification.release_type,
        explanation: change.explanation.clone(),
        old_location: change.old_location.map(Into::into),
        new_location: change.new_location.map(Into::into),
        old_signature: change.old_node.as_ref().map(|n| n.type_info.signature.clone()),
        new_signature: change.new_node.as_ref().map(|n| n.type_info.signature.clone()),
        nested_changes: classification.nested.iter().map(change_json).collect(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketsJson {
    forbidden: Vec<ChangeJson>,
    major: Vec<ChangeJson>,
    minor: Vec<ChangeJson>,
    patch: Vec<ChangeJson>,
    none: Vec<ChangeJson>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportJson {
    release_type: ReleaseType,
    stats: crate::report::Stats,
    changes: BucketsJson,
}

/// Render `report` as the pinned JSON schema, pretty-printed and newline
/// terminated. Bucket order within each severity follows differ order
/// (§5), matching [`Report::bucket`].
pub fn render(report: &Report) -> String {
    let bucket = |rt: ReleaseType| report.bucket(rt).into_iter().map(change_json).collect();
    let doc = ReportJson {
        release_type: report.release_type,
        stats: report.stats,
        changes: BucketsJson {
            forbidden: bucket(ReleaseType::Forbidden),
            major: bucket(ReleaseType::Major),
            minor: bucket(ReleaseType::Minor),
            patch: bucket(ReleaseType::Patch),
            none: bucket(ReleaseType::None),
        },
    };
    serde_json::to_string_pretty(&doc).unwrap_or_else(|e| {
        format!(r#"{{"error": "failed to serialize report: {e}"}}"#)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, AnalyzableNode, ChangeContext, ChangeDescriptor, NodeKind, Target};
    use crate::policy::builtin::semver_default;

    #[test]
    fn renders_stable_schema_shape() {
        let change = crate::model::ApiChange {
            descriptor: ChangeDescriptor::new(Target::Export, Action::Removed),
            path: "greet".to_string(),
            node_kind: NodeKind::Function,
            old_location: None,
            new_location: None,
            old_node: Some(AnalyzableNode::new("greet", "greet", NodeKind::Function)),
            new_node: None,
            nested_changes: Vec::new(),
            context: ChangeContext::default(),
            explanation: "export `greet` was removed".to_string(),
        };
        let report = crate::report::assemble(&[change], &semver_default());
        let json = render(&report);
        assert!(json.contains("\"releaseType\": \"major\""));
        assert!(json.contains("\"changeKind\": \"export:removed\""));
        assert!(json.contains("\"path\": \"greet\""));
    }

    #[test]
    fn empty_report_has_zero_stats() {
        let report = crate::report::assemble(&[], &semver_default());
        let json = render(&report);
        assert!(json.contains("\"total\": 0"));
        assert!(json.contains("\"releaseType\": \"none\""));
    }
}
