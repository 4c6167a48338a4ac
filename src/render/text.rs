//! Human-readable terminal report (§4.7), colorized via [`crate::colors`]
//! when the caller's [`Painter`] has colors enabled.

use crate::colors::Painter;
use crate::policy::ReleaseType;
use crate::report::{Classification, Report};

const SEVERITIES: [ReleaseType; 5] = [
    ReleaseType::Forbidden,
    ReleaseType::Major,
    ReleaseType::Minor,
    ReleaseType::Patch,
    ReleaseType::None,
];

fn paint_severity(painter: &Painter, release_type: ReleaseType, s: &str) -> String {
    match release_type {
        ReleaseType::Forbidden => painter.forbidden(s),
        ReleaseType::Major => painter.major(s),
        ReleaseType::Minor => painter.minor(s),
        ReleaseType::Patch => painter.patch(s),
        ReleaseType::None => painter.none(s),
    }
}

fn write_classification(out: &mut String, painter: &Painter, c: &Classification, indent: usize) {
    let pad = "  ".repeat(indent);
    let marker = match c.change.descriptor.action {
        crate::model::Action::Added => "+",
        crate::model::Action::Removed => "-",
        crate::model::Action::Renamed => "~",
        crate::model::Action::Reordered => "<>",
        crate::model::Action::Modified => "*",
    };
    out.push_str(&format!(
        "{pad}{} {} {}\n",
        paint_severity(painter, c.release_type, marker),
        painter.path(&c.change.path),
        painter.dim(&c.change.explanation),
    ));
    for nested in &c.nested {
        write_classification(out, painter, nested, indent + 1);
    }
}

/// Render `report` as plain text, bucketed by release type in severity
/// order, each bucket only printed when non-empty.
pub fn render(report: &Report, painter: &Painter) -> String {
    let mut out = String::new();
    out.push_str(&painter.header("apidiff report\n"));

    for severity in SEVERITIES {
        let bucket = report.bucket(severity);
        if bucket.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "\n{} ({})\n",
            paint_severity(painter, severity, severity.as_str().to_uppercase().as_str()),
            bucket.len()
        ));
        for c in bucket {
            write_classification(&mut out, painter, c, 0);
        }
    }

    out.push_str(&format!(
        "\n{}: {}\n",
        painter.header("overall verdict"),
        paint_severity(painter, report.release_type, report.release_type.as_str())
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, AnalyzableNode, ChangeContext, ChangeDescriptor, NodeKind, Target};
    use crate::policy::builtin::semver_default;

    #[test]
    fn renders_overall_verdict_line() {
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
        let rendered = render(&report, &Painter::new(crate::model::ColorMode::Never));
        assert!(rendered.contains("greet"));
        assert!(rendered.contains("overall verdict: major"));
    }

    #[test]
    fn empty_report_still_prints_none_verdict() {
        let report = crate::report::assemble(&[], &semver_default());
        let rendered = render(&report, &Painter::new(crate::model::ColorMode::Never));
        assert!(rendered.contains("overall verdict: none"));
    }
}
