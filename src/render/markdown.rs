//! Markdown report renderer (§4.7) - same bucketing as the text renderer,
//! formatted for a CI check summary or a PR comment.

use crate::policy::ReleaseType;
use crate::report::{Classification, Report};

const SEVERITIES: [ReleaseType; 5] = [
    ReleaseType::Forbidden,
    ReleaseType::Major,
    ReleaseType::Minor,
    ReleaseType::Patch,
    ReleaseType::None,
];

fn write_classification(out: &mut String, c: &Classification, indent: usize) {
    let pad = "  ".repeat(indent);
    out.push_str(&format!(
        "{pad}- `{}` ({:?}/{:?}) - {}\n",
        c.change.path, c.change.descriptor.action, c.change.descriptor.target, c.change.explanation
    ));
    for nested in &c.nested {
        write_classification(out, nested, indent + 1);
    }
}

/// Render `report` as a Markdown document: a verdict heading, a stats
/// table, then one section per non-empty severity bucket.
pub fn render(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# apidiff report: **{}**\n\n",
        report.release_type.as_str()
    ));
    out.push_str("| forbidden | major | minor | patch | none | total |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} | {} | {} |\n\n",
        report.stats.forbidden,
        report.stats.major,
        report.stats.minor,
        report.stats.patch,
        report.stats.none,
        report.stats.total
    ));

    for severity in SEVERITIES {
        let bucket = report.bucket(severity);
        if bucket.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "## {}\n\n",
            capitalize(severity.as_str())
        ));
        for c in bucket {
            write_classification(&mut out, c, 0);
        }
        out.push('\n');
    }

    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, AnalyzableNode, ChangeContext, ChangeDescriptor, NodeKind, Target};
    use crate::policy::builtin::semver_default;

    #[test]
    fn renders_heading_and_table() {
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
        let rendered = render(&report);
        assert!(rendered.starts_with("# apidiff report: **major**"));
        assert!(rendered.contains("## Major"));
        assert!(rendered.contains("`greet`"));
    }
}
