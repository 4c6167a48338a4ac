//! apidiff - structural API diffing and semver-verdict analysis.
//!
//! Given two versions of a typed module's public surface, apidiff builds a
//! normalized structural model of each ([`model`]), matches and classifies
//! every change between them ([`matcher`], [`classifier`], [`walker`],
//! [`differ`]), and runs the result through a rule-based policy engine
//! ([`policy`]) to produce a release-type verdict plus a precisely-located
//! explanation for every change ([`report`]).
//!
//! The pipeline end to end:
//!
//! ```text
//! source text --[frontend]--> ModuleAnalysis --[differ]--> Vec<ApiChange>
//!                                                                |
//!                                      [policy] -------> Report <'
//! ```
//!
//! [`analyze`] wires the whole thing together for front ends that just want
//! a verdict; each stage is also public for callers who need to intervene
//! (swap in a real type checker, inspect the raw change list, apply a
//! custom policy).

pub mod args;
pub mod checker;
pub mod classifier;
pub mod colors;
pub mod config;
pub mod differ;
pub mod frontend;
pub mod matcher;
pub mod model;
pub mod param_analysis;
pub mod policy;
pub mod progress;
pub mod render;
pub mod report;
pub mod similarity;
pub mod walker;

pub use differ::DiffOptions;
pub use frontend::ts::ParseOptions;
pub use model::ModuleAnalysis;
pub use policy::{Policy, ReleaseType};
pub use report::Report;

/// Analyze two source strings and assemble a full [`Report`] against a
/// given policy, using the default front end and the string-heuristic
/// type checker.
///
/// This is the one-call path: parse both sources, diff them, classify
/// every change. Callers who already have a `ModuleAnalysis` (e.g. because
/// they parsed once and are re-diffing against multiple policies) should
/// call [`differ::diff_modules`] and [`report::assemble`] directly instead.
pub fn analyze(
    old_source: &str,
    new_source: &str,
    policy: &Policy,
    diff_options: &DiffOptions,
) -> Report {
    let parse_options = ParseOptions::default();
    let old = frontend::ts::analyze(old_source, &parse_options);
    let new = frontend::ts::analyze(new_source, &parse_options);
    let changes = differ::diff_modules(&old, &new, diff_options);
    report::assemble(&changes, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::builtin::semver_default;

    #[test]
    fn analyze_flags_a_removed_export_as_major() {
        let old = "export function greet(name: string): string { return name; }";
        let new = "";
        let report = analyze(old, new, &semver_default(), &DiffOptions::default());
        assert_eq!(report.release_type, ReleaseType::Major);
    }

    #[test]
    fn analyze_is_clean_on_identical_sources() {
        let src = "export interface Config { timeout: number; }";
        let report = analyze(src, src, &semver_default(), &DiffOptions::default());
        assert_eq!(report.release_type, ReleaseType::None);
        assert_eq!(report.stats.total, 0);
    }

    #[test]
    fn analyze_flags_an_added_export_as_minor() {
        let old = "export function greet(name: string): string { return name; }";
        let new = "export function greet(name: string): string { return name; }\nexport function farewell(name: string): string { return name; }";
        let report = analyze(old, new, &semver_default(), &DiffOptions::default());
        assert_eq!(report.release_type, ReleaseType::Minor);
    }
}
