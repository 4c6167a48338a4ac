//! `apidiff` CLI entry point: read two source files, diff their public API
//! surfaces, classify every change against a policy, and print a report.
//!
//! Exit codes follow the release-type verdict (§6): 0 none/patch, 1 minor,
//! 2 major, 3 forbidden, 64 on a usage or I/O error the tool can't recover
//! from.

use std::path::Path;
use std::process::ExitCode;

use apidiff::args::{self, ParsedArgs};
use apidiff::colors::Painter;
use apidiff::config::ApidiffConfig;
use apidiff::differ::{self, DiffOptions};
use apidiff::frontend::ts::{self, ParseOptions};
use apidiff::model::{ColorMode, OutputFormat};
use apidiff::progress;
use apidiff::render;
use apidiff::report;

const USAGE_ERROR: u8 = 64;

const HELP: &str = "\
apidiff - structural API diffing and semver-verdict analysis

USAGE:
    apidiff <old-file> <new-file> [OPTIONS]

OPTIONS:
    --policy <NAME>            semver-default (default), read-only, write-only
    --format <FORMAT>          text (default), markdown, json
    --rename-threshold <N>     minimum rename-candidate score, 0.0-1.0 (default 0.8)
    --max-nesting-depth <N>    recursion bound for nested changes (default 10)
    --no-nested                disable nested-change recursion
    --no-reorder               disable parameter-reorder detection
    --config <PATH>            load overrides from an apidiff.toml
    --color <MODE>             auto (default), always, never
    -v, --verbose               print progress to stderr
    -q, --quiet                  suppress non-report output
    -h, --help                   print this message
    -V, --version                print the version
";

fn main() -> ExitCode {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match args::parse_args(&raw) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("apidiff: {e}");
            eprintln!("\n{HELP}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    if parsed.show_help {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }
    if parsed.show_version {
        println!("apidiff {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    match run(parsed) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("apidiff: {e:#}");
            ExitCode::from(USAGE_ERROR)
        }
    }
}

fn run(mut parsed: ParsedArgs) -> anyhow::Result<ExitCode> {
    let (Some(old_path), Some(new_path)) = (parsed.old_file.clone(), parsed.new_file.clone()) else {
        anyhow::bail!("expected two positional arguments: <old-file> <new-file>");
    };

    apply_config_overrides(&mut parsed, &old_path);

    let painter = Painter::new(parsed.color);

    if parsed.verbose && !parsed.quiet {
        progress::info(&format!(
            "comparing {} -> {}",
            old_path.display(),
            new_path.display()
        ));
    }

    let old_source = std::fs::read_to_string(&old_path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", old_path.display()))?;
    let new_source = std::fs::read_to_string(&new_path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", new_path.display()))?;

    let parse_options = ParseOptions::default();
    let old = ts::analyze(&old_source, &parse_options);
    let new = ts::analyze(&new_source, &parse_options);

    for err in old.errors.iter().chain(new.errors.iter()) {
        if !parsed.quiet {
            progress::warning(err);
        }
    }

    let diff_options = DiffOptions {
        rename_threshold: parsed.rename_threshold,
        include_nested_changes: !parsed.no_nested,
        resolve_type_relationships: true,
        max_nesting_depth: parsed.max_nesting_depth,
        detect_parameter_reordering: !parsed.no_reorder,
    };

    let changes = differ::diff_modules(&old, &new, &diff_options);
    let policy = parsed.policy.resolve();
    let report = report::assemble(&changes, &policy);

    let rendered = match parsed.format {
        OutputFormat::Text => render::text::render(&report, &painter),
        OutputFormat::Markdown => render::markdown::render(&report),
        OutputFormat::Json => render::json::render(&report),
    };

    println!("{rendered}");

    if parsed.verbose && !parsed.quiet {
        progress::success(&format!(
            "verdict: {} ({} change{})",
            report.release_type.as_str(),
            report.stats.total,
            if report.stats.total == 1 { "" } else { "s" }
        ));
    }

    Ok(ExitCode::from(report.release_type.exit_code() as u8))
}

/// Load `apidiff.toml` (either the explicit `--config` path or
/// `<old-file's directory>/apidiff.toml`) and apply any values the CLI
/// flags didn't already override. Flags always win over config.
fn apply_config_overrides(parsed: &mut ParsedArgs, old_path: &Path) {
    let config = match &parsed.config_path {
        Some(path) => ApidiffConfig::load_from_path(path),
        None => {
            let root = old_path.parent().unwrap_or_else(|| Path::new("."));
            ApidiffConfig::load(root)
        }
    };

    if parsed.policy == args::PolicyName::default() {
        if let Some(name) = config.policy.as_deref() {
            if let Some(resolved) = match name {
                "semver-default" => Some(args::PolicyName::SemverDefault),
                "read-only" => Some(args::PolicyName::ReadOnly),
                "write-only" => Some(args::PolicyName::WriteOnly),
                _ => None,
            } {
                parsed.policy = resolved;
            }
        }
    }
    if parsed.rename_threshold == apidiff::matcher::DEFAULT_RENAME_THRESHOLD {
        if let Some(t) = config.rename_threshold {
            parsed.rename_threshold = t;
        }
    }
    if parsed.max_nesting_depth == 10 {
        if let Some(d) = config.max_nesting_depth {
            parsed.max_nesting_depth = d;
        }
    }
    if !parsed.no_nested {
        parsed.no_nested = config.no_nested;
    }
    if !parsed.no_reorder {
        parsed.no_reorder = config.no_reorder;
    }
    if parsed.format == OutputFormat::Text {
        if let Some(fmt) = config.format.as_deref() {
            parsed.format = match fmt {
                "markdown" => OutputFormat::Markdown,
                "json" => OutputFormat::Json,
                _ => OutputFormat::Text,
            };
        }
    }
    if matches!(parsed.color, ColorMode::Auto) {
        // no config knob for color; kept auto unless the CLI said otherwise
    }
}
