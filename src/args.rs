//! Hand-rolled command-line argument parsing for the `apidiff` binary.
//!
//! No `clap` - matches the style of the front-end's own ambient CLI
//! tooling: a plain `while` loop over `std::env::args()`, explicit flag
//! matching, and `strsim`-suggested corrections for unrecognized flags.

use std::path::PathBuf;

use crate::matcher::DEFAULT_RENAME_THRESHOLD;
use crate::model::{ColorMode, OutputFormat};

/// Which built-in policy to run (§4.6, §9).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyName {
    SemverDefault,
    ReadOnly,
    WriteOnly,
}

impl PolicyName {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyName::SemverDefault => "semver-default",
            PolicyName::ReadOnly => "read-only",
            PolicyName::WriteOnly => "write-only",
        }
    }

    /// Build the actual [`crate::policy::Policy`] this name refers to.
    pub fn resolve(self) -> crate::policy::Policy {
        match self {
            PolicyName::SemverDefault => crate::policy::builtin::semver_default(),
            PolicyName::ReadOnly => crate::policy::builtin::read_only(),
            PolicyName::WriteOnly => crate::policy::builtin::write_only(),
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "semver-default" => Some(PolicyName::SemverDefault),
            "read-only" => Some(PolicyName::ReadOnly),
            "write-only" => Some(PolicyName::WriteOnly),
            _ => None,
        }
    }
}

impl Default for PolicyName {
    fn default() -> Self {
        PolicyName::SemverDefault
    }
}

/// Parsed CLI invocation, mirroring the surface documented in
/// SPEC_FULL.md §6.
#[derive(Clone, Debug)]
pub struct ParsedArgs {
    pub old_file: Option<PathBuf>,
    pub new_file: Option<PathBuf>,
    pub policy: PolicyName,
    pub format: OutputFormat,
    pub rename_threshold: f64,
    pub max_nesting_depth: usize,
    pub no_nested: bool,
    pub no_reorder: bool,
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
    pub color: ColorMode,
    pub show_help: bool,
    pub show_version: bool,
}

impl Default for ParsedArgs {
    fn default() -> Self {
        Self {
            old_file: None,
            new_file: None,
            policy: PolicyName::default(),
            format: OutputFormat::Text,
            rename_threshold: DEFAULT_RENAME_THRESHOLD,
            max_nesting_depth: 10,
            no_nested: false,
            no_reorder: false,
            config_path: None,
            verbose: false,
            quiet: false,
            color: ColorMode::Auto,
            show_help: false,
            show_version: false,
        }
    }
}

const KNOWN_FLAGS: &[&str] = &[
    "--policy",
    "--format",
    "--rename-threshold",
    "--max-nesting-depth",
    "--no-nested",
    "--no-reorder",
    "--config",
    "--verbose",
    "--quiet",
    "--color",
    "--help",
    "--version",
];

/// Parse CLI arguments (excluding argv[0]). Returns a human-readable error
/// - including a "did you mean" suggestion via `strsim` for unrecognized
/// flags - rather than panicking, so the binary can print it and exit 64.
pub fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut parsed = ParsedArgs::default();
    let mut positionals = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" | "-h" => parsed.show_help = true,
            "--version" | "-V" => parsed.show_version = true,
            "--verbose" | "-v" => parsed.verbose = true,
            "--quiet" | "-q" => parsed.quiet = true,
            "--no-nested" => parsed.no_nested = true,
            "--no-reorder" => parsed.no_reorder = true,
            "--policy" => {
                let value = next_value(args, &mut i, "--policy")?;
                parsed.policy = PolicyName::parse(&value)
                    .ok_or_else(|| format!("unknown policy `{value}` (expected semver-default, read-only, or write-only)"))?;
            }
            "--format" => {
                let value = next_value(args, &mut i, "--format")?;
                parsed.format = match value.as_str() {
                    "text" => OutputFormat::Text,
                    "markdown" => OutputFormat::Markdown,
                    "json" => OutputFormat::Json,
                    other => return Err(format!("unknown format `{other}` (expected text, markdown, or json)")),
                };
            }
            "--rename-threshold" => {
                let value = next_value(args, &mut i, "--rename-threshold")?;
                parsed.rename_threshold = value
                    .parse()
                    .map_err(|_| format!("--rename-threshold expects a number, got `{value}`"))?;
            }
            "--max-nesting-depth" => {
                let value = next_value(args, &mut i, "--max-nesting-depth")?;
                parsed.max_nesting_depth = value
                    .parse()
                    .map_err(|_| format!("--max-nesting-depth expects an integer, got `{value}`"))?;
            }
            "--config" => {
                let value = next_value(args, &mut i, "--config")?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--color" => {
                let value = next_value(args, &mut i, "--color")?;
                parsed.color = match value.as_str() {
                    "auto" => ColorMode::Auto,
                    "always" => ColorMode::Always,
                    "never" => ColorMode::Never,
                    other => return Err(format!("unknown color mode `{other}` (expected auto, always, or never)")),
                };
            }
            other if other.starts_with('-') => {
                return Err(unrecognized_flag_error(other));
            }
            other => positionals.push(PathBuf::from(other)),
        }
        i += 1;
    }

    if !positionals.is_empty() {
        parsed.old_file = positionals.first().cloned();
    }
    if positionals.len() > 1 {
        parsed.new_file = positionals.get(1).cloned();
    }

    Ok(parsed)
}

fn next_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{flag} expects a value"))
}

fn unrecognized_flag_error(flag: &str) -> String {
    let suggestion = KNOWN_FLAGS
        .iter()
        .map(|candidate| (*candidate, strsim::jaro_winkler(flag, candidate)))
        .filter(|(_, score)| *score > 0.7)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate);

    match suggestion {
        Some(candidate) => format!("unrecognized flag `{flag}` - did you mean `{candidate}`?"),
        None => format!("unrecognized flag `{flag}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_positional_files() {
        let parsed = parse_args(&args(&["old.ts", "new.ts"])).unwrap();
        assert_eq!(parsed.old_file, Some(PathBuf::from("old.ts")));
        assert_eq!(parsed.new_file, Some(PathBuf::from("new.ts")));
    }

    #[test]
    fn parses_policy_and_format_flags() {
        let parsed = parse_args(&args(&[
            "old.ts", "new.ts", "--policy", "read-only", "--format", "json",
        ]))
        .unwrap();
        assert_eq!(parsed.policy, PolicyName::ReadOnly);
        assert_eq!(parsed.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = parse_args(&args(&["old.ts", "new.ts", "--policy", "bogus"])).unwrap_err();
        assert!(err.contains("unknown policy"));
    }

    #[test]
    fn suggests_close_flag_on_typo() {
        let err = parse_args(&args(&["old.ts", "new.ts", "--polcy", "major"])).unwrap_err();
        assert!(err.contains("did you mean `--policy`"));
    }

    #[test]
    fn no_nested_and_no_reorder_are_boolean_flags() {
        let parsed = parse_args(&args(&["old.ts", "new.ts", "--no-nested", "--no-reorder"])).unwrap();
        assert!(parsed.no_nested);
        assert!(parsed.no_reorder);
    }
}
