//! Configuration file support for apidiff.
//!
//! Loads an optional `apidiff.toml` from the project root or a path given
//! via `--config`. Every field mirrors a `DiffOptions`/CLI flag and only
//! overrides the built-in default when present - a missing file behaves
//! identically to no flags at all.

use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for `apidiff.toml`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ApidiffConfig {
    /// `semver-default` (default), `read-only`, or `write-only`.
    pub policy: Option<String>,
    /// Minimum rename-candidate score to accept as a rename (§4.3).
    pub rename_threshold: Option<f64>,
    /// Recursion bound for the nested-change walker (§4.5).
    pub max_nesting_depth: Option<usize>,
    /// Disable nested-change recursion entirely.
    #[serde(default)]
    pub no_nested: bool,
    /// Disable parameter-reorder detection.
    #[serde(default)]
    pub no_reorder: bool,
    /// Output format: `text` (default), `markdown`, or `json`.
    pub format: Option<String>,
}

impl ApidiffConfig {
    /// Load config from `apidiff.toml` in the given root directory.
    /// Returns the all-`None` default if the file doesn't exist or fails
    /// to parse (a parse failure is reported but not fatal - CLI flags and
    /// built-in defaults still apply).
    pub fn load(root: &Path) -> Self {
        Self::load_from_path(&root.join("apidiff.toml"))
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("[apidiff][warn] failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[apidiff][warn] failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_no_overrides() {
        let config = ApidiffConfig::default();
        assert!(config.policy.is_none());
        assert!(config.rename_threshold.is_none());
        assert!(!config.no_nested);
    }

    #[test]
    fn load_missing_file_is_default() {
        let temp = TempDir::new().expect("temp dir");
        let config = ApidiffConfig::load(temp.path());
        assert!(config.policy.is_none());
    }

    #[test]
    fn load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let config_path = temp.path().join("apidiff.toml");
        let mut file = std::fs::File::create(&config_path).expect("create config");
        writeln!(
            file,
            r#"
policy = "read-only"
rename_threshold = 0.9
max_nesting_depth = 5
no_reorder = true
"#
        )
        .expect("write config");

        let config = ApidiffConfig::load(temp.path());
        assert_eq!(config.policy.as_deref(), Some("read-only"));
        assert_eq!(config.rename_threshold, Some(0.9));
        assert_eq!(config.max_nesting_depth, Some(5));
        assert!(config.no_reorder);
        assert!(!config.no_nested);
    }

    #[test]
    fn load_empty_config_is_default() {
        let temp = TempDir::new().expect("temp dir");
        let config_path = temp.path().join("apidiff.toml");
        std::fs::File::create(&config_path).expect("create empty config");

        let config = ApidiffConfig::load(temp.path());
        assert!(config.policy.is_none());
    }
}
