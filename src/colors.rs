//! Terminal color utilities for CLI output.
//!
//! Provides ANSI color codes and semantic helpers for consistent
//! colorized output across the text renderer and CLI diagnostics.

use std::io::IsTerminal;

use crate::model::ColorMode;

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";

pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

pub const BRIGHT_RED: &str = "\x1b[91m";
pub const BRIGHT_CYAN: &str = "\x1b[96m";

/// Determines if colors should be used based on `ColorMode` and terminal detection.
pub fn is_enabled(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Colorizer passed around to the text renderer's format functions.
#[derive(Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            enabled: is_enabled(mode),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Forbidden verdicts, removals - bright red
    pub fn forbidden(&self, s: &str) -> String {
        self.wrap(s, BRIGHT_RED)
    }

    /// Major verdicts - red
    pub fn major(&self, s: &str) -> String {
        self.wrap(s, RED)
    }

    /// Minor verdicts - yellow
    pub fn minor(&self, s: &str) -> String {
        self.wrap(s, YELLOW)
    }

    /// Patch verdicts, additions - green
    pub fn patch(&self, s: &str) -> String {
        self.wrap(s, GREEN)
    }

    /// None verdict, unchanged - dim
    pub fn none(&self, s: &str) -> String {
        self.wrap(s, DIM)
    }

    /// Symbol paths - cyan
    pub fn path(&self, s: &str) -> String {
        self.wrap(s, CYAN)
    }

    /// Section headers - bold
    pub fn header(&self, s: &str) -> String {
        self.wrap(s, BOLD)
    }

    /// Secondary detail, explanations - dim
    pub fn dim(&self, s: &str) -> String {
        self.wrap(s, DIM)
    }

    /// Identifiers - magenta
    pub fn symbol(&self, s: &str) -> String {
        self.wrap(s, MAGENTA)
    }

    /// Counts - bright cyan
    pub fn number(&self, n: impl std::fmt::Display) -> String {
        self.wrap(&n.to_string(), BRIGHT_CYAN)
    }

    pub fn wrap(&self, s: &str, code: &str) -> String {
        if self.enabled {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painter_disabled_passes_through() {
        let p = Painter { enabled: false };
        assert_eq!(p.major("test"), "test");
        assert_eq!(p.patch("test"), "test");
        assert_eq!(p.path("test"), "test");
    }

    #[test]
    fn painter_enabled_wraps_in_ansi() {
        let p = Painter { enabled: true };
        assert_eq!(p.major("test"), "\x1b[31mtest\x1b[0m");
        assert_eq!(p.patch("test"), "\x1b[32mtest\x1b[0m");
        assert_eq!(p.path("test"), "\x1b[36mtest\x1b[0m");
    }

    #[test]
    fn color_mode_detection() {
        assert!(is_enabled(ColorMode::Always));
        assert!(!is_enabled(ColorMode::Never));
    }
}
