//! Deterministic report renderers (§4.7, §6 JSON schema).
//!
//! Each renderer is a pure function over a [`crate::report::Report`]; none
//! of them touch the filesystem or a terminal directly, so the CLI is the
//! only place that decides where the bytes go. [`json::render`] produces
//! the literal schema from spec.md §6 - it's the stable contract downstream
//! tools parse, so its shape is not allowed to drift independently of the
//! other two.

pub mod json;
pub mod markdown;
pub mod text;
