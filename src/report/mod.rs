//! Report renderers for definition summaries.
//!
//! - [`terminal`] — colored, tabular output with one section per component;
//!   respects `--verbose` / `--quiet`.
//! - JSON output is rendered directly in `main` via serde_json.

pub mod terminal;
