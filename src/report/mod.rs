//! Report renderers for risk assessments and news analysis.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects
//!   `--verbose` / `--quiet`.
//! - [`pdf`] — assessment report with cover page and factor/route/supplier
//!   detail.

pub mod pdf;
pub mod terminal;
