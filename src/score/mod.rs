//! Deterministic text risk scoring.
//!
//! - [`lexicon`] — weighted keyword scoring over the configured risk lexicon.
//! - [`severity`] — score → [`crate::models::RiskLevel`] bucketing, in two
//!   named threshold schemes whose call sites differ.

pub mod lexicon;
pub mod severity;
