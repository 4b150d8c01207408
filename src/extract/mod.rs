//! Named-entity extraction and domain categorization.
//!
//! Entity annotation is a pluggable capability: anything implementing
//! [`Annotator`] (rule-based, statistical, or a remote model) can back
//! [`extract_entities`]. The core's own job is only deduplication per label
//! while preserving first-occurrence order. Categorization is pure keyword
//! matching over the configured category lexicons.

pub mod rule_based;

use std::collections::BTreeMap;

use anyhow::Result;

use crate::config::Lexicon;

/// A labelled span produced by an annotator.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    /// Entity-type label (spaCy-style: `GPE`, `ORG`, `DATE`, …).
    pub label: String,
    /// Surface string as it appeared in the text.
    pub text: String,
    /// Byte offset of the span start, used for document ordering.
    pub start: usize,
}

/// The entity-annotation capability required from the host.
///
/// Invoked synchronously and treated as a black box; implementations are
/// expected to be bounded-latency. Failures surface as
/// [`crate::models::AnalysisError::AnnotatorFailure`] at the engine boundary.
pub trait Annotator {
    fn annotate(&self, text: &str) -> Result<Vec<EntitySpan>>;
}

/// Group annotator spans by label, deduplicating surface strings while
/// preserving first-seen document order within each label.
pub fn extract_entities(
    annotator: &dyn Annotator,
    text: &str,
) -> Result<BTreeMap<String, Vec<String>>> {
    let mut spans = annotator.annotate(text)?;
    spans.sort_by_key(|s| s.start);

    let mut entities: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for span in spans {
        let values = entities.entry(span.label).or_default();
        if !values.contains(&span.text) {
            values.push(span.text);
        }
    }
    Ok(entities)
}

/// Categorize a text against the category lexicons.
///
/// A category is included iff any of its keywords occurs as a substring of
/// the lowercased text. Never returns an empty list: `["general"]` when
/// nothing matched.
pub fn categorize(categories: &[Lexicon], text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    let mut matched: Vec<String> = categories
        .iter()
        .filter(|lex| lex.keywords.iter().any(|kw| lower.contains(kw.as_str())))
        .map(|lex| lex.name.clone())
        .collect();

    if matched.is_empty() {
        matched.push("general".to_string());
    }
    matched
}

/// Tag the supply-chain segments a text touches. Unlike [`categorize`] this
/// has no fallback; a text may touch no segment at all.
pub fn identify_segments(segments: &[Lexicon], text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    segments
        .iter()
        .filter(|lex| lex.keywords.iter().any(|kw| lower.contains(kw.as_str())))
        .map(|lex| lex.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    struct FakeAnnotator(Vec<EntitySpan>);

    impl Annotator for FakeAnnotator {
        fn annotate(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            Ok(self.0.clone())
        }
    }

    struct FailingAnnotator;

    impl Annotator for FailingAnnotator {
        fn annotate(&self, _text: &str) -> Result<Vec<EntitySpan>> {
            anyhow::bail!("model not loaded")
        }
    }

    fn span(label: &str, text: &str, start: usize) -> EntitySpan {
        EntitySpan {
            label: label.to_string(),
            text: text.to_string(),
            start,
        }
    }

    #[test]
    fn test_extract_dedupes_preserving_first_seen_order() {
        let annotator = FakeAnnotator(vec![
            span("GPE", "Rotterdam", 40),
            span("GPE", "Shanghai", 10),
            span("GPE", "Shanghai", 60),
            span("ORG", "Acme Logistics", 0),
        ]);
        let entities = extract_entities(&annotator, "whatever").unwrap();
        assert_eq!(entities["GPE"], vec!["Shanghai", "Rotterdam"]);
        assert_eq!(entities["ORG"], vec!["Acme Logistics"]);
    }

    #[test]
    fn test_extract_propagates_annotator_failure() {
        assert!(extract_entities(&FailingAnnotator, "text").is_err());
    }

    #[test]
    fn test_categorize_worked_example() {
        let cfg = Config::default();
        // "shipping" → logistics; no other category keyword present
        let cats = categorize(&cfg.categories, "Port congestion delays shipping");
        assert_eq!(cats, vec!["logistics"]);
    }

    #[test]
    fn test_categorize_multiple_matches() {
        let cfg = Config::default();
        let cats = categorize(
            &cfg.categories,
            "Factory production costs rise as freight rates spike",
        );
        assert!(cats.contains(&"logistics".to_string()));
        assert!(cats.contains(&"manufacturing".to_string()));
        assert!(cats.contains(&"financial".to_string()));
    }

    #[test]
    fn test_categorize_never_empty() {
        let cfg = Config::default();
        assert_eq!(categorize(&cfg.categories, "nothing relevant here"), vec!["general"]);
        assert_eq!(categorize(&cfg.categories, ""), vec!["general"]);
    }

    #[test]
    fn test_identify_segments_no_fallback() {
        let cfg = Config::default();
        assert!(identify_segments(&cfg.segments, "nothing relevant").is_empty());
        let tags = identify_segments(&cfg.segments, "Vessel stuck outside the port");
        assert_eq!(tags, vec!["Maritime"]);
    }
}
