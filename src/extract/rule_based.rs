use anyhow::Result;
use regex::Regex;

use super::{Annotator, EntitySpan};

/// Rule-based annotator: regex patterns for date/money/percent/organization
/// mentions plus a gazetteer for geopolitical entities, labelled with the
/// same spaCy-style tags a statistical model would emit.
pub struct RuleAnnotator {
    patterns: Vec<(&'static str, Regex)>,
    gazetteer: Option<Regex>,
}

const DATE_PATTERN: &str = r"\b\d{4}-\d{2}-\d{2}\b|\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:,\s*\d{4})?\b";
const MONEY_PATTERN: &str = r"\$\d+(?:[,.]\d+)*(?:\s*(?:million|billion|trillion))?";
const PERCENT_PATTERN: &str = r"\b\d+(?:\.\d+)?\s?%";
const ORG_PATTERN: &str = r"\b[A-Z][A-Za-z&]+(?:\s+[A-Z][A-Za-z&]+)*\s+(?:Inc|Corp|Ltd|LLC|Group|Lines|Logistics|Shipping)\b";

impl RuleAnnotator {
    /// Build an annotator whose GPE gazetteer covers the given place names
    /// (typically the configured locations and their regions).
    pub fn new<I, S>(places: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = vec![
            ("DATE", Regex::new(DATE_PATTERN)?),
            ("MONEY", Regex::new(MONEY_PATTERN)?),
            ("PERCENT", Regex::new(PERCENT_PATTERN)?),
            ("ORG", Regex::new(ORG_PATTERN)?),
        ];

        // Longest alternatives first so "Middle East" wins over "East"
        let mut names: Vec<String> = places
            .into_iter()
            .map(|p| regex::escape(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        names.dedup();

        let gazetteer = if names.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b(?:{})\b", names.join("|")))?)
        };

        Ok(RuleAnnotator { patterns, gazetteer })
    }
}

impl Annotator for RuleAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let mut spans = Vec::new();

        for (label, pattern) in &self.patterns {
            for m in pattern.find_iter(text) {
                spans.push(EntitySpan {
                    label: label.to_string(),
                    text: m.as_str().to_string(),
                    start: m.start(),
                });
            }
        }

        if let Some(gazetteer) = &self.gazetteer {
            for m in gazetteer.find_iter(text) {
                spans.push(EntitySpan {
                    label: "GPE".to_string(),
                    text: m.as_str().to_string(),
                    start: m.start(),
                });
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_entities;

    fn annotator() -> RuleAnnotator {
        RuleAnnotator::new(["Shanghai", "Rotterdam", "Singapore", "Dubai", "Middle East"]).unwrap()
    }

    #[test]
    fn test_gazetteer_locations() {
        let entities = extract_entities(
            &annotator(),
            "Congestion from Shanghai to Rotterdam worsened; Shanghai port closed.",
        )
        .unwrap();
        assert_eq!(entities["GPE"], vec!["Shanghai", "Rotterdam"]);
    }

    #[test]
    fn test_multi_word_place_beats_prefix() {
        let entities = extract_entities(&annotator(), "Tensions in the Middle East").unwrap();
        assert_eq!(entities["GPE"], vec!["Middle East"]);
    }

    #[test]
    fn test_dates_money_percent() {
        let entities = extract_entities(
            &annotator(),
            "On 2024-03-15 freight rates rose 15% adding $2.4 million in costs",
        )
        .unwrap();
        assert_eq!(entities["DATE"], vec!["2024-03-15"]);
        assert_eq!(entities["PERCENT"], vec!["15%"]);
        assert_eq!(entities["MONEY"], vec!["$2.4 million"]);
    }

    #[test]
    fn test_month_name_dates() {
        let entities =
            extract_entities(&annotator(), "Strike announced for March 3, 2024").unwrap();
        assert_eq!(entities["DATE"], vec!["March 3, 2024"]);
    }

    #[test]
    fn test_organization_suffixes() {
        let entities = extract_entities(
            &annotator(),
            "Evergreen Lines and Acme Logistics reported delays",
        )
        .unwrap();
        assert_eq!(entities["ORG"], vec!["Evergreen Lines", "Acme Logistics"]);
    }

    #[test]
    fn test_empty_gazetteer_is_fine() {
        let annotator = RuleAnnotator::new(Vec::<String>::new()).unwrap();
        let spans = annotator.annotate("No places configured in Shanghai").unwrap();
        assert!(spans.iter().all(|s| s.label != "GPE"));
    }
}
