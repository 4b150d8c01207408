use std::collections::BTreeMap;

/// Best-case weight a single keyword match can contribute; the normalization
/// divisor for the final score.
const MAX_KEYWORD_WEIGHT: f64 = 0.9;

/// Score a text against the risk keyword table.
///
/// The text is lowercased and each keyword is matched as a substring. The
/// result is `min(1.0, total_weight / (matches * 0.9))` — the accumulated
/// weight normalized by the best-case average per match — or `0.0` when no
/// keyword matched at all. Several low-weight matches can therefore still
/// saturate the score. Pure and deterministic: same input, same output.
pub fn score(keywords: &BTreeMap<String, f64>, text: &str) -> f64 {
    let lower = text.to_lowercase();

    let mut total_weight = 0.0;
    let mut matches = 0u32;

    for (keyword, weight) in keywords {
        if lower.contains(keyword.as_str()) {
            total_weight += weight;
            matches += 1;
        }
    }

    if matches == 0 {
        return 0.0;
    }
    (total_weight / (matches as f64 * MAX_KEYWORD_WEIGHT)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn keywords() -> BTreeMap<String, f64> {
        Config::default().risk_keywords
    }

    #[test]
    fn test_no_keyword_scores_zero() {
        assert_eq!(score(&keywords(), "calm seas and clear skies"), 0.0);
        assert_eq!(score(&keywords(), ""), 0.0);
    }

    #[test]
    fn test_worked_example() {
        // critical (0.9) + shortage (0.7) + urgent (0.8) = 2.4 over 3 matches
        let s = score(&keywords(), "This is a critical shortage requiring urgent action");
        assert!((s - 2.4 / 2.7).abs() < 1e-9, "got {}", s);
    }

    #[test]
    fn test_single_max_weight_keyword_saturates() {
        // One 0.9 match normalizes to exactly 1.0
        assert!((score(&keywords(), "critical") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_to_one() {
        // "high" alone saturates; adding more keywords must never exceed 1.0
        let s = score(&keywords(), "high severe critical disruption");
        assert!(s <= 1.0);
    }

    #[test]
    fn test_score_bounds() {
        let texts = [
            "minor concern at the warehouse",
            "potential delay",
            "low",
            "severe critical urgent warning disruption shortage issue problem",
        ];
        for text in texts {
            let s = score(&keywords(), text);
            assert!((0.0..=1.0).contains(&s), "{} out of bounds: {}", text, s);
        }
    }

    #[test]
    fn test_substring_matching_is_case_insensitive() {
        let a = score(&keywords(), "CRITICAL DELAY");
        let b = score(&keywords(), "critical delay");
        assert!((a - b).abs() < 1e-12);
    }
}
