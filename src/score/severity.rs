use crate::models::RiskLevel;

/// Bucket a score using the article-analysis thresholds: `< 0.3` → Low,
/// `< 0.7` → Medium, else High.
///
/// Kept separate from [`classify_inclusive`] on purpose. The two schemes
/// disagree on `[0.3, 0.4)` (strict: Medium, inclusive: Low) and at exactly
/// `0.7` (both High, but via different comparisons), and their call sites
/// assume those exact cut points. Merging them would silently change
/// reported levels.
pub fn classify_strict(score: f64) -> RiskLevel {
    if score < 0.3 {
        RiskLevel::Low
    } else if score < 0.7 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Bucket a score using the assessment-internal thresholds: `>= 0.7` → High,
/// `>= 0.4` → Medium, else Low.
pub fn classify_inclusive(score: f64) -> RiskLevel {
    if score >= 0.7 {
        RiskLevel::High
    } else if score >= 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
