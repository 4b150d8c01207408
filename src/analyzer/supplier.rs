use crate::models::{FactorKind, RiskFactor, Supplier, SupplierRiskResult};
use crate::score::severity::classify_inclusive;

use super::SupplierEstimator;

/// Composite supplier risk above which a supplier risk factor is surfaced.
const SUPPLIER_FACTOR_THRESHOLD: f64 = 0.7;

#[derive(Debug)]
pub struct SupplierAnalysis {
    pub suppliers: Vec<SupplierRiskResult>,
    pub risk_factors: Vec<RiskFactor>,
    /// Mean composite over all suppliers; 0 for empty input.
    pub risk_score: f64,
}

/// Analyze all suppliers: composite = mean(financial, operational, location)
/// per supplier, classified with the assessment-internal scheme.
pub fn analyze_suppliers(
    estimator: &dyn SupplierEstimator,
    suppliers: &[Supplier],
) -> SupplierAnalysis {
    let mut analyzed = Vec::with_capacity(suppliers.len());
    let mut risk_factors = Vec::new();
    let mut total_risk_score = 0.0;

    for supplier in suppliers {
        let financial = estimator.financial(supplier);
        let operational = estimator.operational(supplier);
        let location = estimator.location(supplier);

        let composite = (financial + operational + location) / 3.0;
        total_risk_score += composite;

        analyzed.push(SupplierRiskResult {
            supplier_id: supplier.id.clone(),
            risk_level: classify_inclusive(composite),
            factors: identify_risk_factors(supplier),
            mitigation_strategies: generate_mitigations(supplier),
        });

        if composite > SUPPLIER_FACTOR_THRESHOLD {
            risk_factors.push(RiskFactor {
                kind: FactorKind::Supplier,
                score: composite,
                description: format!("High risk supplier: {}", supplier.id),
                impacted_segments: None,
            });
        }
    }

    let risk_score = if suppliers.is_empty() {
        0.0
    } else {
        total_risk_score / suppliers.len() as f64
    };

    SupplierAnalysis {
        suppliers: analyzed,
        risk_factors,
        risk_score,
    }
}

fn identify_risk_factors(_supplier: &Supplier) -> Vec<String> {
    vec![
        "Regional power shortages".to_string(),
        "Labor issues".to_string(),
    ]
}

fn generate_mitigations(supplier: &Supplier) -> Vec<String> {
    vec![
        format!(
            "Identify backup suppliers in {}",
            suggest_alternative_location(supplier)
        ),
        "Increase inventory buffer".to_string(),
    ]
}

/// Suggested sourcing fallback. A real implementation would weigh region
/// risk against the supplier's commodity profile.
fn suggest_alternative_location(_supplier: &Supplier) -> &'static str {
    "Vietnam"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use std::collections::BTreeMap;

    struct Scripted {
        financial: f64,
        operational: f64,
        location: f64,
    }

    impl SupplierEstimator for Scripted {
        fn financial(&self, _: &Supplier) -> f64 {
            self.financial
        }
        fn operational(&self, _: &Supplier) -> f64 {
            self.operational
        }
        fn location(&self, _: &Supplier) -> f64 {
            self.location
        }
    }

    fn supplier(id: &str, location: &str) -> Supplier {
        Supplier {
            id: id.to_string(),
            location: location.to_string(),
            signals: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_suppliers_scores_zero() {
        let analysis = analyze_suppliers(&super::super::Baseline, &[]);
        assert_eq!(analysis.risk_score, 0.0);
        assert!(analysis.suppliers.is_empty());
        assert!(analysis.risk_factors.is_empty());
    }

    #[test]
    fn test_baseline_composite_is_medium() {
        // (0.5 + 0.4 + 0.3) / 3 = 0.4 → Medium
        let analysis =
            analyze_suppliers(&super::super::Baseline, &[supplier("SUP-001", "Shanghai")]);
        assert!((analysis.risk_score - 0.4).abs() < 1e-9);

        let result = &analysis.suppliers[0];
        assert_eq!(result.supplier_id, "SUP-001");
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.factors, vec!["Regional power shortages", "Labor issues"]);
        assert_eq!(
            result.mitigation_strategies,
            vec![
                "Identify backup suppliers in Vietnam".to_string(),
                "Increase inventory buffer".to_string(),
            ]
        );
        assert!(analysis.risk_factors.is_empty());
    }

    #[test]
    fn test_high_composite_emits_supplier_factor() {
        let estimator = Scripted {
            financial: 0.9,
            operational: 0.8,
            location: 0.7,
        };
        let analysis = analyze_suppliers(&estimator, &[supplier("SUP-002", "Dubai")]);

        assert_eq!(analysis.risk_factors.len(), 1);
        let factor = &analysis.risk_factors[0];
        assert_eq!(factor.kind, FactorKind::Supplier);
        assert_eq!(factor.description, "High risk supplier: SUP-002");
        assert!((factor.score - 0.8).abs() < 1e-9);
        assert_eq!(analysis.suppliers[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn test_no_factor_at_exactly_point_seven() {
        let estimator = Scripted {
            financial: 0.7,
            operational: 0.7,
            location: 0.7,
        };
        let analysis = analyze_suppliers(&estimator, &[supplier("SUP-003", "Rotterdam")]);
        assert!(analysis.risk_factors.is_empty());
    }

    #[test]
    fn test_aggregate_is_mean_over_suppliers() {
        let analysis = analyze_suppliers(
            &super::super::Baseline,
            &[supplier("A", "Shanghai"), supplier("B", "Dubai")],
        );
        assert!((analysis.risk_score - 0.4).abs() < 1e-9);
        assert_eq!(analysis.suppliers.len(), 2);
    }
}
