use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Utc;

use crate::config::Config;
use crate::extract::{self, rule_based::RuleAnnotator, Annotator};
use crate::models::{
    AnalysisError, AssessmentData, AssessmentMeta, AssessmentReport, BatchOutcome, BatchRecord,
    OverallAssessment, SupplyChainData, TextAssessment,
};
use crate::score::lexicon;
use crate::score::severity::classify_strict;

use super::{
    geo, route, supplier, Baseline, ConfidenceEstimator, RegionEstimator, RouteEstimator,
    SupplierEstimator,
};

/// Age of the freshest input the engine works from. Advisory metadata until
/// real signal feeds exist.
const DATA_FRESHNESS: &str = "5 minutes";

/// The risk assessment engine: text scoring, batch scoring, and the full
/// weighted supply-chain assessment.
///
/// All lexicons come in through [`Config`]; the annotator and all four
/// estimators are injected, so every analysis is pure given its inputs.
/// The engine holds no mutable state and nothing is cached between calls.
pub struct RiskEngine {
    config: Config,
    annotator: Box<dyn Annotator>,
    route_estimator: Box<dyn RouteEstimator>,
    supplier_estimator: Box<dyn SupplierEstimator>,
    region_estimator: Box<dyn RegionEstimator>,
    confidence_estimator: Box<dyn ConfidenceEstimator>,
}

impl RiskEngine {
    /// Engine with the bundled rule-based annotator (gazetteer seeded from
    /// the configured locations and regions) and baseline estimators.
    pub fn new(config: Config) -> Result<Self> {
        let places: Vec<String> = config
            .regions
            .keys()
            .chain(config.regions.values())
            .cloned()
            .collect();
        let annotator = RuleAnnotator::new(places)?;

        Ok(Self::with_parts(
            config,
            Box::new(annotator),
            Box::new(Baseline),
            Box::new(Baseline),
            Box::new(Baseline),
            Box::new(Baseline),
        ))
    }

    /// Fully injected constructor for tests and real signal feeds.
    pub fn with_parts(
        config: Config,
        annotator: Box<dyn Annotator>,
        route_estimator: Box<dyn RouteEstimator>,
        supplier_estimator: Box<dyn SupplierEstimator>,
        region_estimator: Box<dyn RegionEstimator>,
        confidence_estimator: Box<dyn ConfidenceEstimator>,
    ) -> Self {
        RiskEngine {
            config,
            annotator,
            route_estimator,
            supplier_estimator,
            region_estimator,
            confidence_estimator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lexicon risk score for a text, in `[0, 1]`.
    pub fn score_text(&self, text: &str) -> f64 {
        lexicon::score(&self.config.risk_keywords, text)
    }

    /// Category names for a text; never empty.
    pub fn categorize(&self, text: &str) -> Vec<String> {
        extract::categorize(&self.config.categories, text)
    }

    /// Supply-chain segments touched by a text; may be empty.
    pub fn segments(&self, text: &str) -> Vec<String> {
        extract::identify_segments(&self.config.segments, text)
    }

    /// Named entities grouped by label, deduplicated in first-seen order.
    pub fn entities(&self, text: &str) -> Result<BTreeMap<String, Vec<String>>, AnalysisError> {
        extract::extract_entities(self.annotator.as_ref(), text)
            .map_err(|e| AnalysisError::AnnotatorFailure(e.to_string()))
    }

    /// Score one text item. Uses the strict severity scheme — this is the
    /// article/API-analysis path.
    pub fn analyze_text(&self, text: &str) -> Result<TextAssessment, AnalysisError> {
        let risk_score = self.score_text(text);
        Ok(TextAssessment {
            risk_score,
            risk_level: classify_strict(risk_score),
            entities: self.entities(text)?,
            categories: self.categorize(text),
        })
    }

    /// Score many texts, preserving order. Failures are isolated per item:
    /// a record carries either the assessment or an error message, and
    /// `total_analyzed` counts only the successes.
    pub fn analyze_batch(&self, texts: &[String]) -> BatchOutcome {
        let mut results = Vec::with_capacity(texts.len());
        let mut total_analyzed = 0;

        for text in texts {
            match self.analyze_text(text) {
                Ok(assessment) => {
                    total_analyzed += 1;
                    results.push(BatchRecord {
                        text: text.clone(),
                        assessment: Some(assessment),
                        error: None,
                    });
                }
                Err(e) => results.push(BatchRecord {
                    text: text.clone(),
                    assessment: None,
                    error: Some(e.to_string()),
                }),
            }
        }

        BatchOutcome {
            results,
            total_analyzed,
        }
    }

    /// Run the full supply-chain assessment. Any failure in any stage yields
    /// the error envelope; the caller never sees a partial assessment.
    pub fn assess(&self, data: &SupplyChainData) -> AssessmentReport {
        match self.try_assess(data) {
            Ok(assessment) => AssessmentReport::Success {
                data: Box::new(assessment),
            },
            Err(e) => AssessmentReport::Error {
                message: format!("Failed to analyze risks: {}", e),
            },
        }
    }

    fn try_assess(&self, data: &SupplyChainData) -> Result<AssessmentData, AnalysisError> {
        validate(data)?;

        let route_analysis = route::analyze_routes(self.route_estimator.as_ref(), &data.routes);
        let supplier_analysis =
            supplier::analyze_suppliers(self.supplier_estimator.as_ref(), &data.suppliers);
        let geo_analysis = geo::analyze_regions(
            self.region_estimator.as_ref(),
            &self.config.regions,
            &data.routes,
            &data.suppliers,
        );

        // Weighted combination: routes carry the operational weight,
        // suppliers the financial weight. Deliberately not normalized to 1.
        let weights = &self.config.weights;
        let overall_risk_score = route_analysis.risk_score * weights.operational
            + supplier_analysis.risk_score * weights.financial
            + geo_analysis.risk_score * weights.geopolitical;

        if !overall_risk_score.is_finite() {
            return Err(AnalysisError::ComputationFailure(
                "overall risk score is not finite".to_string(),
            ));
        }

        // Factor order is part of the contract: geopolitical, route, supplier
        let mut risk_factors = geo_analysis.risk_factors;
        risk_factors.extend(route_analysis.risk_factors);
        risk_factors.extend(supplier_analysis.risk_factors);

        let confidence_score = self.confidence_estimator.confidence(
            &data.routes,
            &data.suppliers,
            &data.time_window,
        );

        Ok(AssessmentData {
            risk_assessment: OverallAssessment {
                overall_risk_score,
                risk_factors,
                route_analysis: route_analysis.routes,
                supplier_risks: supplier_analysis.suppliers,
                confidence_score,
            },
            meta: AssessmentMeta {
                analysis_timestamp: Utc::now(),
                data_freshness: DATA_FRESHNESS.to_string(),
            },
        })
    }
}

fn validate(data: &SupplyChainData) -> Result<(), AnalysisError> {
    for (i, route) in data.routes.iter().enumerate() {
        if route.origin.is_empty() || route.destination.is_empty() {
            return Err(AnalysisError::InvalidInput(format!(
                "route #{} is missing an origin or destination",
                i
            )));
        }
    }
    for (i, supplier) in data.suppliers.iter().enumerate() {
        if supplier.id.is_empty() {
            return Err(AnalysisError::InvalidInput(format!(
                "supplier #{} is missing an id",
                i
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntitySpan;
    use crate::models::{FactorKind, RiskLevel, Route, Supplier};

    fn engine() -> RiskEngine {
        RiskEngine::new(Config::default()).unwrap()
    }

    fn route(origin: &str, destination: &str) -> Route {
        Route {
            origin: origin.to_string(),
            destination: destination.to_string(),
            signals: Default::default(),
        }
    }

    fn supplier(id: &str, location: &str) -> Supplier {
        Supplier {
            id: id.to_string(),
            location: location.to_string(),
            signals: Default::default(),
        }
    }

    fn assessment(report: AssessmentReport) -> AssessmentData {
        match report {
            AssessmentReport::Success { data } => *data,
            AssessmentReport::Error { message } => panic!("unexpected error: {}", message),
        }
    }

    #[test]
    fn test_analyze_text_worked_example() {
        let result = engine()
            .analyze_text("This is a critical shortage requiring urgent action")
            .unwrap();
        assert!((result.risk_score - 2.4 / 2.7).abs() < 1e-9);
        // 0.888… ≥ 0.7 → High under the strict scheme
        assert_eq!(result.risk_level, RiskLevel::High);
        // No category keyword in this text
        assert_eq!(result.categories, vec!["general"]);
    }

    #[test]
    fn test_analyze_text_no_keywords() {
        let result = engine().analyze_text("calm seas ahead").unwrap();
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.categories, vec!["general"]);
        assert!(result.entities.is_empty());
    }

    #[test]
    fn test_analyze_text_extracts_gazetteer_entities() {
        let result = engine()
            .analyze_text("Severe congestion in Shanghai delays cargo to Rotterdam")
            .unwrap();
        assert_eq!(result.entities["GPE"], vec!["Shanghai", "Rotterdam"]);
        assert!(result.categories.contains(&"logistics".to_string()));
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        struct Flaky;
        impl Annotator for Flaky {
            fn annotate(&self, text: &str) -> Result<Vec<EntitySpan>> {
                if text.contains("poison") {
                    anyhow::bail!("annotator crashed")
                }
                Ok(Vec::new())
            }
        }
        let engine = RiskEngine::with_parts(
            Config::default(),
            Box::new(Flaky),
            Box::new(Baseline),
            Box::new(Baseline),
            Box::new(Baseline),
            Box::new(Baseline),
        );

        let texts = vec![
            "minor delay".to_string(),
            "poison pill".to_string(),
            "severe disruption".to_string(),
        ];
        let outcome = engine.analyze_batch(&texts);

        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.total_analyzed, 2);
        assert!(outcome.results[0].assessment.is_some());
        assert!(outcome.results[1].assessment.is_none());
        assert!(outcome.results[1].error.as_ref().unwrap().contains("annotator"));
        assert!(outcome.results[2].assessment.is_some());
    }

    #[test]
    fn test_batch_empty_input() {
        let outcome = engine().analyze_batch(&[]);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.total_analyzed, 0);
    }

    #[test]
    fn test_assess_empty_payload() {
        let data = assessment(engine().assess(&SupplyChainData::default()));
        let ra = data.risk_assessment;
        assert_eq!(ra.overall_risk_score, 0.0);
        assert!(ra.risk_factors.is_empty());
        assert!(ra.route_analysis.is_empty());
        assert!(ra.supplier_risks.is_empty());
        assert!((ra.confidence_score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_assess_baseline_weighted_combination() {
        let data = SupplyChainData {
            routes: vec![route("Shanghai", "Rotterdam")],
            suppliers: vec![supplier("SUP-001", "Dubai")],
            time_window: Default::default(),
        };
        let result = assessment(engine().assess(&data));
        let ra = result.risk_assessment;

        // route 0.4, supplier 0.4, regions {Asia, Europe, Middle East} all
        // 0.6 → geo 0.6; overall = 0.4*0.3 + 0.4*0.2 + 0.6*0.3 = 0.38
        assert!((ra.overall_risk_score - 0.38).abs() < 1e-9);
        assert_eq!(ra.route_analysis.len(), 1);
        assert_eq!(ra.supplier_risks.len(), 1);
        // Baseline region risk sits exactly at the 0.6 threshold: silent
        assert!(ra.risk_factors.is_empty());
        assert_eq!(result.meta.data_freshness, "5 minutes");
    }

    #[test]
    fn test_assess_factor_ordering() {
        struct Hot;
        impl RouteEstimator for Hot {
            fn congestion(&self, _: &Route) -> f64 {
                0.8
            }
            fn weather(&self, _: &Route) -> f64 {
                0.8
            }
            fn delay(&self, _: &Route) -> f64 {
                0.8
            }
        }
        impl SupplierEstimator for Hot {
            fn financial(&self, _: &Supplier) -> f64 {
                0.9
            }
            fn operational(&self, _: &Supplier) -> f64 {
                0.9
            }
            fn location(&self, _: &Supplier) -> f64 {
                0.9
            }
        }
        impl RegionEstimator for Hot {
            fn region_risk(&self, _: &str) -> f64 {
                0.95
            }
        }

        let engine = RiskEngine::with_parts(
            Config::default(),
            Box::new(RuleAnnotator::new(["Shanghai"]).unwrap()),
            Box::new(Hot),
            Box::new(Hot),
            Box::new(Hot),
            Box::new(Baseline),
        );
        let data = SupplyChainData {
            routes: vec![route("Shanghai", "Rotterdam")],
            suppliers: vec![supplier("SUP-001", "Dubai")],
            time_window: Default::default(),
        };
        let ra = assessment(engine.assess(&data)).risk_assessment;

        // geopolitical (2 regions from the route + 1 from the supplier),
        // then route, then supplier
        let kinds: Vec<FactorKind> = ra.risk_factors.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FactorKind::Geopolitical,
                FactorKind::Geopolitical,
                FactorKind::Geopolitical,
                FactorKind::Operational,
                FactorKind::Supplier,
            ]
        );
        // High composite route gets an alternative
        assert_eq!(ra.route_analysis[0].alternative_routes.len(), 1);
    }

    #[test]
    fn test_assess_invalid_input_yields_error_envelope() {
        let data = SupplyChainData {
            routes: vec![route("", "Rotterdam")],
            ..Default::default()
        };
        match engine().assess(&data) {
            AssessmentReport::Error { message } => {
                assert!(message.contains("invalid input"), "{}", message);
            }
            AssessmentReport::Success { .. } => panic!("expected error envelope"),
        }
    }

    #[test]
    fn test_assess_non_finite_estimate_is_computation_failure() {
        struct Broken;
        impl RegionEstimator for Broken {
            fn region_risk(&self, _: &str) -> f64 {
                f64::NAN
            }
        }
        let engine = RiskEngine::with_parts(
            Config::default(),
            Box::new(RuleAnnotator::new(["Shanghai"]).unwrap()),
            Box::new(Baseline),
            Box::new(Baseline),
            Box::new(Broken),
            Box::new(Baseline),
        );
        let data = SupplyChainData {
            routes: vec![route("Shanghai", "Rotterdam")],
            ..Default::default()
        };
        match engine.assess(&data) {
            AssessmentReport::Error { message } => {
                assert!(message.contains("computation failure"), "{}", message);
            }
            AssessmentReport::Success { .. } => panic!("expected error envelope"),
        }
    }
}
