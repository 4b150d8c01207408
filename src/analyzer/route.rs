use crate::models::{AlternativeRoute, FactorKind, RiskFactor, RiskLevel, Route, RouteRiskResult};
use crate::score::severity::classify_inclusive;

use super::RouteEstimator;

/// Composite route risk above which an alternative route is synthesized.
const ALTERNATIVE_THRESHOLD: f64 = 0.7;
/// Congestion sub-score above which an operational risk factor is surfaced,
/// regardless of the composite.
const CONGESTION_FACTOR_THRESHOLD: f64 = 0.7;

#[derive(Debug)]
pub struct RouteAnalysis {
    pub routes: Vec<RouteRiskResult>,
    pub risk_factors: Vec<RiskFactor>,
    /// Mean composite over all routes; 0 for empty input ("no risk data",
    /// not "no risk").
    pub risk_score: f64,
}

/// Analyze all routes: composite = mean(congestion, weather, delay) per
/// route, classified with the assessment-internal scheme.
pub fn analyze_routes(estimator: &dyn RouteEstimator, routes: &[Route]) -> RouteAnalysis {
    let mut analyzed = Vec::with_capacity(routes.len());
    let mut risk_factors = Vec::new();
    let mut total_risk_score = 0.0;

    for route in routes {
        let congestion = estimator.congestion(route);
        let weather = estimator.weather(route);
        let delay = estimator.delay(route);

        let composite = (congestion + weather + delay) / 3.0;
        total_risk_score += composite;

        let alternatives = if composite > ALTERNATIVE_THRESHOLD {
            generate_alternatives(route)
        } else {
            Vec::new()
        };

        analyzed.push(RouteRiskResult {
            route_id: route.route_id(),
            risk_level: classify_inclusive(composite),
            bottlenecks: identify_bottlenecks(route),
            alternative_routes: alternatives,
        });

        if congestion > CONGESTION_FACTOR_THRESHOLD {
            risk_factors.push(RiskFactor {
                kind: FactorKind::Operational,
                score: congestion,
                description: format!(
                    "High congestion risk on {} route",
                    route.route_id()
                ),
                impacted_segments: None,
            });
        }
    }

    let risk_score = if routes.is_empty() {
        0.0
    } else {
        total_risk_score / routes.len() as f64
    };

    RouteAnalysis {
        routes: analyzed,
        risk_factors,
        risk_score,
    }
}

fn identify_bottlenecks(route: &Route) -> Vec<String> {
    vec![format!("Port congestion in {}", route.origin)]
}

/// Reroute through the Singapore–Suez corridor at a fixed time and cost
/// penalty. A real planner would consult a route graph here.
fn generate_alternatives(route: &Route) -> Vec<AlternativeRoute> {
    vec![AlternativeRoute {
        path: format!("{}-Singapore-Suez-{}", route.origin, route.destination),
        risk_level: RiskLevel::Medium,
        additional_time: "3 days".to_string(),
        additional_cost: "+15%".to_string(),
    }]
}
