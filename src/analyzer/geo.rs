use std::collections::BTreeMap;

use crate::models::{FactorKind, RiskFactor, Route, Supplier};

use super::RegionEstimator;

/// Region risk above which a geopolitical factor is surfaced. Strict: the
/// baseline constant of 0.6 emits nothing on its own.
const REGION_FACTOR_THRESHOLD: f64 = 0.6;

#[derive(Debug)]
pub struct GeoAnalysis {
    pub risk_factors: Vec<RiskFactor>,
    /// Mean region risk over all touched regions; 0 when nothing maps.
    pub risk_score: f64,
}

/// Resolve a location to its region. Total by construction: anything absent
/// from the map is "Unknown", so region grouping can never fail on an
/// unmapped location.
pub fn region_of<'a>(regions: &'a BTreeMap<String, String>, location: &str) -> &'a str {
    regions.get(location).map(String::as_str).unwrap_or("Unknown")
}

/// Analyze geopolitical risk across every region touched by a route endpoint
/// or supplier location.
pub fn analyze_regions(
    estimator: &dyn RegionEstimator,
    regions: &BTreeMap<String, String>,
    routes: &[Route],
    suppliers: &[Supplier],
) -> GeoAnalysis {
    let touched = touched_regions(regions, routes, suppliers);

    let mut risk_factors = Vec::new();
    let mut total_risk_score = 0.0;

    for region in &touched {
        let score = estimator.region_risk(region);
        total_risk_score += score;

        if score > REGION_FACTOR_THRESHOLD {
            risk_factors.push(RiskFactor {
                kind: FactorKind::Geopolitical,
                score,
                description: format!("Elevated geopolitical risk in {}", region),
                impacted_segments: Some(impacted_segments(region, regions, routes)),
            });
        }
    }

    let risk_score = if touched.is_empty() {
        0.0
    } else {
        total_risk_score / touched.len() as f64
    };

    GeoAnalysis {
        risk_factors,
        risk_score,
    }
}

/// Distinct regions in first-seen order: route origins and destinations
/// first, then supplier locations.
fn touched_regions(
    regions: &BTreeMap<String, String>,
    routes: &[Route],
    suppliers: &[Supplier],
) -> Vec<String> {
    let mut touched: Vec<String> = Vec::new();
    let mut push = |region: &str| {
        if !touched.iter().any(|r| r == region) {
            touched.push(region.to_string());
        }
    };

    for route in routes {
        push(region_of(regions, &route.origin));
        push(region_of(regions, &route.destination));
    }
    for supplier in suppliers {
        push(region_of(regions, &supplier.location));
    }
    touched
}

/// Every route with an endpoint in the region, rendered as
/// `"{origin}-{destination} route"`.
fn impacted_segments(
    region: &str,
    regions: &BTreeMap<String, String>,
    routes: &[Route],
) -> Vec<String> {
    routes
        .iter()
        .filter(|route| {
            region_of(regions, &route.origin) == region
                || region_of(regions, &route.destination) == region
        })
        .map(|route| format!("{} route", route.route_id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    struct Scripted(f64);

    impl RegionEstimator for Scripted {
        fn region_risk(&self, _region: &str) -> f64 {
            self.0
        }
    }

    /// Risk varies per region so factor emission can be targeted.
    struct PerRegion;

    impl RegionEstimator for PerRegion {
        fn region_risk(&self, region: &str) -> f64 {
            match region {
                "Asia" => 0.8,
                "Europe" => 0.2,
                _ => 0.5,
            }
        }
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

    #[test]
    fn test_region_lookup_is_total() {
        let regions = Config::default().regions;
        assert_eq!(region_of(&regions, "Shanghai"), "Asia");
        assert_eq!(region_of(&regions, "Atlantis"), "Unknown");
        assert_eq!(region_of(&regions, ""), "Unknown");
    }

    #[test]
    fn test_no_inputs_scores_zero() {
        let regions = Config::default().regions;
        let analysis = analyze_regions(&Scripted(0.9), &regions, &[], &[]);
        assert_eq!(analysis.risk_score, 0.0);
        assert!(analysis.risk_factors.is_empty());
    }

    #[test]
    fn test_regions_deduplicated() {
        let regions = Config::default().regions;
        // Shanghai and Singapore both map to Asia; one region, counted once
        let analysis = analyze_regions(
            &Scripted(0.5),
            &regions,
            &[route("Shanghai", "Singapore")],
            &[supplier("S1", "Shanghai")],
        );
        assert!((analysis.risk_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_point_six_emits_no_factor() {
        let regions = Config::default().regions;
        let analysis = analyze_regions(
            &super::super::Baseline,
            &regions,
            &[route("Shanghai", "Rotterdam")],
            &[],
        );
        // Threshold is strict; 0.6 exactly stays silent
        assert!(analysis.risk_factors.is_empty());
        assert!((analysis.risk_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_elevated_region_emits_factor_with_segments() {
        let regions = Config::default().regions;
        let routes = [
            route("Shanghai", "Rotterdam"),
            route("Singapore", "Dubai"),
            route("Rotterdam", "Dubai"),
        ];
        let analysis = analyze_regions(&PerRegion, &regions, &routes, &[]);

        let asia: Vec<_> = analysis
            .risk_factors
            .iter()
            .filter(|f| f.description == "Elevated geopolitical risk in Asia")
            .collect();
        assert_eq!(asia.len(), 1);
        assert_eq!(asia[0].kind, FactorKind::Geopolitical);
        // Routes touching Asia via either endpoint
        assert_eq!(
            asia[0].impacted_segments.as_ref().unwrap(),
            &vec![
                "Shanghai-Rotterdam route".to_string(),
                "Singapore-Dubai route".to_string(),
            ]
        );
        // Europe at 0.2 emits nothing
        assert!(analysis
            .risk_factors
            .iter()
            .all(|f| !f.description.contains("Europe")));
    }

    #[test]
    fn test_unknown_location_groups_under_unknown() {
        let regions = Config::default().regions;
        let analysis = analyze_regions(
            &PerRegion,
            &regions,
            &[route("Atlantis", "Shangri-La")],
            &[],
        );
        // Both endpoints resolve to the single "Unknown" region at 0.5
        assert!((analysis.risk_score - 0.5).abs() < 1e-9);
        assert!(analysis.risk_factors.is_empty());
    }
}
